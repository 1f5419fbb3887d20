//! Logger metrics for observability
//!
//! Counters for monitoring the emit pipeline: lines emitted, lines cut to
//! the length bound, deliveries to sinks and sink failures. The suppression
//! fast path touches none of them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use multisink_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_emitted();
/// metrics.record_delivered();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.lines_emitted(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// assert_eq!(metrics.sink_failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines that passed suppression and were formatted
    lines_emitted: AtomicU64,

    /// Lines cut to the maximum line length
    lines_truncated: AtomicU64,

    /// Successful `receive` calls across all sinks
    sink_deliveries: AtomicU64,

    /// `receive` calls that returned an error or panicked
    sink_failures: AtomicU64,

    /// Emits issued from inside a sink on the dispatching thread
    reentrant_emits: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_emitted: AtomicU64::new(0),
            lines_truncated: AtomicU64::new(0),
            sink_deliveries: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            reentrant_emits: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_truncated(&self) -> u64 {
        self.lines_truncated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_deliveries(&self) -> u64 {
        self.sink_deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reentrant_emits(&self) -> u64 {
        self.reentrant_emits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.lines_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_truncated(&self) -> u64 {
        self.lines_truncated.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.sink_deliveries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reentrant(&self) -> u64 {
        self.reentrant_emits.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of `receive` calls that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing was dispatched yet.
    pub fn sink_failure_rate(&self) -> f64 {
        let failed = self.sink_failures() as f64;
        let total = self.sink_deliveries() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_emitted.store(0, Ordering::Relaxed);
        self.lines_truncated.store(0, Ordering::Relaxed);
        self.sink_deliveries.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.reentrant_emits.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_emitted: AtomicU64::new(self.lines_emitted()),
            lines_truncated: AtomicU64::new(self.lines_truncated()),
            sink_deliveries: AtomicU64::new(self.sink_deliveries()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            reentrant_emits: AtomicU64::new(self.reentrant_emits()),
        }
    }
}
