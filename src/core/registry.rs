//! Sink registry and fan-out
//!
//! The registry is the single source of truth for which sinks receive lines.
//! One mutex guards the sink list and is held across the whole fan-out:
//!
//! - every sink sees lines in the same order, the order in which emitting
//!   threads took the lock;
//! - `unregister` blocks until an in-flight fan-out finishes, so once it
//!   returns the sink will not be called again.
//!
//! The cost is that one slow sink stalls every logging thread. Snapshotting
//! the list and releasing the lock before dispatch would lose the second
//! guarantee.

use super::{
    debug_channel,
    error::Result,
    metrics::LoggerMetrics,
    sink::{LogRecord, LogSink},
};
use parking_lot::{const_mutex, Mutex};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u64);

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink#{}", self.0)
    }
}

struct RegisteredSink {
    id: SinkId,
    sink: Arc<dyn LogSink>,
}

/// Requests made from inside a sink while this thread holds the lock.
enum Deferred {
    Register(RegisteredSink),
    Unregister(SinkId),
    Flush,
}

thread_local! {
    // Registries this thread is currently dispatching for, innermost last.
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

// `try_with` throughout: during thread-local teardown the stack may already
// be gone, and a panic there aborts the process. Without it, reentrancy is
// simply not tracked.
struct DispatchScope {
    key: usize,
    entered: bool,
}

impl DispatchScope {
    fn enter(key: usize) -> Self {
        let entered = DISPATCHING
            .try_with(|stack| stack.borrow_mut().push(key))
            .is_ok();
        Self { key, entered }
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        if !self.entered {
            return;
        }
        let _ = DISPATCHING.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|k| *k == self.key) {
                stack.remove(pos);
            }
        });
    }
}

pub struct SinkRegistry {
    sinks: Mutex<Vec<RegisteredSink>>,
    deferred: Mutex<Vec<Deferred>>,
    next_id: AtomicU64,
    // Mirrors `sinks.len()`; readable while the lock is held up the stack.
    count: AtomicUsize,
}

impl SinkRegistry {
    pub const fn new() -> Self {
        Self {
            sinks: const_mutex(Vec::new()),
            deferred: const_mutex(Vec::new()),
            next_id: AtomicU64::new(1),
            count: AtomicUsize::new(0),
        }
    }

    fn key(&self) -> usize {
        self as *const Self as usize
    }

    /// True when called from a sink callback of this registry's fan-out.
    fn dispatching_on_this_thread(&self) -> bool {
        let key = self.key();
        DISPATCHING
            .try_with(|stack| stack.borrow().contains(&key))
            .unwrap_or(false)
    }

    /// Report an accessor that cannot see the list from inside a sink.
    fn report_inside_sink(&self, operation: &str) {
        debug_channel::report(format_args!(
            "[LOGGER ERROR] SinkRegistry::{} called from inside a sink; \
             the sink list is locked by the current fan-out",
            operation
        ));
    }

    /// Append a sink; it receives every line dispatched after this returns.
    ///
    /// Registering the same sink twice delivers each line to it twice.
    pub fn register(&self, sink: Arc<dyn LogSink>) -> SinkId {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = RegisteredSink { id, sink };

        if self.dispatching_on_this_thread() {
            // The lock is held further up this thread's stack.
            self.deferred.lock().push(Deferred::Register(entry));
        } else {
            let mut sinks = self.sinks.lock();
            sinks.push(entry);
            self.count.store(sinks.len(), Ordering::Relaxed);
        }
        id
    }

    /// Remove a sink. Blocks while a fan-out is in progress on another thread.
    ///
    /// Returns false if `id` was not registered. A removal requested from
    /// inside a sink callback takes effect when the current fan-out ends and
    /// always reports true.
    pub fn unregister(&self, id: SinkId) -> bool {
        if self.dispatching_on_this_thread() {
            self.deferred.lock().push(Deferred::Unregister(id));
            return true;
        }

        let mut sinks = self.sinks.lock();
        match sinks.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                sinks.remove(pos);
                self.count.store(sinks.len(), Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Register `sink` for as long as the returned guard lives.
    pub fn attach(&self, sink: Arc<dyn LogSink>) -> SinkGuard<'_> {
        SinkGuard {
            registry: self,
            id: self.register(sink),
        }
    }

    /// Whether `id` is registered.
    ///
    /// From inside a sink the list is locked by the running fan-out: this
    /// reports the misuse on the debug channel and returns false.
    pub fn contains(&self, id: SinkId) -> bool {
        if self.dispatching_on_this_thread() {
            self.report_inside_sink("contains");
            return false;
        }
        self.sinks.lock().iter().any(|entry| entry.id == id)
    }

    /// Number of registered sinks. Safe to call from inside a sink, where
    /// edits deferred by the current fan-out are not counted yet.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of registered sinks, in delivery order.
    ///
    /// Empty (and reported on the debug channel) when called from inside a sink.
    pub fn sink_names(&self) -> Vec<String> {
        if self.dispatching_on_this_thread() {
            self.report_inside_sink("sink_names");
            return Vec::new();
        }
        self.sinks
            .lock()
            .iter()
            .map(|entry| entry.sink.name().to_string())
            .collect()
    }

    /// Deliver `record` to every registered sink, in registration order,
    /// under the lock. Returns the number of successful deliveries.
    ///
    /// A sink that errors or panics is reported on the debug channel and
    /// skipped; later sinks still receive the line. A call made from inside
    /// one of this registry's sinks delivers nothing.
    pub fn dispatch(&self, record: &LogRecord<'_>, metrics: &LoggerMetrics) -> usize {
        if self.dispatching_on_this_thread() {
            metrics.record_reentrant();
            return 0;
        }

        let mut sinks = self.sinks.lock();
        let _scope = DispatchScope::enter(self.key());
        let mut delivered = 0;

        for entry in sinks.iter() {
            match catch_unwind(AssertUnwindSafe(|| entry.sink.receive(record))) {
                Ok(Ok(())) => {
                    delivered += 1;
                    metrics.record_delivered();
                }
                Ok(Err(e)) => {
                    metrics.record_sink_failure();
                    debug_channel::report(format_args!(
                        "[LOGGER ERROR] Sink '{}' ({}) failed: {}",
                        entry.sink.name(),
                        entry.id,
                        e
                    ));
                }
                Err(panic) => {
                    metrics.record_sink_failure();
                    debug_channel::report(format_args!(
                        "[LOGGER CRITICAL] Sink '{}' ({}) panicked: {}. \
                         Other sinks continue to function.",
                        entry.sink.name(),
                        entry.id,
                        panic_message(&*panic)
                    ));
                }
            }
        }

        if self.apply_deferred(&mut sinks) {
            if let Err(e) = Self::flush_sinks(&sinks) {
                debug_channel::report(format_args!(
                    "[LOGGER ERROR] Deferred flush failed: {}",
                    e
                ));
            }
            // Edits made by sinks while flushing.
            self.apply_deferred(&mut sinks);
        }
        delivered
    }

    /// Flush every sink under the lock. Returns the first error, after
    /// attempting all sinks.
    ///
    /// Called from inside a sink, the flush runs once the current fan-out
    /// has delivered to every sink, and this returns `Ok(())` right away.
    pub fn flush(&self) -> Result<()> {
        if self.dispatching_on_this_thread() {
            self.deferred.lock().push(Deferred::Flush);
            return Ok(());
        }

        let mut sinks = self.sinks.lock();
        let _scope = DispatchScope::enter(self.key());
        let result = Self::flush_sinks(&sinks);
        // A flush requested by a sink during this flush is already satisfied.
        self.apply_deferred(&mut sinks);
        result
    }

    fn flush_sinks(sinks: &[RegisteredSink]) -> Result<()> {
        let mut first_error = None;

        for entry in sinks.iter() {
            match catch_unwind(AssertUnwindSafe(|| entry.sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(panic) => {
                    debug_channel::report(format_args!(
                        "[LOGGER CRITICAL] Sink '{}' ({}) panicked during flush: {}",
                        entry.sink.name(),
                        entry.id,
                        panic_message(&*panic)
                    ));
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Apply deferred edits. Returns whether a flush was requested.
    fn apply_deferred(&self, sinks: &mut Vec<RegisteredSink>) -> bool {
        let pending = std::mem::take(&mut *self.deferred.lock());
        let mut flush_requested = false;
        for op in pending {
            match op {
                Deferred::Register(entry) => sinks.push(entry),
                Deferred::Unregister(id) => sinks.retain(|entry| entry.id != id),
                Deferred::Flush => flush_requested = true,
            }
        }
        self.count.store(sinks.len(), Ordering::Relaxed);
        flush_requested
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registry membership: the sink is unregistered when the guard drops.
///
/// Dropping waits for an in-flight fan-out to finish, after which the sink
/// is never called again.
#[must_use = "dropping the guard unregisters the sink"]
pub struct SinkGuard<'a> {
    registry: &'a SinkRegistry,
    id: SinkId,
}

impl SinkGuard<'_> {
    pub fn id(&self) -> SinkId {
        self.id
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
