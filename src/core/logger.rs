//! Emit pipeline and the process-wide logger

use super::{
    category::{CategoryRegistry, LogCategory},
    config::LoggerConfig,
    debug_channel,
    error::{LoggerError, Result},
    formatter::{LineFormatter, DEFAULT_CATEGORY_WIDTH, DEFAULT_MAX_LINE_LEN, MIN_MAX_LINE_LEN},
    metrics::LoggerMetrics,
    registry::{SinkGuard, SinkId, SinkRegistry},
    severity::Severity,
    sink::{LogRecord, LogSink, SourceLocation},
    timestamp::{self, TimestampSource, DEFAULT_TIMESTAMP_PATTERN},
};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Formatter, sink registry and counters behind one emit entry point.
///
/// The process normally uses the single instance returned by
/// [`Logger::global`], which the logging macros write to. Separate
/// instances are useful for tests and embedding.
pub struct Logger {
    formatter: LineFormatter,
    sinks: SinkRegistry,
    metrics: LoggerMetrics,
}

static GLOBAL_LOGGER: Logger = Logger::new();

impl Logger {
    /// Logger with default formatting and no sinks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            formatter: LineFormatter::new(),
            sinks: SinkRegistry::new(),
            metrics: LoggerMetrics::new(),
        }
    }

    /// The process-wide logger. Constant-initialized, so it is usable from
    /// any thread at any point, including before `main`.
    #[inline]
    pub fn global() -> &'static Logger {
        &GLOBAL_LOGGER
    }

    /// Emit one message.
    ///
    /// Returns immediately when `category` suppresses `severity`. Otherwise the
    /// line is formatted once, written to the debug channel, then handed to
    /// every registered sink under the registry lock. Never fails and never
    /// panics because of a sink.
    #[inline]
    pub fn emit(
        &self,
        location: SourceLocation,
        category: &LogCategory,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) {
        if category.is_suppressed(severity) {
            return;
        }
        self.emit_unsuppressed(location, category, severity, args);
    }

    #[inline(never)]
    fn emit_unsuppressed(
        &self,
        location: SourceLocation,
        category: &LogCategory,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) {
        let line = self.formatter.format(severity, category, args);
        self.metrics.record_emitted();
        if line.was_truncated() {
            self.metrics.record_truncated();
        }

        debug_channel::write_line(line.as_str());

        let record = LogRecord {
            line: line.as_str(),
            location,
            category,
            severity,
        };
        self.sinks.dispatch(&record, &self.metrics);
    }

    /// Emit a plain message, taking the source location from the caller.
    #[track_caller]
    pub fn log(&self, category: &LogCategory, severity: Severity, message: &str) {
        self.emit(
            SourceLocation::caller(),
            category,
            severity,
            format_args!("{}", message),
        );
    }

    pub fn register_sink(&self, sink: Arc<dyn LogSink>) -> SinkId {
        self.sinks.register(sink)
    }

    pub fn unregister_sink(&self, id: SinkId) -> bool {
        self.sinks.unregister(id)
    }

    /// Register `sink` until the returned guard is dropped.
    pub fn attach(&self, sink: Arc<dyn LogSink>) -> SinkGuard<'_> {
        self.sinks.attach(sink)
    }

    pub fn sinks(&self) -> &SinkRegistry {
        &self.sinks
    }

    pub fn formatter(&self) -> &LineFormatter {
        &self.formatter
    }

    pub fn timestamp_source(&self) -> TimestampSource {
        self.formatter.timestamp_source()
    }

    /// Switch the clock used for subsequent lines.
    pub fn set_timestamp_source(&self, source: TimestampSource) {
        self.formatter.set_timestamp_source(source);
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use multisink_logger::Logger;
    ///
    /// let metrics = Logger::global().metrics();
    /// println!("Emitted: {}", metrics.lines_emitted());
    /// println!("Sink failure rate: {:.2}%", metrics.sink_failure_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.sinks.flush()
    }

    /// Apply the timestamp source and category levels of `config`.
    ///
    /// Returns the number of registered categories whose level was set.
    pub fn apply_config(&self, config: &LoggerConfig, categories: &CategoryRegistry) -> usize {
        self.set_timestamp_source(config.timestamp_source);
        categories.apply_levels(&config.categories)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use multisink_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .timestamp_source(TimestampSource::Local)
    ///     .max_line_len(4096)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.formatter().max_line_len(), 4096);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            debug_channel::report(format_args!(
                "[LOGGER ERROR] Failed to flush during shutdown: {}",
                e
            ));
        }
    }
}

/// Apply `config` to the process-wide logger and category table.
pub fn configure(config: &LoggerConfig) -> usize {
    Logger::global().apply_config(config, CategoryRegistry::global())
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use multisink_logger::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemorySink::new(128));
/// let logger = Logger::builder()
///     .timestamp_pattern("%H:%M:%S")
///     .category_width(8)
///     .sink(memory.clone())
///     .build()
///     .unwrap();
/// assert_eq!(logger.sinks().len(), 1);
/// ```
pub struct LoggerBuilder {
    timestamp_source: TimestampSource,
    timestamp_pattern: Cow<'static, str>,
    category_width: usize,
    max_line_len: usize,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            timestamp_source: TimestampSource::default(),
            timestamp_pattern: Cow::Borrowed(DEFAULT_TIMESTAMP_PATTERN),
            category_width: DEFAULT_CATEGORY_WIDTH,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            sinks: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_source(mut self, source: TimestampSource) -> Self {
        self.timestamp_source = source;
        self
    }

    /// strftime pattern for the leading timestamp
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_pattern(mut self, pattern: impl Into<Cow<'static, str>>) -> Self {
        self.timestamp_pattern = pattern.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn category_width(mut self, width: usize) -> Self {
        self.category_width = width;
        self
    }

    /// Maximum bytes per line, trailing newline included
    #[must_use = "builder methods return a new value"]
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    /// Register a sink on the built logger
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Build the Logger, validating the formatting settings
    pub fn build(self) -> Result<Logger> {
        timestamp::validate_pattern(&self.timestamp_pattern)?;

        if self.category_width == 0 {
            return Err(LoggerError::config(
                "LoggerBuilder",
                "category_width must be at least 1",
            ));
        }
        if self.max_line_len < MIN_MAX_LINE_LEN {
            return Err(LoggerError::config(
                "LoggerBuilder",
                format!(
                    "max_line_len must be at least {}, got {}",
                    MIN_MAX_LINE_LEN, self.max_line_len
                ),
            ));
        }

        let logger = Logger {
            formatter: LineFormatter::with_settings(
                self.timestamp_source,
                self.timestamp_pattern,
                self.category_width,
                self.max_line_len,
            ),
            sinks: SinkRegistry::new(),
            metrics: LoggerMetrics::new(),
        };
        for sink in self.sinks {
            logger.register_sink(sink);
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
