//! # Multisink Logger
//!
//! Process-wide category logging with per-category verbosity ceilings and
//! synchronous fan-out of every formatted line to pluggable sinks.
//!
//! ## Features
//!
//! - **Categories**: named, independently leveled, with a fixed ceiling the
//!   runtime level can never exceed
//! - **Cheap suppression**: a suppressed call is one relaxed atomic load
//! - **Multiple Sinks**: memory, console and `io::Write` sinks, or your own
//! - **Thread Safe**: every sink sees lines in the same order
//!
//! ## Example
//!
//! ```
//! use multisink_logger::prelude::*;
//! use multisink_logger::{define_log_category, error};
//! use std::sync::Arc;
//!
//! define_log_category!(static NET, "Net", Severity::Warning);
//!
//! let memory = Arc::new(MemorySink::new(64));
//! let _guard = Logger::global().attach(memory.clone());
//!
//! error!(Logger::global(), NET, "connection reset by {}", "peer");
//! assert!(memory.contains("connection reset by peer"));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{MemorySink, WriterSink};
    pub use crate::core::{
        configure, CategoryRegistry, LogCategory, LogRecord, LogSink, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, Result, Severity, SinkGuard, SinkId,
        SourceLocation, TimestampSource,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
pub use sinks::{CapturedRecord, MemorySink, WriterSink};
pub use core::{
    configure, CategoryRegistry, FormattedLine, LineFormatter, LogCategory, LogRecord, LogSink,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, Severity, SinkGuard,
    SinkId, SinkRegistry, SourceLocation, TimestampSource, DEFAULT_CATEGORY_WIDTH,
    DEFAULT_MAX_LINE_LEN, DEFAULT_TIMESTAMP_PATTERN, STATIC_MAX_SEVERITY,
};
