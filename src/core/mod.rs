//! Core logger types and traits

pub mod category;
pub mod config;
mod debug_channel;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use category::{CategoryRegistry, LogCategory};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{FormattedLine, LineFormatter, DEFAULT_CATEGORY_WIDTH, DEFAULT_MAX_LINE_LEN};
pub use logger::{configure, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use registry::{SinkGuard, SinkId, SinkRegistry};
pub use severity::{Severity, STATIC_MAX_SEVERITY};
pub use sink::{LogRecord, LogSink, SourceLocation};
pub use timestamp::{TimestampSource, DEFAULT_TIMESTAMP_PATTERN};
