//! Sink trait for log output destinations

use super::{category::LogCategory, error::Result, severity::Severity};
use std::fmt;
use std::panic::Location;

/// Where a log call was made. Opaque to the core; handed through to sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One formatted line as seen by a sink.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Full line, prefix included, ending in `\n`.
    pub line: &'a str,
    pub location: SourceLocation,
    pub category: &'a LogCategory,
    pub severity: Severity,
}

/// An output destination for formatted lines.
///
/// `receive` runs on the emitting thread while the registry lock is held, so
/// calls to one sink never overlap and arrive in the same order for every
/// sink. A slow `receive` stalls every logging call site in the process.
pub trait LogSink: Send + Sync {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
