//! Error types for the logger system

use super::severity::Severity;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Initial level requested above the category's ceiling
    #[error("Category '{category}' cannot start at {requested}: ceiling is {ceiling}")]
    CeilingExceeded {
        category: String,
        requested: Severity,
        ceiling: Severity,
    },

    /// No category with this name is registered
    #[error("Unknown log category '{0}'")]
    UnknownCategory(String),

    /// Another category already uses this name
    #[error("Log category '{0}' is already registered")]
    DuplicateCategory(String),

    /// String could not be parsed as a severity
    #[error("Invalid severity: '{0}'")]
    InvalidSeverity(String),

    /// Malformed verbosity directive
    #[error("Invalid verbosity directive '{directive}': {message}")]
    InvalidDirective { directive: String, message: String },

    /// Timestamp pattern rejected by the strftime parser
    #[error("Invalid timestamp pattern '{0}'")]
    InvalidTimestampPattern(String),

    /// A sink failed to accept a line
    #[error("Sink '{sink}' failed: {message}")]
    SinkFailure { sink: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn ceiling_exceeded(
        category: impl Into<String>,
        requested: Severity,
        ceiling: Severity,
    ) -> Self {
        LoggerError::CeilingExceeded {
            category: category.into(),
            requested,
            ceiling,
        }
    }

    pub fn unknown_category(name: impl Into<String>) -> Self {
        LoggerError::UnknownCategory(name.into())
    }

    pub fn duplicate_category(name: impl Into<String>) -> Self {
        LoggerError::DuplicateCategory(name.into())
    }

    /// Create a directive parse error
    pub fn directive(directive: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidDirective {
            directive: directive.into(),
            message: message.into(),
        }
    }

    /// Create a sink failure, typically returned from [`LogSink::receive`]
    ///
    /// [`LogSink::receive`]: crate::core::LogSink::receive
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailure {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
