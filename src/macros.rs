//! Call-site macros for declaring categories and emitting lines.
//!
//! The emit macros check the compile-time ceiling and the category's active
//! level before the format arguments are evaluated, so a suppressed call
//! costs one comparison and one relaxed load.
//!
//! # Examples
//!
//! ```
//! use multisink_logger::prelude::*;
//! use multisink_logger::{define_log_category, log, warning};
//! use std::sync::Arc;
//!
//! define_log_category!(static NET, "Net", Severity::Log);
//!
//! let logger = Logger::new();
//! let memory = Arc::new(MemorySink::new(16));
//! logger.register_sink(memory.clone());
//!
//! // Delivered
//! log!(logger, NET, Severity::Log, "listening on port {}", 8080);
//! warning!(logger, NET, "retry {} of {}", 3, 5);
//!
//! // Suppressed: Verbose is more verbose than Log
//! log!(logger, NET, Severity::Verbose, "handshake bytes {:?}", [1, 2, 3]);
//!
//! assert_eq!(memory.len(), 2);
//! ```

/// Declare a `static` [`LogCategory`](crate::LogCategory).
///
/// The ceiling defaults to `Severity::VeryVerbose`. An initial level above
/// the ceiling fails to compile.
///
/// # Examples
///
/// ```
/// use multisink_logger::{define_log_category, Severity};
///
/// define_log_category!(pub static RENDER, "Render", Severity::Warning);
/// define_log_category!(static AUDIO, "Audio", Severity::Log, Severity::Verbose);
///
/// assert_eq!(RENDER.ceiling(), Severity::VeryVerbose);
/// assert_eq!(AUDIO.set_active_level(Severity::VeryVerbose), Severity::Verbose);
/// ```
#[macro_export]
macro_rules! define_log_category {
    ($vis:vis static $ident:ident, $name:expr, $level:expr) => {
        $crate::define_log_category!(
            $vis static $ident,
            $name,
            $level,
            $crate::Severity::VeryVerbose
        );
    };
    ($vis:vis static $ident:ident, $name:expr, $level:expr, $ceiling:expr) => {
        $vis static $ident: $crate::LogCategory = $crate::LogCategory::new($name, $level, $ceiling);
    };
}

/// Emit a formatted line through `logger` at the given severity.
///
/// `logger` is anything with an `emit` method taking the location,
/// category, severity and format arguments: a `Logger`, a `&Logger`, or
/// `Logger::global()`.
///
/// # Examples
///
/// ```
/// use multisink_logger::prelude::*;
/// use multisink_logger::{define_log_category, log};
///
/// define_log_category!(static CORE, "Core", Severity::Log);
///
/// log!(Logger::global(), CORE, Severity::Error, "Error code: {}", 500);
/// log!(Logger::new(), CORE, Severity::Log, "Simple message");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $category:expr, $severity:expr, $($arg:tt)+) => {{
        let severity: $crate::Severity = $severity;
        if severity <= $crate::STATIC_MAX_SEVERITY && !$category.is_suppressed(severity) {
            $logger.emit(
                $crate::SourceLocation::new(file!(), line!()),
                &$category,
                severity,
                format_args!($($arg)+),
            );
        }
    }};
}

/// Log a fatal-level message.
///
/// Only emits the line; the caller decides whether to abort.
///
/// ```
/// # use multisink_logger::prelude::*;
/// # use multisink_logger::define_log_category;
/// # define_log_category!(static CORE, "Core", Severity::Log);
/// use multisink_logger::fatal;
/// fatal!(Logger::new(), CORE, "Unable to recover: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $category, $crate::Severity::Fatal, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $category, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $category, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $category, $crate::Severity::Verbose, $($arg)+)
    };
}

/// Log a very-verbose-level message.
#[macro_export]
macro_rules! very_verbose {
    ($logger:expr, $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $category, $crate::Severity::VeryVerbose, $($arg)+)
    };
}
