//! Severity definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity. Larger values are chattier.
///
/// `None` is the always-suppress sentinel: a category whose active level is
/// `None` lets nothing through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(u8)]
pub enum Severity {
    None = 0,
    Fatal = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Log = 4,
    Verbose = 5,
    VeryVerbose = 6,
}

/// Highest severity any call site can emit in this build.
///
/// Lowered by the `max-severity-*` cargo features; the emit macros compare
/// against it before touching the category.
pub const STATIC_MAX_SEVERITY: Severity = if cfg!(feature = "max-severity-none") {
    Severity::None
} else if cfg!(feature = "max-severity-fatal") {
    Severity::Fatal
} else if cfg!(feature = "max-severity-error") {
    Severity::Error
} else if cfg!(feature = "max-severity-warning") {
    Severity::Warning
} else if cfg!(feature = "max-severity-log") {
    Severity::Log
} else if cfg!(feature = "max-severity-verbose") {
    Severity::Verbose
} else {
    Severity::VeryVerbose
};

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::None,
        Severity::Fatal,
        Severity::Error,
        Severity::Warning,
        Severity::Log,
        Severity::Verbose,
        Severity::VeryVerbose,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::None),
            1 => Some(Severity::Fatal),
            2 => Some(Severity::Error),
            3 => Some(Severity::Warning),
            4 => Some(Severity::Log),
            5 => Some(Severity::Verbose),
            6 => Some(Severity::VeryVerbose),
            _ => None,
        }
    }

    /// Three-letter code printed in every formatted line.
    ///
    /// `Log`, `Verbose` and `VeryVerbose` all print `LOG`.
    pub const fn code(self) -> &'static str {
        match self {
            Severity::None => "NNN",
            Severity::Fatal => "FTL",
            Severity::Error => "ERR",
            Severity::Warning => "WRN",
            Severity::Log | Severity::Verbose | Severity::VeryVerbose => "LOG",
        }
    }

    /// Code for a raw level value, `"Unknown"` when it maps to no severity.
    pub const fn code_for_raw(value: u8) -> &'static str {
        match Severity::from_u8(value) {
            Some(severity) => severity.code(),
            None => "Unknown",
        }
    }

    pub const fn to_str(self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Fatal => "Fatal",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Log => "Log",
            Severity::Verbose => "Verbose",
            Severity::VeryVerbose => "VeryVerbose",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::None => White,
            Severity::Fatal => BrightRed,
            Severity::Error => Red,
            Severity::Warning => Yellow,
            Severity::Log => Green,
            Severity::Verbose => Blue,
            Severity::VeryVerbose => BrightBlack,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Severity::None),
            "fatal" => Ok(Severity::Fatal),
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "log" => Ok(Severity::Log),
            "verbose" => Ok(Severity::Verbose),
            "veryverbose" | "very_verbose" | "all" => Ok(Severity::VeryVerbose),
            _ => Err(LoggerError::InvalidSeverity(s.to_string())),
        }
    }
}
