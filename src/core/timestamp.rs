//! Timestamp source and pattern handling
//!
//! Every formatted line starts with the wall-clock time at which it was
//! emitted. The clock (process-local or UTC) is a runtime switch, re-read on
//! each call; the rendering pattern is a strftime string validated once when
//! a logger is built.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Default rendering: `2025.01.08-10.30.45:123`
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y.%m.%d-%H.%M.%S:%3f";

/// Which wall clock stamps emitted lines
///
/// # Examples
///
/// ```
/// use multisink_logger::TimestampSource;
///
/// let source: TimestampSource = "local".parse().unwrap();
/// assert_eq!(source, TimestampSource::Local);
/// assert_eq!(TimestampSource::default(), TimestampSource::Utc);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TimestampSource {
    /// Process-local time zone
    Local = 0,
    /// Coordinated universal time
    #[default]
    Utc = 1,
}

impl TimestampSource {
    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => TimestampSource::Local,
            _ => TimestampSource::Utc,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::str::FromStr for TimestampSource {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(TimestampSource::Local),
            "utc" => Ok(TimestampSource::Utc),
            _ => Err(LoggerError::config(
                "TimestampSource",
                format!("expected 'local' or 'utc', got '{}'", s),
            )),
        }
    }
}

/// Reject strftime patterns chrono cannot render.
///
/// An invalid pattern would otherwise make every timestamp write fail.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(LoggerError::InvalidTimestampPattern(pattern.to_string()));
    }
    Ok(())
}
