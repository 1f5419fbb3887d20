//! Runtime configuration
//!
//! A [`LoggerConfig`] selects the timestamp clock and sets category levels by
//! name. It can be deserialized from JSON or parsed from a directive string
//! such as `"Net=Log, Render VeryVerbose"`, which is convenient for command
//! lines and environment variables.

use super::error::{LoggerError, Result};
use super::severity::Severity;
use super::timestamp::TimestampSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable logger settings
///
/// # Examples
///
/// ```
/// use multisink_logger::{LoggerConfig, Severity, TimestampSource};
///
/// let config = LoggerConfig::from_json(
///     r#"{ "timestamp_source": "local", "categories": { "Net": "Verbose" } }"#,
/// )
/// .unwrap();
/// assert_eq!(config.timestamp_source, TimestampSource::Local);
/// assert_eq!(config.categories["Net"], Severity::Verbose);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub timestamp_source: TimestampSource,
    /// Category name → requested level (clamped to each category's ceiling)
    pub categories: BTreeMap<String, Severity>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_source(mut self, source: TimestampSource) -> Self {
        self.timestamp_source = source;
        self
    }

    #[must_use]
    pub fn with_category_level(mut self, name: impl Into<String>, level: Severity) -> Self {
        self.categories.insert(name.into(), level);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Config holding only the category levels of a directive string.
    pub fn from_directives(directives: &str) -> Result<Self> {
        Ok(Self {
            categories: parse_directives(directives)?,
            ..Self::default()
        })
    }

    /// Read a directive string from environment variable `var`.
    ///
    /// Returns `Ok(None)` when the variable is not set.
    pub fn from_env(var: &str) -> Result<Option<Self>> {
        match std::env::var(var) {
            Ok(value) => Self::from_directives(&value).map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(LoggerError::config(var, e.to_string())),
        }
    }

    /// Overlay `other`: its timestamp source wins and its category levels
    /// replace ours name by name.
    pub fn merge(&mut self, other: LoggerConfig) {
        self.timestamp_source = other.timestamp_source;
        self.categories.extend(other.categories);
    }
}

/// Parse `name=level` (or `name level`) pairs separated by `,` or `;`.
///
/// ```
/// use multisink_logger::core::config::parse_directives;
/// use multisink_logger::Severity;
///
/// let levels = parse_directives("Net=Log; Render VeryVerbose,").unwrap();
/// assert_eq!(levels["Net"], Severity::Log);
/// assert_eq!(levels["Render"], Severity::VeryVerbose);
/// ```
pub fn parse_directives(input: &str) -> Result<BTreeMap<String, Severity>> {
    let mut levels = BTreeMap::new();

    for directive in input.split([',', ';']).map(str::trim) {
        if directive.is_empty() {
            continue;
        }

        let (name, level) = match directive.split_once('=') {
            Some((name, level)) => (name.trim(), level.trim()),
            None => {
                let mut parts = directive.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(name), Some(level), None) => (name, level),
                    _ => {
                        return Err(LoggerError::directive(
                            directive,
                            "expected '<category>=<severity>'",
                        ))
                    }
                }
            }
        };

        if name.is_empty() {
            return Err(LoggerError::directive(directive, "missing category name"));
        }
        let level: Severity = level.parse().map_err(|_| {
            LoggerError::directive(directive, format!("unknown severity '{}'", level))
        })?;

        levels.insert(name.to_string(), level);
    }

    Ok(levels)
}
