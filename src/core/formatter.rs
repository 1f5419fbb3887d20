//! Line formatting
//!
//! Turns one emit call into exactly one line of text:
//!
//! ```text
//! [2025.01.08-10.30.45:123]: ERR: Net        : connection dropped
//! ```
//!
//! The line is rendered straight into a bounded buffer. Once the bound is
//! reached the rest of the message is discarded, so an oversized message is
//! never materialised in full, and the trailing newline is always kept.

use super::category::LogCategory;
use super::severity::Severity;
use super::timestamp::{TimestampSource, DEFAULT_TIMESTAMP_PATTERN};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::borrow::Cow;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Maximum length of a formatted line in bytes, trailing newline included.
pub const DEFAULT_MAX_LINE_LEN: usize = 10 * 1024;

/// Width of the category name column.
pub const DEFAULT_CATEGORY_WIDTH: usize = 11;

/// Smallest accepted line bound; leaves room for the prefix.
pub const MIN_MAX_LINE_LEN: usize = 64;

/// A rendered line, always terminated by a single `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    text: String,
    truncated: bool,
}

impl FormattedLine {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether content was cut to fit the line bound.
    #[inline]
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

pub struct LineFormatter {
    timestamp_source: AtomicU8,
    timestamp_pattern: Cow<'static, str>,
    category_width: usize,
    max_line_len: usize,
}

impl LineFormatter {
    /// Formatter with the default pattern, width and bound, stamping in UTC.
    pub const fn new() -> Self {
        Self {
            timestamp_source: AtomicU8::new(TimestampSource::Utc.as_u8()),
            timestamp_pattern: Cow::Borrowed(DEFAULT_TIMESTAMP_PATTERN),
            category_width: DEFAULT_CATEGORY_WIDTH,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }

    /// Caller validates `pattern` and the bounds (see `LoggerBuilder::build`).
    pub(crate) fn with_settings(
        source: TimestampSource,
        pattern: Cow<'static, str>,
        category_width: usize,
        max_line_len: usize,
    ) -> Self {
        Self {
            timestamp_source: AtomicU8::new(source.as_u8()),
            timestamp_pattern: pattern,
            category_width,
            max_line_len,
        }
    }

    pub fn timestamp_source(&self) -> TimestampSource {
        TimestampSource::from_u8(self.timestamp_source.load(Ordering::Relaxed))
    }

    pub fn set_timestamp_source(&self, source: TimestampSource) {
        self.timestamp_source.store(source.as_u8(), Ordering::Relaxed);
    }

    pub fn timestamp_pattern(&self) -> &str {
        &self.timestamp_pattern
    }

    pub fn category_width(&self) -> usize {
        self.category_width
    }

    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Render a line stamped with the current time of the configured clock.
    pub fn format(
        &self,
        severity: Severity,
        category: &LogCategory,
        args: fmt::Arguments<'_>,
    ) -> FormattedLine {
        match self.timestamp_source() {
            TimestampSource::Local => self.format_at(&Local::now(), severity, category, args),
            TimestampSource::Utc => self.format_at(&Utc::now(), severity, category, args),
        }
    }

    /// Render a line with an explicit timestamp.
    pub fn format_at<Tz>(
        &self,
        timestamp: &DateTime<Tz>,
        severity: Severity,
        category: &LogCategory,
        args: fmt::Arguments<'_>,
    ) -> FormattedLine
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        // One byte is held back for the newline. Breaks anywhere before it
        // (message, category name, a `%n` in the pattern) are escaped.
        let mut out = BoundedLine::new(self.max_line_len.saturating_sub(1));

        // A full buffer reports fmt::Error; the content so far is kept.
        let _ = write!(
            out,
            "[{}]: {}: {:<width$.width$}: ",
            timestamp.format(&*self.timestamp_pattern),
            severity.code(),
            category.name(),
            width = self.category_width,
        );

        let _ = out.write_fmt(args);

        out.finish()
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// `fmt::Write` target that stops at a byte limit, on a char boundary.
struct BoundedLine {
    buf: String,
    limit: usize,
    truncated: bool,
}

impl BoundedLine {
    fn new(limit: usize) -> Self {
        Self {
            buf: String::with_capacity(limit.min(256) + 1),
            limit,
            truncated: false,
        }
    }

    fn remaining(&self) -> usize {
        self.limit - self.buf.len()
    }

    /// Append as much of `s` as fits. Returns false once the limit is hit.
    fn push_bounded(&mut self, s: &str) -> bool {
        let room = self.remaining();
        if s.len() <= room {
            self.buf.push_str(s);
            return true;
        }

        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.push_str(&s[..end]);
        self.truncated = true;
        false
    }

    fn finish(mut self) -> FormattedLine {
        self.buf.push('\n');
        FormattedLine {
            text: self.buf,
            truncated: self.truncated,
        }
    }
}

impl fmt::Write for BoundedLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }

        if !s.contains(['\n', '\r']) {
            return if self.push_bounded(s) { Ok(()) } else { Err(fmt::Error) };
        }

        let mut rest = s;
        while let Some(pos) = rest.find(['\n', '\r']) {
            let escaped = if rest.as_bytes()[pos] == b'\n' { "\\n" } else { "\\r" };
            if !self.push_bounded(&rest[..pos]) || !self.push_bounded(escaped) {
                return Err(fmt::Error);
            }
            rest = &rest[pos + 1..];
        }
        if self.push_bounded(rest) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
