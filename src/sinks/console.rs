//! Console sink implementation

use crate::core::{LogRecord, LogSink, Result, Severity};
use colored::Colorize;
use std::io::{self, Write};

/// Prints lines to stdout, optionally colored by severity.
///
/// Error and Fatal lines go to stderr unless disabled with
/// [`ConsoleSink::errors_to_stderr`].
pub struct ConsoleSink {
    use_colors: bool,
    errors_to_stderr: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            errors_to_stderr: true,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            errors_to_stderr: true,
        }
    }

    /// Route Error and Fatal lines to stderr (default) or stdout
    ///
    /// # Example
    ///
    /// ```
    /// use multisink_logger::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::with_colors(false).errors_to_stderr(false);
    /// ```
    #[must_use]
    pub fn errors_to_stderr(mut self, enabled: bool) -> Self {
        self.errors_to_stderr = enabled;
        self
    }

    fn render(&self, record: &LogRecord<'_>) -> String {
        if !self.use_colors {
            return record.line.to_string();
        }
        let body = record.line.strip_suffix('\n').unwrap_or(record.line);
        format!("{}\n", body.color(record.severity.color_code()))
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()> {
        let output = self.render(record);

        match record.severity {
            Severity::Error | Severity::Fatal if self.errors_to_stderr => {
                io::stderr().lock().write_all(output.as_bytes())?
            }
            _ => io::stdout().lock().write_all(output.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
