//! Sink over any `io::Write`

use crate::core::{LogRecord, LogSink, Result};
use parking_lot::Mutex;
use std::io::Write;

/// Writes each line verbatim to a caller-supplied writer.
///
/// The caller owns opening and rotating whatever the writer points at
/// (file, socket, pipe, buffer).
///
/// # Example
///
/// ```
/// use multisink_logger::sinks::WriterSink;
///
/// let sink = WriterSink::new("buffer", Vec::<u8>::new());
/// assert!(sink.with_writer(|buf| buf.is_empty()));
/// ```
pub struct WriterSink<W: Write + Send> {
    name: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Run `f` with exclusive access to the writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }

    /// Take the writer back. Buffered writers flush when they drop.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()> {
        self.writer.lock().write_all(record.line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
