//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
pub mod memory;
pub mod writer;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use memory::{CapturedRecord, MemorySink};
pub use writer::WriterSink;

pub use crate::core::LogSink;
