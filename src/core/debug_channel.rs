//! Always-on debug channel
//!
//! Every emitted line is written here regardless of which sinks are
//! registered, so diagnostics survive a process with no sinks at all. The
//! channel is the process's standard error stream; there is no switch to
//! turn it off.

use std::io::{self, Write};

/// Write one already-terminated line in a single call under the stderr lock.
pub(crate) fn write_line(line: &str) {
    let mut stderr = io::stderr().lock();
    // Nowhere left to report a failing stderr.
    let _ = stderr.write_all(line.as_bytes());
}

/// Report a problem inside the facility itself.
///
/// Goes straight to the channel, never back through the sink fan-out.
pub(crate) fn report(message: std::fmt::Arguments<'_>) {
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_fmt(message);
    let _ = stderr.write_all(b"\n");
}
