//! Basic logger usage example
//!
//! Declares categories, attaches a console and an in-memory sink to the
//! process-wide logger, and changes category levels at runtime.
//!
//! Run with: cargo run --example basic_usage
//!
//! Every emitted line also appears on stderr (the always-on debug channel).

use multisink_logger::prelude::*;
use multisink_logger::{define_log_category, error, log, verbose, warning};
use std::sync::Arc;

define_log_category!(static NET, "Net", Severity::Warning, Severity::Verbose);
define_log_category!(static RENDER, "Render", Severity::Log);

fn main() -> Result<()> {
    println!("=== Multisink Logger - Basic Usage Example ===\n");

    let categories = CategoryRegistry::global();
    categories.register(&NET)?;
    categories.register(&RENDER)?;

    let logger = Logger::global();
    let _console = logger.attach(Arc::new(ConsoleSink::new()));
    let recent = Arc::new(MemorySink::new(8));
    let _recent = logger.attach(recent.clone());

    println!("1. Logging at different levels (Net is at Warning):");
    log!(logger, NET, Severity::Log, "connected to {}", "10.0.0.1");
    warning!(logger, NET, "retry {} of {}", 2, 5);
    error!(logger, NET, "connection dropped");
    log!(logger, RENDER, Severity::Log, "frame {} took {:.1} ms", 120, 16.4);

    println!("\n2. Raising Net through a directive string:");
    let config = LoggerConfig::from_directives("Net=VeryVerbose")?;
    configure(&config);
    println!("   Net is now {} (ceiling {})", NET.active_level(), NET.ceiling());
    verbose!(logger, NET, "handshake took {} ms", 12);
    log!(logger, NET, Severity::VeryVerbose, "hidden: above the ceiling");

    println!("\n3. Switching to local time:");
    logger.set_timestamp_source(TimestampSource::Local);
    warning!(logger, RENDER, "stamped with local time");

    println!("\n4. Last lines kept in memory:");
    for line in recent.lines() {
        print!("   {}", line);
    }

    let metrics = logger.metrics();
    println!(
        "\n{} lines emitted, {} sink deliveries, {} failures",
        metrics.lines_emitted(),
        metrics.sink_deliveries(),
        metrics.sink_failures()
    );

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
