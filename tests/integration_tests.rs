//! Integration tests for the emit pipeline
//!
//! These tests verify:
//! - Suppression and per-sink delivery counts
//! - Insertion-order fan-out and unregistration
//! - Failing and panicking sink isolation
//! - Line shape, line-break escaping and truncation
//! - Reentrant emits and registry edits from inside a sink
//! - Configuration by JSON, directives and environment

use multisink_logger::prelude::*;
use multisink_logger::{define_log_category, error, log, warning, DEFAULT_MAX_LINE_LEN};
use parking_lot::Mutex;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn here() -> SourceLocation {
    SourceLocation::new(file!(), line!())
}

/// Records `(tag, line)` into a log shared between sinks.
struct OrderedSink {
    tag: &'static str,
    journal: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl LogSink for OrderedSink {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()> {
        self.journal.lock().push((self.tag, record.line.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        self.tag
    }
}

struct FailingSink;

impl LogSink for FailingSink {
    fn receive(&self, _record: &LogRecord<'_>) -> Result<()> {
        Err(LoggerError::sink("failing", "disk full"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct PanickingSink;

impl LogSink for PanickingSink {
    fn receive(&self, _record: &LogRecord<'_>) -> Result<()> {
        panic!("sink exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[test]
fn test_suppression_gates_every_sink() {
    static GATE: LogCategory = LogCategory::new("Gate", Severity::Warning, Severity::VeryVerbose);

    let logger = Logger::new();
    let first = Arc::new(MemorySink::new(64));
    let second = Arc::new(MemorySink::new(64));
    logger.register_sink(first.clone());
    logger.register_sink(second.clone());

    for severity in Severity::ALL {
        first.clear();
        second.clear();
        logger.emit(here(), &GATE, severity, format_args!("gated"));

        let expected = if severity > GATE.active_level() { 0 } else { 1 };
        assert_eq!(first.len(), expected, "severity {}", severity);
        assert_eq!(second.len(), expected, "severity {}", severity);
    }
}

#[test]
fn test_insertion_order_and_unregister() {
    static ORDER: LogCategory = LogCategory::new("Order", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let journal = Arc::new(Mutex::new(Vec::new()));
    let a = logger.register_sink(Arc::new(OrderedSink {
        tag: "A",
        journal: journal.clone(),
    }));
    logger.register_sink(Arc::new(OrderedSink {
        tag: "B",
        journal: journal.clone(),
    }));

    logger.emit(here(), &ORDER, Severity::Log, format_args!("first"));
    assert_eq!(
        journal.lock().iter().map(|(tag, _)| *tag).collect::<Vec<_>>(),
        vec!["A", "B"]
    );

    assert!(logger.unregister_sink(a));
    assert!(!logger.unregister_sink(a));
    journal.lock().clear();

    logger.emit(here(), &ORDER, Severity::Log, format_args!("second"));
    let entries = journal.lock().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "B");
    assert!(entries[0].1.ends_with("second\n"));
}

#[test]
fn test_failing_sinks_are_isolated() {
    static ISOLATE: LogCategory = LogCategory::new("Isolate", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let memory = Arc::new(MemorySink::new(8));
    logger.register_sink(Arc::new(FailingSink));
    logger.register_sink(Arc::new(PanickingSink));
    logger.register_sink(memory.clone());

    logger.emit(here(), &ISOLATE, Severity::Error, format_args!("still delivered"));
    logger.emit(here(), &ISOLATE, Severity::Error, format_args!("and again"));

    assert_eq!(memory.lines().len(), 2);
    assert!(memory.contains("still delivered"));

    let metrics = logger.metrics();
    assert_eq!(metrics.lines_emitted(), 2);
    assert_eq!(metrics.sink_failures(), 4);
    assert_eq!(metrics.sink_deliveries(), 2);
    assert!(metrics.sink_failure_rate() > 60.0);
}

#[test]
fn test_net_category_example() {
    define_log_category!(static NET, "Net", Severity::Warning, Severity::Warning);

    let logger = Logger::new();
    let first = Arc::new(MemorySink::new(8));
    let second = Arc::new(MemorySink::new(8));
    logger.register_sink(first.clone());
    logger.register_sink(second.clone());

    log!(logger, NET, Severity::Log, "connected");
    assert!(first.is_empty());
    assert!(second.is_empty());

    error!(logger, NET, "dropped");
    for sink in [&first, &second] {
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERR"));
        assert!(lines[0].contains("Net"));
    }

    assert_eq!(NET.set_active_level(Severity::VeryVerbose), Severity::Warning);
    assert_eq!(NET.active_level(), Severity::Warning);

    log!(logger, NET, Severity::Log, "connected again");
    assert_eq!(first.len(), 1);
}

#[test]
fn test_line_shape() {
    static SHAPE: LogCategory = LogCategory::new("Shape", Severity::Log, Severity::Log);

    let memory = Arc::new(MemorySink::new(4));
    let logger = Logger::builder()
        .timestamp_source(TimestampSource::Utc)
        .sink(memory.clone())
        .build()
        .expect("default settings are valid");

    warning!(logger, SHAPE, "low disk space: {}%", 93);

    let lines = memory.lines();
    let line = &lines[0];
    assert!(line.starts_with('['));
    assert!(line.ends_with("]: WRN: Shape      : low disk space: 93%\n"));

    // [YYYY.MM.DD-HH.MM.SS:mmm]
    let timestamp = &line[1..line.find(']').expect("closing bracket")];
    assert_eq!(timestamp.len(), 23);
    assert_eq!(&timestamp[4..5], ".");
    assert_eq!(&timestamp[10..11], "-");
    assert_eq!(&timestamp[19..20], ":");
}

#[test]
fn test_log_injection_prevention() {
    static INJECT: LogCategory = LogCategory::new("Inject", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let memory = Arc::new(MemorySink::new(4));
    logger.register_sink(memory.clone());

    let malicious = "User login\n[2024.10.17-00.00.00:000]: ERR: Auth       : fake\r\nmore";
    logger.emit(here(), &INJECT, Severity::Log, format_args!("{}", malicious));

    let lines = memory.lines();
    let line = &lines[0];
    assert_eq!(line.matches('\n').count(), 1);
    assert!(!line.contains('\r'));
    assert!(line.contains("User login\\n[2024"));
    assert!(line.contains("fake\\r\\nmore"));
}

#[test]
fn test_long_message_truncated() {
    static LONG: LogCategory = LogCategory::new("Long", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let memory = Arc::new(MemorySink::new(4));
    logger.register_sink(memory.clone());

    let message = "x".repeat(20_000);
    logger.emit(here(), &LONG, Severity::Log, format_args!("{}", message));

    let lines = memory.lines();
    let line = &lines[0];
    assert!(line.len() <= DEFAULT_MAX_LINE_LEN);
    assert!(line.ends_with("x\n"));
    assert_eq!(line.matches('\n').count(), 1);
    assert_eq!(logger.metrics().lines_truncated(), 1);
}

static REENTRANT_LOGGER: Logger = Logger::new();
static REENTRANT: LogCategory = LogCategory::new("Reentrant", Severity::Log, Severity::Log);

/// Emits through the logger that is currently dispatching to it.
struct EchoSink;

impl LogSink for EchoSink {
    fn receive(&self, _record: &LogRecord<'_>) -> Result<()> {
        REENTRANT_LOGGER.emit(
            SourceLocation::new(file!(), line!()),
            &REENTRANT,
            Severity::Error,
            format_args!("echo"),
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

#[test]
fn test_reentrant_emit_does_not_recurse() {
    let memory = Arc::new(MemorySink::new(8));
    let _echo = REENTRANT_LOGGER.attach(Arc::new(EchoSink));
    let _memory = REENTRANT_LOGGER.attach(memory.clone());

    REENTRANT_LOGGER.emit(here(), &REENTRANT, Severity::Log, format_args!("outer"));

    assert_eq!(memory.lines().len(), 1);
    assert!(memory.contains("outer"));
    assert_eq!(REENTRANT_LOGGER.metrics().reentrant_emits(), 1);
}

static EDITING_LOGGER: Logger = Logger::new();
static EDITING: LogCategory = LogCategory::new("Editing", Severity::Log, Severity::Log);

/// On its first line, registers `late` and unregisters itself.
struct HandoffSink {
    own_id: Mutex<Option<SinkId>>,
    late: Arc<MemorySink>,
    seen: Mutex<usize>,
}

impl LogSink for HandoffSink {
    fn receive(&self, _record: &LogRecord<'_>) -> Result<()> {
        *self.seen.lock() += 1;
        if let Some(id) = self.own_id.lock().take() {
            EDITING_LOGGER.register_sink(self.late.clone());
            EDITING_LOGGER.unregister_sink(id);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "handoff"
    }
}

#[test]
fn test_registry_edits_from_sink_are_deferred() {
    let late = Arc::new(MemorySink::new(8));
    let handoff = Arc::new(HandoffSink {
        own_id: Mutex::new(None),
        late: late.clone(),
        seen: Mutex::new(0),
    });
    let id = EDITING_LOGGER.register_sink(handoff.clone());
    *handoff.own_id.lock() = Some(id);

    EDITING_LOGGER.emit(here(), &EDITING, Severity::Log, format_args!("one"));
    assert!(late.is_empty(), "registration applies after the fan-out");
    assert!(!EDITING_LOGGER.sinks().contains(id));

    EDITING_LOGGER.emit(here(), &EDITING, Severity::Log, format_args!("two"));
    assert_eq!(*handoff.seen.lock(), 1);
    assert_eq!(late.lines().len(), 1);
    assert!(late.contains("two"));
}

static FLUSHING_LOGGER: Logger = Logger::new();
static FLUSHING: LogCategory = LogCategory::new("Flushing", Severity::Log, Severity::Log);

/// Flushes the logger it is registered on for every Error line.
struct SelfFlushingSink {
    flushes: AtomicUsize,
    len_seen: AtomicUsize,
}

impl LogSink for SelfFlushingSink {
    fn receive(&self, record: &LogRecord<'_>) -> Result<()> {
        self.len_seen
            .store(FLUSHING_LOGGER.sinks().len(), Ordering::SeqCst);
        if record.severity == Severity::Error {
            FLUSHING_LOGGER.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "self-flushing"
    }
}

#[test]
fn test_flush_from_sink_runs_after_fan_out() {
    let sink = Arc::new(SelfFlushingSink {
        flushes: AtomicUsize::new(0),
        len_seen: AtomicUsize::new(0),
    });
    let _guard = FLUSHING_LOGGER.attach(sink.clone());

    let (done, finished) = mpsc::channel();
    thread::spawn(move || {
        FLUSHING_LOGGER.emit(
            SourceLocation::new(file!(), line!()),
            &FLUSHING,
            Severity::Error,
            format_args!("flush me"),
        );
        let _ = done.send(());
    });

    finished
        .recv_timeout(Duration::from_secs(5))
        .expect("emit returned");
    assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);
    assert_eq!(sink.len_seen.load(Ordering::SeqCst), 1);
    assert_eq!(FLUSHING_LOGGER.metrics().sink_deliveries(), 1);
}

static TEARDOWN_LOGGER: Logger = Logger::new();
static TEARDOWN: LogCategory = LogCategory::new("Teardown", Severity::Log, Severity::Log);

/// Logs from a thread-local destructor.
struct LogsOnExit;

impl Drop for LogsOnExit {
    fn drop(&mut self) {
        TEARDOWN_LOGGER.emit(
            SourceLocation::new(file!(), line!()),
            &TEARDOWN,
            Severity::Log,
            format_args!("worker exiting"),
        );
    }
}

thread_local! {
    static EXIT_HOOK: LogsOnExit = const { LogsOnExit };
}

#[test]
fn test_emit_from_thread_local_destructor() {
    let memory = Arc::new(MemorySink::new(8));
    let _guard = TEARDOWN_LOGGER.attach(memory.clone());

    thread::spawn(|| {
        // Registered before the logger's own thread-local, so destroyed after it.
        EXIT_HOOK.with(|_| {});
        TEARDOWN_LOGGER.emit(
            SourceLocation::new(file!(), line!()),
            &TEARDOWN,
            Severity::Log,
            format_args!("worker running"),
        );
    })
    .join()
    .expect("worker thread exits cleanly");

    assert!(memory.contains("worker running"));
    assert!(memory.contains("worker exiting"));
}

#[test]
fn test_guard_unregisters_on_drop() {
    static GUARDED: LogCategory = LogCategory::new("Guarded", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let memory = Arc::new(MemorySink::new(8));
    {
        let guard = logger.attach(memory.clone());
        assert!(logger.sinks().contains(guard.id()));
        logger.emit(here(), &GUARDED, Severity::Log, format_args!("inside"));
    }
    logger.emit(here(), &GUARDED, Severity::Log, format_args!("outside"));

    assert!(logger.sinks().is_empty());
    assert_eq!(memory.lines().len(), 1);
}

#[test]
fn test_guard_unregisters_during_unwind() {
    static UNWIND: LogCategory = LogCategory::new("Unwind", Severity::Log, Severity::Log);

    let logger = Logger::new();
    let memory = Arc::new(MemorySink::new(8));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = logger.attach(memory.clone());
        panic!("owner failed");
    }));
    assert!(result.is_err());

    logger.emit(here(), &UNWIND, Severity::Log, format_args!("after"));
    assert!(memory.is_empty());
}

#[test]
fn test_writer_sink_to_file() {
    static FILE: LogCategory = LogCategory::new("File", Severity::Log, Severity::Log);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("pipeline.log");
    let file = fs::File::create(&path).expect("Failed to create log file");

    let logger = Logger::new();
    logger.register_sink(Arc::new(WriterSink::new("file", file)));

    for i in 0..5 {
        log!(logger, FILE, Severity::Log, "Message {}", i);
    }
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[4].ends_with(": LOG: File       : Message 4"));
}

#[test]
fn test_global_logger_and_configure() {
    define_log_category!(static CONFIGURED, "IntegrationConfigured", Severity::Warning, Severity::Verbose);

    let memory = Arc::new(MemorySink::new(16));
    let _guard = Logger::global().attach(memory.clone());

    let config = LoggerConfig::from_directives("IntegrationConfigured=VeryVerbose")
        .expect("valid directive");
    // Not registered yet: kept pending.
    assert_eq!(configure(&config), 0);

    CategoryRegistry::global()
        .register(&CONFIGURED)
        .expect("unique name");
    assert_eq!(CONFIGURED.active_level(), Severity::Verbose);

    log!(Logger::global(), CONFIGURED, Severity::Verbose, "visible now");
    log!(Logger::global(), CONFIGURED, Severity::VeryVerbose, "still hidden");

    let ours: Vec<String> = memory
        .records()
        .into_iter()
        .filter(|r| r.category == "IntegrationConfigured")
        .map(|r| r.line)
        .collect();
    assert_eq!(ours.len(), 1);
    assert!(ours[0].ends_with("visible now\n"));

    assert_eq!(
        CategoryRegistry::global()
            .set_level("integrationconfigured", Severity::Error)
            .expect("registered"),
        Severity::Error
    );
}

#[test]
fn test_config_from_json_and_env() {
    let json = r#"{ "timestamp_source": "local", "categories": { "Render": "None" } }"#;
    let config = LoggerConfig::from_json(json).expect("valid json");
    assert_eq!(config.timestamp_source, TimestampSource::Local);
    assert_eq!(config.categories["Render"], Severity::None);

    let round_trip = LoggerConfig::from_json(&config.to_json().expect("serialize"))
        .expect("deserialize");
    assert_eq!(round_trip, config);

    assert!(LoggerConfig::from_json(r#"{ "colour": true }"#).is_err());

    let var = "MULTISINK_LOGGER_INTEGRATION_LEVELS";
    std::env::set_var(var, "Net=Log; Audio Verbose");
    let from_env = LoggerConfig::from_env(var)
        .expect("valid directives")
        .expect("variable set");
    assert_eq!(from_env.categories.len(), 2);
    assert_eq!(from_env.categories["Audio"], Severity::Verbose);
    std::env::remove_var(var);
    assert!(LoggerConfig::from_env(var).expect("unset is fine").is_none());

    assert!(matches!(
        LoggerConfig::from_directives("Net=Loud"),
        Err(LoggerError::InvalidDirective { .. })
    ));
}
