#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{buffered_logger, RecordingExit};
use sevlog_core::{
    attrs, new_console, new_json, Attr, Context, Destination, ErrorKind, Handler, Level, LevelVar,
    Logger, Record, LEVEL_DEBUG, LEVEL_ERROR, LEVEL_FATAL, LEVEL_INFO, LEVEL_TRACE, LEVEL_WARN,
};

#[test]
fn test_threshold_gates_output() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_WARN);
    log.trace("t", &[]);
    log.debug("d", &[]);
    log.info("i", &[]);
    log.warn("w", &[]);
    log.error("e", &[]);
    assert_eq!(buf.lines(), vec!["WARN  w", "ERROR e"]);
}

#[test]
fn test_trace_threshold_lets_everything_through() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_TRACE);
    log.trace("t", &[]);
    log.debug("d", &attrs!["n" => 1i64]);
    assert_eq!(buf.lines(), vec!["TRACE t", "DEBUG d n=1"]);
}

#[test]
fn test_set_level_takes_effect_immediately() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    log.debug("hidden", &[]);
    log.set_level(LEVEL_DEBUG);
    log.debug("shown", &[]);
    assert_eq!(log.level(), LEVEL_DEBUG);
    assert_eq!(buf.lines(), vec!["DEBUG shown"]);
}

#[test]
fn test_set_level_str() {
    let (log, _) = buffered_logger(new_console, false, LEVEL_INFO);
    log.set_level_str("fatal").unwrap();
    assert_eq!(log.level(), LEVEL_FATAL);
    log.set_level_str("Trace").unwrap();
    assert_eq!(log.level(), LEVEL_TRACE);
}

#[test]
fn test_set_level_str_invalid_leaves_state() {
    let (log, _) = buffered_logger(new_console, false, LEVEL_WARN);
    let err = log.set_level_str("loud").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLevel);
    assert_eq!(err.to_string(), "invalid log level: loud");
    assert_eq!(log.level(), LEVEL_WARN);
}

#[test]
fn test_accessors() {
    let buf = common::SharedBuf::default();
    let dest = Destination::new(buf);
    let log = Logger::new(new_json, dest.clone(), true, LEVEL_ERROR, true);
    assert!(log.add_source());
    assert!(log.color());
    assert!(log.destination().same_as(&dest));
    assert!(log.enabled(&Context::background(), LEVEL_FATAL));
    assert!(!log.enabled(&Context::background(), LEVEL_WARN));
}

#[test]
fn test_set_report_caller_keeps_level_var() {
    let (mut log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    let var = log.level_var().clone();
    let before = log.handler();

    log.set_report_caller(true);
    assert!(log.add_source());
    assert!(log.level_var().shares_with(&var));
    assert!(!Arc::ptr_eq(&before, &log.handler()));

    var.set(LEVEL_DEBUG);
    let line = line!() + 1;
    log.debug("located", &[]);
    assert_eq!(buf.lines(), vec![format!("DEBUG tests/facade_tests.rs:{} located", line)]);
}

#[test]
fn test_set_report_caller_off() {
    let (mut log, buf) = buffered_logger(new_console, true, LEVEL_INFO);
    log.set_report_caller(false);
    log.info("plain", &[]);
    assert_eq!(buf.lines(), vec!["INFO  plain"]);
}

#[test]
fn test_clone_shares_threshold() {
    let (log, _) = buffered_logger(new_console, false, LEVEL_INFO);
    let handle = log.clone();
    handle.set_level(LEVEL_ERROR);
    assert_eq!(log.level(), LEVEL_ERROR);
}

#[test]
fn test_copy_is_decoupled() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    let copy = log.copy();
    assert_eq!(copy.level(), LEVEL_INFO);
    assert!(!copy.level_var().shares_with(log.level_var()));
    assert!(copy.destination().same_as(log.destination()));

    copy.set_level(LEVEL_ERROR);
    assert_eq!(log.level(), LEVEL_INFO);
    copy.info("dropped", &[]);
    log.info("kept", &[]);
    assert_eq!(buf.lines(), vec!["INFO  kept"]);
}

#[test]
fn test_with_and_with_group() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    let req = log.with(&attrs!["id" => "r1"]).with_group("http");
    req.info("done", &attrs!["status" => 200u16]);
    assert_eq!(buf.lines(), vec!["INFO  done id=r1 http.status=200"]);

    // derived loggers share the threshold
    log.set_level(LEVEL_ERROR);
    req.info("hidden", &[]);
    assert_eq!(buf.lines().len(), 1);
}

#[test]
fn test_fatal_terminates_after_logging() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    let exits = Arc::new(RecordingExit::default());
    let log = log.with_terminator(exits.clone());

    log.fatal("giving up", &[Attr::error("boom")]);
    log.fatal_ctx(&Context::background(), "again", &[]);

    assert_eq!(*exits.0.lock().unwrap(), vec![1, 1]);
    assert_eq!(buf.lines(), vec!["FATAL giving up error=boom", "FATAL again"]);
}

#[test]
fn test_fatal_terminates_even_when_filtered() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_INFO);
    log.set_level(Level::new(100));
    let exits = Arc::new(RecordingExit::default());
    let log = log.with_terminator(exits.clone());
    log.fatal("quiet", &[]);
    assert_eq!(*exits.0.lock().unwrap(), vec![1]);
    assert!(buf.contents().is_empty());
}

#[test]
fn test_log_at_arbitrary_level() {
    let (log, buf) = buffered_logger(new_json, false, LEVEL_INFO);
    log.log(&Context::background(), Level::new(6), "between", &[]);
    let line: serde_json::Value = serde_json::from_str(&buf.lines()[0]).unwrap();
    assert_eq!(line["level"], "WARN+2");
}

/// Records the context every call receives
struct SeenContexts {
    level: LevelVar,
    seen: Arc<Mutex<Vec<bool>>>,
}

impl Handler for SeenContexts {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.level.level()
    }

    fn handle(&self, ctx: &Context, _record: &Record) -> sevlog_core::Result<()> {
        self.seen.lock().unwrap().push(ctx.deadline().is_some());
        Ok(())
    }

    fn with_attrs(&self, _attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(Self {
            level: self.level.clone(),
            seen: Arc::clone(&self.seen),
        })
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        self.with_attrs(&[])
    }
}

// Factories are plain fns, so the recorder is handed over through a static
static SEEN: Mutex<Option<Arc<Mutex<Vec<bool>>>>> = Mutex::new(None);

fn seen_factory(
    _dest: Destination,
    _add_source: bool,
    level: LevelVar,
    _color: bool,
) -> (Arc<dyn Handler>, LevelVar) {
    let seen = SEEN.lock().unwrap().clone().unwrap();
    let handler = SeenContexts {
        level: level.clone(),
        seen,
    };
    (Arc::new(handler), level)
}

#[test]
fn test_context_passed_through_unmodified() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    *SEEN.lock().unwrap() = Some(Arc::clone(&seen));

    let log = Logger::new(seen_factory, Destination::new(std::io::sink()), false, LEVEL_TRACE, false)
        .with_terminator(Arc::new(RecordingExit::default()));
    let ctx = Context::background().with_timeout(Duration::from_secs(30));

    log.trace_ctx(&ctx, "t", &[]);
    log.debug_ctx(&ctx, "d", &[]);
    log.info_ctx(&ctx, "i", &[]);
    log.warn_ctx(&ctx, "w", &[]);
    log.error_ctx(&ctx, "e", &[]);
    log.fatal_ctx(&ctx, "f", &[]);
    log.info("plain", &[]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 7);
    assert!(seen[..6].iter().all(|has_deadline| *has_deadline));
    assert!(!seen[6]);
}
