#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{buffered_logger, RecordingExit, SharedBuf};
use sevlog_core::{
    attrs, new_console, Context, Destination, Logger, LEVEL_DEBUG, LEVEL_FATAL, LEVEL_INFO,
    LEVEL_TRACE, LEVEL_WARN,
};

fn sourced() -> (Logger, SharedBuf) {
    let (log, buf) = buffered_logger(new_console, true, LEVEL_TRACE);
    (log.with_terminator(Arc::new(RecordingExit::default())), buf)
}

fn assert_located(buf: &SharedBuf, line: u32) {
    let out = buf.contents();
    let expected = format!("console_tests.rs:{} ", line);
    assert!(out.contains(&expected), "expected {:?} in {:?}", expected, out);
    assert!(!out.contains("facade.rs"), "wrapper frame leaked: {:?}", out);
}

#[test]
fn test_labels_without_timestamp() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_TRACE);
    log.info("hello", &attrs!["user" => "ada lovelace"]);
    assert_eq!(buf.lines(), vec![r#"INFO  hello user="ada lovelace""#]);
}

#[test]
fn test_colored_labels() {
    let buf = SharedBuf::default();
    let log = Logger::new(new_console, Destination::new(buf.clone()), false, LEVEL_TRACE, true);
    log.warn("careful", &[]);
    log.trace("fine", &[]);
    assert_eq!(
        buf.lines(),
        vec!["\x1b[33mWARN \x1b[0m careful", "\x1b[32mTRACE\x1b[0m fine"]
    );
}

#[test]
fn test_plain_entry_points_report_call_site() {
    let (log, buf) = sourced();
    let line = line!() + 1;
    log.info("here", &[]);
    assert_located(&buf, line);
}

#[test]
fn test_trace_reports_call_site() {
    let (log, buf) = sourced();
    let line = line!() + 1;
    log.trace("here", &[]);
    assert_located(&buf, line);
    assert!(buf.contents().starts_with("TRACE "));
}

#[test]
fn test_trace_ctx_reports_call_site() {
    let (log, buf) = sourced();
    let ctx = Context::background();
    let line = line!() + 1;
    log.trace_ctx(&ctx, "here", &[]);
    assert_located(&buf, line);
}

#[test]
fn test_fatal_reports_call_site() {
    let (log, buf) = sourced();
    let line = line!() + 1;
    log.fatal("here", &[]);
    assert_located(&buf, line);
    assert!(buf.contents().starts_with("FATAL "));
}

#[test]
fn test_fatal_ctx_reports_call_site() {
    let (log, buf) = sourced();
    let ctx = Context::background();
    let line = line!() + 1;
    log.fatal_ctx(&ctx, "here", &[]);
    assert_located(&buf, line);
}

#[test]
fn test_direct_log_with_source_is_four_frames_away() {
    let (log, buf) = sourced();
    let ctx = Context::background();
    let line = line!() + 1;
    log.log_with_source(&ctx, LEVEL_WARN, 4, "here", &[]);
    assert_located(&buf, line);
}

// Needs symbolised frames; without debug info the recorded location is kept
#[cfg(debug_assertions)]
#[test]
fn test_skip_one_reports_dispatch() {
    let (log, buf) = sourced();
    log.log_with_source(&Context::background(), LEVEL_INFO, 1, "inside", &[]);
    assert!(buf.contents().contains("engine/mod.rs:"), "{:?}", buf.contents());
}

#[test]
fn test_zero_skip_keeps_recorded_location() {
    let (log, buf) = sourced();
    let line = line!() + 1;
    log.log_with_source(&Context::background(), LEVEL_DEBUG, 0, "here", &[]);
    assert_located(&buf, line);
}

#[test]
fn test_no_source_without_add_source() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_TRACE);
    log.log_with_source(&Context::background(), LEVEL_FATAL, 5, "bare", &[]);
    assert_eq!(buf.lines(), vec!["FATAL bare"]);
}

#[test]
fn test_unregistered_level_passes_through() {
    let (log, buf) = buffered_logger(new_console, false, LEVEL_TRACE);
    log.log(&Context::background(), sevlog_core::Level::new(2), "odd", &[]);
    assert_eq!(buf.lines(), vec!["INFO+2 odd"]);
}
