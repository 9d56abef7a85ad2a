//! Caller-correcting facade
//!
//! [`Logger`] exposes one method per severity (plain and `_ctx`) over the
//! base [`Engine`]. Every public entry point is `#[track_caller]`, so the
//! location the engine records is the application's call site. Trace and
//! Fatal additionally go through [`Logger::log_with_source`] and carry a
//! skip-frame annotation that the console renderer uses to re-derive the
//! caller from the live stack.
//!
//! # Example
//!
//! ```
//! use sevlog_core::{attrs, new_console, Destination, Logger, LEVEL_INFO};
//!
//! let log = Logger::new(new_console, Destination::stderr(), false, LEVEL_INFO, false);
//! log.info("listening", &attrs!["port" => 8080u16]);
//! log.debug("not shown", &[]);
//! ```

use std::fmt;
use std::sync::Arc;

use sevlog_core_types::Context;

use crate::engine::{Attr, Destination, Engine, Handler, Level, LevelVar};
use crate::errors::Result;
use crate::levels::{
    parse_level, LEVEL_DEBUG, LEVEL_ERROR, LEVEL_FATAL, LEVEL_INFO, LEVEL_TRACE, LEVEL_WARN,
    STACK_FRAMES,
};

/// Builds a handler chain writing to a destination
///
/// Arguments are the destination, whether to render source locations, the
/// shared threshold and whether to colour output. Returns the chain and the
/// threshold it reads, which is the one passed in.
pub type HandlerFactory = fn(Destination, bool, LevelVar, bool) -> (Arc<dyn Handler>, LevelVar);

/// What Fatal does after the record is written
pub trait Terminate: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Exits the process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Keeps running; used by the capture logger
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExit;

impl Terminate for NoExit {
    fn terminate(&self, _code: i32) {}
}

/// Exit status used by the Fatal methods
pub const FATAL_EXIT_CODE: i32 = 1;

/// The application-facing logger
///
/// `Clone` yields another handle onto the same engine and threshold;
/// [`Logger::copy`] yields an independent logger with the same settings.
#[derive(Clone)]
pub struct Logger {
    engine: Engine,
    factory: HandlerFactory,
    add_source: bool,
    color: bool,
    level: LevelVar,
    destination: Destination,
    terminator: Arc<dyn Terminate>,
}

impl Logger {
    pub fn new(
        factory: HandlerFactory,
        destination: Destination,
        add_source: bool,
        level: Level,
        color: bool,
    ) -> Self {
        let (handler, level) = factory(destination.clone(), add_source, LevelVar::new(level), color);
        Self {
            engine: Engine::new(handler, add_source),
            factory,
            add_source,
            color,
            level,
            destination,
            terminator: Arc::new(ProcessExit),
        }
    }

    /// Replace what Fatal does after logging
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminate>) -> Self {
        self.terminator = terminator;
        self
    }

    #[track_caller]
    pub fn trace(&self, msg: &str, attrs: &[Attr]) {
        self.log_with_source(&Context::background(), LEVEL_TRACE, STACK_FRAMES, msg, attrs);
    }

    #[track_caller]
    pub fn trace_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.log_with_source(ctx, LEVEL_TRACE, STACK_FRAMES, msg, attrs);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, attrs: &[Attr]) {
        self.engine.log(&Context::background(), LEVEL_DEBUG, msg, attrs);
    }

    #[track_caller]
    pub fn debug_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.engine.log(ctx, LEVEL_DEBUG, msg, attrs);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, attrs: &[Attr]) {
        self.engine.log(&Context::background(), LEVEL_INFO, msg, attrs);
    }

    #[track_caller]
    pub fn info_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.engine.log(ctx, LEVEL_INFO, msg, attrs);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, attrs: &[Attr]) {
        self.engine.log(&Context::background(), LEVEL_WARN, msg, attrs);
    }

    #[track_caller]
    pub fn warn_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.engine.log(ctx, LEVEL_WARN, msg, attrs);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, attrs: &[Attr]) {
        self.engine.log(&Context::background(), LEVEL_ERROR, msg, attrs);
    }

    #[track_caller]
    pub fn error_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.engine.log(ctx, LEVEL_ERROR, msg, attrs);
    }

    /// Log at Fatal, then hand over to the terminator (process exit by default)
    #[track_caller]
    pub fn fatal(&self, msg: &str, attrs: &[Attr]) {
        self.log_with_source(&Context::background(), LEVEL_FATAL, STACK_FRAMES, msg, attrs);
        self.terminator.terminate(FATAL_EXIT_CODE);
    }

    #[track_caller]
    pub fn fatal_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.log_with_source(ctx, LEVEL_FATAL, STACK_FRAMES, msg, attrs);
        self.terminator.terminate(FATAL_EXIT_CODE);
    }

    /// Log at an arbitrary level
    #[track_caller]
    pub fn log(&self, ctx: &Context, level: Level, msg: &str, attrs: &[Attr]) {
        self.engine.log(ctx, level, msg, attrs);
    }

    /// Log with a skip-frame annotation when source capture is on
    ///
    /// `frames` counts from the console handler to the code that should be
    /// reported; a direct call from application code is 4 frames away.
    #[track_caller]
    pub fn log_with_source(
        &self,
        ctx: &Context,
        level: Level,
        frames: usize,
        msg: &str,
        attrs: &[Attr],
    ) {
        if self.add_source {
            self.engine.log_skipping(ctx, level, frames, msg, attrs);
        } else {
            self.engine.log(ctx, level, msg, attrs);
        }
    }

    /// A logger that adds `attrs` to every record and shares this one's threshold
    pub fn with(&self, attrs: &[Attr]) -> Logger {
        Logger {
            engine: self.engine.with(attrs),
            ..self.clone()
        }
    }

    /// A logger that nests following attributes under `name`
    pub fn with_group(&self, name: &str) -> Logger {
        Logger {
            engine: self.engine.with_group(name),
            ..self.clone()
        }
    }

    pub fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.engine.enabled(ctx, level)
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        self.engine.handler()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn set_engine(&mut self, engine: Engine) {
        self.engine = engine;
    }

    pub fn level(&self) -> Level {
        self.level.level()
    }

    /// The shared threshold cell
    pub fn level_var(&self) -> &LevelVar {
        &self.level
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    /// Set the threshold from a case-insensitive registered name
    pub fn set_level_str(&self, name: &str) -> Result<()> {
        let level = parse_level(name)?;
        self.level.set(level);
        Ok(())
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    /// Switch source capture on or off
    ///
    /// The engine decides per construction whether to capture a location,
    /// so this rebuilds the handler chain on the same destination and the
    /// same threshold cell. Attributes added through `with` are not carried
    /// over.
    pub fn set_report_caller(&mut self, report: bool) {
        if self.add_source == report {
            return;
        }
        self.add_source = report;
        let (handler, _) = (self.factory)(
            self.destination.clone(),
            report,
            self.level.clone(),
            self.color,
        );
        self.engine = Engine::new(handler, report);
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// An independent logger with the same factory, destination, settings
    /// and terminator, and its own threshold starting at the current value
    pub fn copy(&self) -> Logger {
        Logger::new(
            self.factory,
            self.destination.clone(),
            self.add_source,
            self.level(),
            self.color,
        )
        .with_terminator(Arc::clone(&self.terminator))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
