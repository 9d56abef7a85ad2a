//! Base logging engine
//!
//! A fixed-arity leveled logger: it accepts a level, a message and a list of
//! attributes, captures the caller's location when configured to, and hands
//! the resulting [`Record`] to a pluggable [`Handler`].

pub mod handler;
pub mod json;
pub mod level;
pub mod record;
pub mod text;
pub mod value;

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use sevlog_core_types::Context;

pub use handler::{Destination, Handler, HandlerOptions, ReplaceAttr};
pub use json::JsonHandler;
pub use level::{Level, LevelVar};
pub use record::{Record, Source};
pub use text::{TextHandler, KITCHEN};
pub use value::{Attr, Value};

/// The base logger
///
/// Whether a source location is captured per record is fixed at
/// construction; switching it means building a new engine.
#[derive(Clone)]
pub struct Engine {
    handler: Arc<dyn Handler>,
    add_source: bool,
}

impl Engine {
    pub fn new(handler: Arc<dyn Handler>, add_source: bool) -> Self {
        Self {
            handler,
            add_source,
        }
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler)
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    pub fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.handler.enabled(ctx, level)
    }

    #[track_caller]
    pub fn log(&self, ctx: &Context, level: Level, msg: &str, attrs: &[Attr]) {
        self.dispatch(ctx, level, None, msg, attrs, Location::caller());
    }

    /// Like [`Engine::log`], annotating the record with how many frames
    /// above the handler the true caller sits
    #[track_caller]
    pub fn log_skipping(
        &self,
        ctx: &Context,
        level: Level,
        frames: usize,
        msg: &str,
        attrs: &[Attr],
    ) {
        self.dispatch(ctx, level, Some(frames), msg, attrs, Location::caller());
    }

    /// Deliver a record built elsewhere, e.g. by the tracing bridge
    pub fn emit(&self, ctx: &Context, record: Record) {
        if !self.handler.enabled(ctx, record.level) {
            return;
        }
        if let Err(err) = self.handler.handle(ctx, &record) {
            tracing::warn!(target: "sevlog::engine", code = err.code(), error = %err, "handler failed");
        }
    }

    pub fn with(&self, attrs: &[Attr]) -> Engine {
        if attrs.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_attrs(attrs), self.add_source)
    }

    pub fn with_group(&self, name: &str) -> Engine {
        if name.is_empty() {
            return self.clone();
        }
        Self::new(self.handler.with_group(name), self.add_source)
    }

    // Caller correction counts frames from here: keep the handler call
    // directly in this function and never inline it.
    #[inline(never)]
    fn dispatch(
        &self,
        ctx: &Context,
        level: Level,
        skip_frames: Option<usize>,
        msg: &str,
        attrs: &[Attr],
        location: &'static Location<'static>,
    ) {
        if !self.handler.enabled(ctx, level) {
            return;
        }
        let mut record = Record::new(level, msg);
        record.attrs = attrs.to_vec();
        if self.add_source {
            record.source = Some(Source::from(location));
        }
        record.skip_frames = skip_frames;
        if let Err(err) = self.handler.handle(ctx, &record) {
            tracing::warn!(target: "sevlog::engine", code = err.code(), error = %err, "handler failed");
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("add_source", &self.add_source)
            .finish_non_exhaustive()
    }
}
