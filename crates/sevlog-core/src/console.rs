//! Console renderer
//!
//! Human-readable, timestamp-free lines for interactive terminals. Wraps the
//! base [`TextHandler`]: recolours the level, drops the structured time and
//! fixes up the source location of records that went through an extra
//! wrapper layer before reaching the engine.

use std::sync::Arc;

use sevlog_core_types::schema::{LEVEL_KEY, TIME_KEY};
use sevlog_core_types::Context;

use crate::engine::{
    Attr, Destination, Handler, HandlerOptions, Level, LevelVar, Record, ReplaceAttr,
    TextHandler, Value, KITCHEN,
};
use crate::errors::Result;
use crate::frames;
use crate::levels::level_color;

#[derive(Debug, Clone)]
pub struct ConsoleHandler {
    inner: TextHandler,
}

impl ConsoleHandler {
    pub fn new(destination: Destination, opts: HandlerOptions) -> Self {
        Self {
            inner: TextHandler::new(destination, opts),
        }
    }
}

impl Handler for ConsoleHandler {
    fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.inner.enabled(ctx, level)
    }

    fn handle(&self, ctx: &Context, record: &Record) -> Result<()> {
        match record.skip_frames {
            Some(skip) if skip > 0 => {
                let mut fixed = record.clone();
                fixed.skip_frames = None;
                if let Some(source) = frames::caller(skip) {
                    fixed.source = Some(source);
                }
                self.inner.handle(ctx, &fixed)
            }
            _ => self.inner.handle(ctx, record),
        }
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(Self {
            inner: self.inner.scoped_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(Self {
            inner: self.inner.scoped_group(name),
        })
    }
}

/// Replace hook for console output: no time field, coloured fixed-width
/// level labels for every registered severity
pub fn replace_console(color: bool) -> ReplaceAttr {
    Arc::new(move |groups: &[String], attr: Attr| {
        if !groups.is_empty() {
            return Some(attr);
        }
        if attr.key == TIME_KEY {
            return None;
        }
        if attr.key == LEVEL_KEY {
            if let Value::Level(level) = attr.value {
                if let Some(lc) = level_color(level) {
                    return Some(Attr::new(LEVEL_KEY, lc.label(color)));
                }
            }
        }
        Some(attr)
    })
}

/// Handler factory for the console chain
pub fn new_console(
    destination: Destination,
    add_source: bool,
    level: LevelVar,
    color: bool,
) -> (Arc<dyn Handler>, LevelVar) {
    let opts = HandlerOptions {
        level: level.clone(),
        add_source,
        replace_attr: Some(replace_console(color)),
        time_format: Some(KITCHEN.to_string()),
    };
    (Arc::new(ConsoleHandler::new(destination, opts)), level)
}
