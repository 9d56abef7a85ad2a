//! `tracing` to [`Logger`] bridge
//!
//! Lets code that logs through `tracing` macros share the facade's
//! threshold and renderers. The crate's own diagnostics use `sevlog::*`
//! targets and are never forwarded, so a handler failure reported through
//! `tracing` cannot loop back into the handler.

use std::fmt;

use sevlog_core_types::Context;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context as LayerContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::engine::{Attr, Level, Record, Source, Value};
use crate::facade::Logger;
use crate::levels::{LEVEL_DEBUG, LEVEL_ERROR, LEVEL_INFO, LEVEL_TRACE, LEVEL_WARN};

const OWN_TARGET: &str = "sevlog";

/// True for the crate's own diagnostic targets (`sevlog`, `sevlog::*`);
/// module paths such as `sevlog_core::..` or `sevlog_app` do not match
pub(crate) fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Registry severity for a `tracing` level
pub fn level_from_tracing(level: tracing::Level) -> Level {
    match level {
        tracing::Level::ERROR => LEVEL_ERROR,
        tracing::Level::WARN => LEVEL_WARN,
        tracing::Level::INFO => LEVEL_INFO,
        tracing::Level::DEBUG => LEVEL_DEBUG,
        _ => LEVEL_TRACE,
    }
}

/// Forwards `tracing` events to a [`Logger`]
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: impl Into<Value>) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let ctx = Context::background();
        let level = level_from_tracing(*metadata.level());
        if !self.logger.enabled(&ctx, level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = Record::new(level, visitor.message.unwrap_or_default());
        record.attrs = visitor.attrs;
        if self.logger.add_source() {
            if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
                record.source = Some(Source {
                    file: file.to_string(),
                    function: metadata.module_path().unwrap_or_default().to_string(),
                    line,
                });
            }
        }
        self.logger.engine().emit(&ctx, record);
    }
}
