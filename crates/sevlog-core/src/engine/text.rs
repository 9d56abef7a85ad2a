//! Base text formatter
//!
//! Renders `time level source msg key=value ...` on one line. Values that
//! contain whitespace, quotes, `=` or control characters are quoted.

use std::sync::Arc;

use sevlog_core_types::schema::{LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use sevlog_core_types::Context;

use super::handler::{Destination, Handler, HandlerOptions, Scope};
use super::level::Level;
use super::record::Record;
use super::value::{format_rfc3339, Attr, Value};
use crate::errors::Result;

/// Clock-only time, `3:04PM`
pub const KITCHEN: &str = "%-I:%M%p";

#[derive(Debug, Clone)]
pub struct TextHandler {
    destination: Destination,
    opts: HandlerOptions,
    scope: Scope,
}

impl TextHandler {
    pub fn new(destination: Destination, opts: HandlerOptions) -> Self {
        Self {
            destination,
            opts,
            scope: Scope::default(),
        }
    }

    pub(crate) fn scoped_attrs(&self, attrs: &[Attr]) -> Self {
        Self {
            scope: self.scope.with_attrs(attrs),
            ..self.clone()
        }
    }

    pub(crate) fn scoped_group(&self, name: &str) -> Self {
        Self {
            scope: self.scope.with_group(name),
            ..self.clone()
        }
    }

    /// Render one record without the trailing newline
    pub fn render(&self, record: &Record) -> String {
        let mut line = Line::default();

        if let Some(attr) = self.opts.replace(&[], Attr::new(TIME_KEY, record.time)) {
            line.push(&self.builtin_text(&attr.value));
        }
        if let Some(attr) = self.opts.replace(&[], Attr::new(LEVEL_KEY, record.level)) {
            line.push(&self.builtin_text(&attr.value));
        }
        if self.opts.add_source {
            if let Some(source) = &record.source {
                let attr = Attr::new(SOURCE_KEY, source.short());
                if let Some(attr) = self.opts.replace(&[], attr) {
                    line.push(&self.builtin_text(&attr.value));
                }
            }
        }
        if let Some(attr) = self
            .opts
            .replace(&[], Attr::new(MESSAGE_KEY, record.message.as_str()))
        {
            line.push(&self.builtin_text(&attr.value));
        }

        for (groups, attr) in &self.scope.preset {
            self.append_attr(&mut line, groups, attr.clone());
        }
        for attr in &record.attrs {
            self.append_attr(&mut line, &self.scope.groups, attr.clone());
        }
        line.0
    }

    fn builtin_text(&self, value: &Value) -> String {
        match value {
            Value::Time(t) => match &self.opts.time_format {
                Some(format) => t.format(format).to_string(),
                None => format_rfc3339(t),
            },
            other => other.to_string(),
        }
    }

    fn append_attr(&self, line: &mut Line, groups: &[String], attr: Attr) {
        if let Value::Group(members) = attr.value {
            let mut nested = groups.to_vec();
            if !attr.key.is_empty() {
                nested.push(attr.key);
            }
            for member in members {
                self.append_attr(line, &nested, member);
            }
            return;
        }
        let Some(attr) = self.opts.replace(groups, attr) else {
            return;
        };
        let mut key = groups.join(".");
        if !key.is_empty() {
            key.push('.');
        }
        key.push_str(&attr.key);
        line.push(&format!("{}={}", key, quote(&self.builtin_text(&attr.value))));
    }
}

impl Handler for TextHandler {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.opts.level.level()
    }

    fn handle(&self, _ctx: &Context, record: &Record) -> Result<()> {
        let mut line = self.render(record);
        line.push('\n');
        self.destination.write_record(line.as_bytes())?;
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(self.scoped_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.scoped_group(name))
    }
}

/// Space-separated line builder that skips empty fields
#[derive(Default)]
struct Line(String);

impl Line {
    fn push(&mut self, field: &str) {
        if field.is_empty() {
            return;
        }
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(field);
    }
}

fn quote(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=');
    if needs_quotes {
        format!("{:?}", text)
    } else {
        text.to_string()
    }
}
