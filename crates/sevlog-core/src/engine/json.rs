//! Structured handler: one JSON object per line

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use sevlog_core_types::schema::{
    LEVEL_KEY, MESSAGE_KEY, SOURCE_FILE_KEY, SOURCE_FUNCTION_KEY, SOURCE_KEY, SOURCE_LINE_KEY,
    TIME_KEY,
};
use sevlog_core_types::Context;

use super::handler::{Destination, Handler, HandlerOptions, Scope};
use super::level::Level;
use super::record::{Record, Source};
use super::value::{Attr, Value};
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct JsonHandler {
    destination: Destination,
    opts: HandlerOptions,
    scope: Scope,
}

impl JsonHandler {
    pub fn new(destination: Destination, opts: HandlerOptions) -> Self {
        Self {
            destination,
            opts,
            scope: Scope::default(),
        }
    }

    /// Build the object for one record
    pub fn encode(&self, record: &Record) -> Map<String, JsonValue> {
        let mut object = Map::new();

        for builtin in [
            Attr::new(TIME_KEY, record.time),
            Attr::new(LEVEL_KEY, record.level),
        ] {
            if let Some(attr) = self.opts.replace(&[], builtin) {
                object.insert(attr.key, attr.value.to_json());
            }
        }
        if self.opts.add_source {
            if let Some(source) = &record.source {
                object.insert(SOURCE_KEY.to_string(), source_json(source));
            }
        }
        if let Some(attr) = self
            .opts
            .replace(&[], Attr::new(MESSAGE_KEY, record.message.as_str()))
        {
            object.insert(attr.key, attr.value.to_json());
        }

        for (groups, attr) in &self.scope.preset {
            self.insert_attr(&mut object, groups, attr.clone());
        }
        for attr in &record.attrs {
            self.insert_attr(&mut object, &self.scope.groups, attr.clone());
        }
        object
    }

    fn insert_attr(&self, root: &mut Map<String, JsonValue>, groups: &[String], attr: Attr) {
        if let Value::Group(members) = attr.value {
            let mut nested = groups.to_vec();
            if !attr.key.is_empty() {
                nested.push(attr.key);
            }
            for member in members {
                self.insert_attr(root, &nested, member);
            }
            return;
        }
        if let Some(attr) = self.opts.replace(groups, attr) {
            insert_at(root, groups, attr.key, attr.value.to_json());
        }
    }
}

fn source_json(source: &Source) -> JsonValue {
    let mut object = Map::new();
    object.insert(SOURCE_FILE_KEY.to_string(), JsonValue::from(source.file.as_str()));
    if !source.function.is_empty() {
        object.insert(
            SOURCE_FUNCTION_KEY.to_string(),
            JsonValue::from(source.function.as_str()),
        );
    }
    object.insert(SOURCE_LINE_KEY.to_string(), JsonValue::from(source.line));
    JsonValue::Object(object)
}

/// Insert under a nested object path, creating intermediate objects
fn insert_at(map: &mut Map<String, JsonValue>, path: &[String], key: String, value: JsonValue) {
    match path.split_first() {
        None => {
            map.insert(key, value);
        }
        Some((head, rest)) => {
            let slot = map
                .entry(head.clone())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !slot.is_object() {
                *slot = JsonValue::Object(Map::new());
            }
            if let JsonValue::Object(child) = slot {
                insert_at(child, rest, key, value);
            }
        }
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.opts.level.level()
    }

    fn handle(&self, _ctx: &Context, record: &Record) -> Result<()> {
        let mut line = serde_json::to_vec(&self.encode(record))?;
        line.push(b'\n');
        self.destination.write_record(&line)?;
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(Self {
            scope: self.scope.with_attrs(attrs),
            ..self.clone()
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(Self {
            scope: self.scope.with_group(name),
            ..self.clone()
        })
    }
}
