//! Machine-readable output chain
//!
//! One JSON object per line with the registered level names, as consumed
//! by the capture logger's decoder and by log shippers.

use std::sync::Arc;

use sevlog_core_types::schema::LEVEL_KEY;

use crate::engine::{Attr, Destination, Handler, HandlerOptions, JsonHandler, LevelVar, ReplaceAttr, Value};
use crate::levels::level_name;

/// Replace hook that spells registered severities by their canonical name
pub fn replace_json() -> ReplaceAttr {
    Arc::new(|groups: &[String], attr: Attr| {
        if groups.is_empty() && attr.key == LEVEL_KEY {
            if let Value::Level(level) = attr.value {
                if let Some(name) = level_name(level) {
                    return Some(Attr::new(LEVEL_KEY, name));
                }
            }
        }
        Some(attr)
    })
}

/// Handler factory for the structured chain; `color` is ignored
pub fn new_json(
    destination: Destination,
    add_source: bool,
    level: LevelVar,
    _color: bool,
) -> (Arc<dyn Handler>, LevelVar) {
    let opts = HandlerOptions {
        level: level.clone(),
        add_source,
        replace_attr: Some(replace_json()),
        time_format: None,
    };
    (Arc::new(JsonHandler::new(destination, opts)), level)
}
