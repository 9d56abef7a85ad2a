//! Typed attribute values

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat};
use serde_json::Value as JsonValue;
use sevlog_core_types::schema::{ERROR_KEY, REDACTED};
use sevlog_core_types::Sensitive;

use super::level::Level;

/// A single attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Local>),
    Level(Level),
    /// Nested attributes; an empty key inlines the members into the parent
    Group(Vec<Attr>),
}

impl Value {
    /// JSON form used by the structured handler. Groups are expanded by the
    /// handler itself so nested replace hooks see the right group path.
    pub(crate) fn to_json(&self) -> JsonValue {
        match self {
            Value::Str(s) => JsonValue::from(s.as_str()),
            Value::Int(n) => JsonValue::from(*n),
            Value::Uint(n) => JsonValue::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Bool(b) => JsonValue::from(*b),
            Value::Duration(d) => {
                JsonValue::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            }
            Value::Time(t) => JsonValue::from(format_rfc3339(t)),
            Value::Level(l) => JsonValue::from(l.to_string()),
            Value::Group(attrs) => JsonValue::Object(
                attrs
                    .iter()
                    .map(|a| (a.key.clone(), a.value.to_json()))
                    .collect(),
            ),
        }
    }
}

pub(crate) fn format_rfc3339(t: &DateTime<Local>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, false)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => f.write_str(&format_rfc3339(t)),
            Value::Level(l) => write!(f, "{}", l),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty => $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant($conv(v))
                }
            }
        )*
    };
}

value_from!(Str: &str => String::from, String => std::convert::identity, &String => String::clone);
value_from!(Int: i64 => std::convert::identity, i32 => i64::from, i16 => i64::from, i8 => i64::from);
value_from!(Uint: u64 => std::convert::identity, u32 => u64::from, u16 => u64::from, u8 => u64::from);
value_from!(Float: f64 => std::convert::identity, f32 => f64::from);
value_from!(Bool: bool => std::convert::identity);
value_from!(Duration: Duration => std::convert::identity);
value_from!(Time: DateTime<Local> => std::convert::identity);
value_from!(Level: Level => std::convert::identity);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl<T> From<Sensitive<T>> for Value {
    fn from(_: Sensitive<T>) -> Self {
        Value::Str(REDACTED.to_string())
    }
}

/// A key/value attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Nest `attrs` under `name`
    pub fn group(name: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: name.into(),
            value: Value::Group(attrs),
        }
    }

    /// Conventional `error` attribute carrying the error's display text
    pub fn error(err: impl fmt::Display) -> Self {
        Self::new(ERROR_KEY, err.to_string())
    }
}
