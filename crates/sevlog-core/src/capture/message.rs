//! Decoded form of one structured record

use serde::{Deserialize, Serialize};

use crate::engine::Level;
use crate::errors::{Result, SevlogError};
use crate::levels::parse_level;

/// Source location as written by the structured handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSource {
    pub file: String,
    pub function: String,
    pub line: u32,
}

/// A record read back from the capture stream
///
/// Only the fixed fields are kept; any other attribute on the record is
/// ignored by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogMessage {
    #[serde(rename = "level")]
    pub level_str: String,
    #[serde(skip)]
    pub level: Level,
    #[serde(rename = "msg")]
    pub message: String,
    pub time: String,
    pub source: Option<FileSource>,
    pub error: Option<String>,
}

impl LogMessage {
    /// Decode one serialized line and resolve its severity
    pub fn decode(line: &[u8]) -> Result<Self> {
        let mut message: LogMessage =
            serde_json::from_slice(line).map_err(|e| SevlogError::Decode(e.to_string()))?;
        message.level = parse_level(&message.level_str)
            .ok()
            .or_else(|| Level::parse_offset(&message.level_str))
            .ok_or_else(|| {
                SevlogError::Decode(format!("unknown level {:?}", message.level_str))
            })?;
        Ok(message)
    }

    /// Text of one of the fixed fields; absent optional fields read as ""
    pub fn field(&self, field: MessageField) -> &str {
        let source = self.source.as_ref();
        match field {
            MessageField::Message => &self.message,
            MessageField::Level => &self.level_str,
            MessageField::Time => &self.time,
            MessageField::Error => self.error.as_deref().unwrap_or_default(),
            MessageField::File => source.map(|s| s.file.as_str()).unwrap_or_default(),
            MessageField::Function => source.map(|s| s.function.as_str()).unwrap_or_default(),
        }
    }
}

/// The fields `check_next_equal` can compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageField {
    Message,
    Level,
    Time,
    Error,
    File,
    Function,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::levels::{LEVEL_FATAL, LEVEL_WARN};

    #[test]
    fn test_decode_full_record() {
        let line = br#"{"time":"2024-01-02T03:04:05.000+00:00","level":"WARN","source":{"file":"src/app.rs","function":"app::run","line":7},"msg":"disk low","error":"ENOSPC","free":12}"#;
        let msg = LogMessage::decode(line).unwrap();
        assert_eq!(msg.level, LEVEL_WARN);
        assert_eq!(msg.level_str, "WARN");
        assert_eq!(msg.message, "disk low");
        assert_eq!(msg.error.as_deref(), Some("ENOSPC"));
        let source = msg.source.as_ref().unwrap();
        assert_eq!(source.line, 7);
        assert_eq!(msg.field(MessageField::Function), "app::run");
    }

    #[test]
    fn test_missing_optional_fields() {
        let msg = LogMessage::decode(br#"{"level":"FATAL","msg":"bye"}"#).unwrap();
        assert_eq!(msg.level, LEVEL_FATAL);
        assert!(msg.source.is_none());
        assert_eq!(msg.field(MessageField::Error), "");
        assert_eq!(msg.field(MessageField::File), "");
    }

    #[test]
    fn test_engine_spelling_fallback() {
        let msg = LogMessage::decode(br#"{"level":"INFO+2","msg":"m"}"#).unwrap();
        assert_eq!(msg.level, Level::new(2));
    }

    #[test]
    fn test_malformed_is_decode_error() {
        let err = LogMessage::decode(b"not json\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("unable to decode log message"));
    }

    #[test]
    fn test_unknown_level_is_decode_error() {
        let err = LogMessage::decode(br#"{"level":"LOUD","msg":"m"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
