//! Severity registry
//!
//! The closed set of severities the facade can emit, with their display
//! names and console colours. Trace and Fatal sit outside the engine's
//! built-in range and only print under their own names because both
//! handler factories rename them through their replace hooks.

use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::engine::Level;
use crate::errors::{Result, SevlogError};

pub const LEVEL_TRACE: Level = Level::new(-8);
pub const LEVEL_DEBUG: Level = Level::DEBUG;
pub const LEVEL_INFO: Level = Level::INFO;
pub const LEVEL_WARN: Level = Level::WARN;
pub const LEVEL_ERROR: Level = Level::ERROR;
pub const LEVEL_FATAL: Level = Level::new(12);

/// Every registered severity, ascending
pub const LEVELS: [Level; 6] = [
    LEVEL_TRACE,
    LEVEL_DEBUG,
    LEVEL_INFO,
    LEVEL_WARN,
    LEVEL_ERROR,
    LEVEL_FATAL,
];

/// Frames between the console handler and the caller of a facade method
/// that goes through `log_with_source`:
/// handle(0) <- Engine::dispatch(1) <- Engine::log_skipping(2)
/// <- Logger::log_with_source(3) <- Logger::trace/fatal(4) <- caller(5)
///
/// Frames are resolved from debug info. In builds without it the stack
/// cannot be symbolised and the `#[track_caller]` location is kept, which
/// is still the caller for every facade entry point.
pub const STACK_FRAMES: usize = 5;

/// Fixed-width console label and its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColor {
    pub name: &'static str,
    pub color: Color,
}

impl LevelColor {
    /// The label, wrapped in ANSI colour codes when `color` is set
    pub fn label(&self, color: bool) -> String {
        if color {
            // Not ColoredString: it consults colored's global tty/NO_COLOR
            // override, while the caller's flag alone decides here
            format!("\x1b[{}m{}\x1b[0m", self.color.to_fg_str(), self.name)
        } else {
            self.name.to_string()
        }
    }
}

pub fn level_color(level: Level) -> Option<LevelColor> {
    let (name, color) = match level {
        LEVEL_TRACE => ("TRACE", Color::Green),
        LEVEL_DEBUG => ("DEBUG", Color::Magenta),
        LEVEL_INFO => ("INFO ", Color::Blue),
        LEVEL_WARN => ("WARN ", Color::Yellow),
        LEVEL_ERROR => ("ERROR", Color::Red),
        LEVEL_FATAL => ("FATAL", Color::Red),
        _ => return None,
    };
    Some(LevelColor { name, color })
}

/// Canonical name of a registered severity
pub fn level_name(level: Level) -> Option<&'static str> {
    let name = match level {
        LEVEL_TRACE => "TRACE",
        LEVEL_DEBUG => "DEBUG",
        LEVEL_INFO => "INFO",
        LEVEL_WARN => "WARN",
        LEVEL_ERROR => "ERROR",
        LEVEL_FATAL => "FATAL",
        _ => return None,
    };
    Some(name)
}

/// Case-insensitive lookup of a registered severity name
pub fn parse_level(name: &str) -> Result<Level> {
    LEVELS
        .iter()
        .copied()
        .find(|level| {
            level_name(*level).is_some_and(|n| n.eq_ignore_ascii_case(name.trim()))
        })
        .ok_or_else(|| SevlogError::InvalidLevel(name.to_string()))
}

impl FromStr for Level {
    type Err = SevlogError;

    fn from_str(s: &str) -> Result<Self> {
        parse_level(s)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match level_name(*self) {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        parse_level(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_ascending() {
        for pair in LEVELS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_extensions_outside_builtin_range() {
        assert!(LEVEL_TRACE < Level::DEBUG);
        assert!(LEVEL_FATAL > Level::ERROR);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_level("trace").unwrap(), LEVEL_TRACE);
        assert_eq!(parse_level("Fatal").unwrap(), LEVEL_FATAL);
        assert_eq!(parse_level(" warn ").unwrap(), LEVEL_WARN);
        assert_eq!("DEBUG".parse::<Level>().unwrap(), LEVEL_DEBUG);
    }

    #[test]
    fn test_parse_unknown_fails() {
        let err = parse_level("verbose").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidLevel);
        assert!(parse_level("INFO+2").is_err());
    }

    #[test]
    fn test_labels_are_fixed_width() {
        for level in LEVELS {
            assert_eq!(level_color(level).unwrap().name.len(), 5);
        }
        assert!(level_color(Level::new(2)).is_none());
    }

    #[test]
    fn test_label_color() {
        let info = level_color(LEVEL_INFO).unwrap();
        assert_eq!(info.label(false), "INFO ");
        assert_eq!(info.label(true), "\x1b[34mINFO \x1b[0m");
    }

    #[test]
    fn test_serde_by_name() {
        assert_eq!(serde_json::to_string(&LEVEL_FATAL).unwrap(), "\"FATAL\"");
        let level: Level = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(level, LEVEL_TRACE);
        assert!(serde_json::from_str::<Level>("\"loud\"").is_err());
    }
}
