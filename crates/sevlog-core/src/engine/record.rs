//! The event handed to handlers

use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};

use super::level::Level;
use super::value::Attr;

/// Where a record was emitted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub file: String,
    /// Fully qualified function name; empty when only a file/line is known
    pub function: String,
    pub line: u32,
}

impl Source {
    /// `dir/file.rs:line`, the last two path components only
    pub fn short(&self) -> String {
        let path = Path::new(&self.file);
        let mut parts: Vec<_> = path
            .components()
            .rev()
            .take(2)
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.reverse();
        format!("{}:{}", parts.join("/"), self.line)
    }
}

impl From<&Location<'_>> for Source {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            function: String::new(),
            line: location.line(),
        }
    }
}

/// One log occurrence
///
/// `skip_frames` is bookkeeping for caller correction: handlers read it but
/// never render or serialize it.
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
    pub source: Option<Source>,
    pub skip_frames: Option<usize>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
            source: None,
            skip_frames: None,
        }
    }
}
