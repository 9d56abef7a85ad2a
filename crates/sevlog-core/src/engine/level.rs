//! Engine severity values and the shared threshold cell

use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// An ordered severity value
///
/// The engine only knows four built-in levels. Any other value is legal and
/// displays relative to the nearest built-in level below it, e.g. `-8`
/// prints as `DEBUG-4` until a handler renames it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Parse the engine's own spelling (`INFO`, `WARN+2`, `debug-4`)
    pub fn parse_offset(name: &str) -> Option<Level> {
        let name = name.trim().to_ascii_uppercase();
        let split = name.find(['+', '-']).unwrap_or(name.len());
        let (base, offset) = name.split_at(split);
        let base = match base {
            "DEBUG" => Level::DEBUG,
            "INFO" => Level::INFO,
            "WARN" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => return None,
        };
        let offset = if offset.is_empty() {
            0
        } else {
            offset.parse::<i32>().ok()?
        };
        Some(Level(base.0.checked_add(offset)?))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, anchor) = if *self < Level::INFO {
            ("DEBUG", Level::DEBUG)
        } else if *self < Level::WARN {
            ("INFO", Level::INFO)
        } else if *self < Level::ERROR {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        };
        let delta = i64::from(self.0) - i64::from(anchor.0);
        if delta == 0 {
            f.write_str(base)
        } else {
            write!(f, "{}{:+}", base, delta)
        }
    }
}

/// Shared, atomically updated severity threshold
///
/// Clones share the same cell: the facade owns one and every handler built
/// for it holds a clone, so `set` takes effect for the whole chain without
/// rebuilding it.
#[derive(Clone, Default)]
pub struct LevelVar(Arc<AtomicI32>);

impl LevelVar {
    pub fn new(level: Level) -> Self {
        Self(Arc::new(AtomicI32::new(level.value())))
    }

    pub fn level(&self) -> Level {
        Level(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, level: Level) {
        self.0.store(level.value(), Ordering::Release);
    }

    /// True when both handles point at the same cell
    pub fn shares_with(&self, other: &LevelVar) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LevelVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelVar").field(&self.level()).finish()
    }
}

impl From<Level> for LevelVar {
    fn from(level: Level) -> Self {
        Self::new(level)
    }
}
