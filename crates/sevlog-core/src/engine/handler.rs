//! The handler seam and the pieces every handler shares

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use sevlog_core_types::Context;

use super::level::{Level, LevelVar};
use super::record::Record;
use super::value::Attr;
use crate::errors::Result;

/// Receives records from the engine and renders or forwards them
///
/// A wrapping handler either passes a record through or transforms it
/// before delegating, and calls its inner handler at most once per record.
pub trait Handler: Send + Sync {
    fn enabled(&self, ctx: &Context, level: Level) -> bool;

    fn handle(&self, ctx: &Context, record: &Record) -> Result<()>;

    /// A handler that also emits `attrs` on every record
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /// A handler that nests every following attribute under `name`
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Rewrites or drops an attribute before it is rendered
///
/// Called with the open group path (empty for built-in fields). Returning
/// `None` removes the attribute.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Option<Attr> + Send + Sync>;

/// Options shared by the built-in handlers
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Threshold; records below it are not enabled
    pub level: LevelVar,
    /// Render the record's source location
    pub add_source: bool,
    pub replace_attr: Option<ReplaceAttr>,
    /// strftime pattern for the text handler's time field
    pub time_format: Option<String>,
}

impl HandlerOptions {
    pub(crate) fn replace(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        match &self.replace_attr {
            Some(replace) => replace(groups, attr),
            None => Some(attr),
        }
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .field("time_format", &self.time_format)
            .finish()
    }
}

/// Attributes and groups accumulated through `with_attrs` / `with_group`
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub groups: Vec<String>,
    /// Each preset attribute remembers the group path open when it was added
    pub preset: Vec<(Vec<String>, Attr)>,
}

impl Scope {
    pub fn with_attrs(&self, attrs: &[Attr]) -> Scope {
        let mut scope = self.clone();
        scope
            .preset
            .extend(attrs.iter().map(|a| (self.groups.clone(), a.clone())));
        scope
    }

    pub fn with_group(&self, name: &str) -> Scope {
        let mut scope = self.clone();
        if !name.is_empty() {
            scope.groups.push(name.to_string());
        }
        scope
    }
}

/// Output stream shared by every handler built for one logger
///
/// Each record is written with a single `write_all` under the lock, so
/// concurrent producers never interleave bytes.
#[derive(Clone)]
pub struct Destination(Arc<Mutex<dyn Write + Send>>);

impl Destination {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self(Arc::new(Mutex::new(writer)))
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn write_record(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(bytes)?;
        writer.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    /// True when both handles write to the same stream
    pub fn same_as(&self, other: &Destination) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Destination(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_tracks_group_per_attr() {
        let scope = Scope::default()
            .with_attrs(&[Attr::new("a", 1i64)])
            .with_group("req")
            .with_attrs(&[Attr::new("b", 2i64)]);
        assert_eq!(scope.groups, vec!["req".to_string()]);
        assert!(scope.preset[0].0.is_empty());
        assert_eq!(scope.preset[1].0, vec!["req".to_string()]);
    }

    #[test]
    fn test_empty_group_name_is_ignored() {
        let scope = Scope::default().with_group("");
        assert!(scope.groups.is_empty());
    }

    #[test]
    fn test_replace_without_hook_passes_through() {
        let opts = HandlerOptions::default();
        let attr = Attr::new("k", "v");
        assert_eq!(opts.replace(&[], attr.clone()), Some(attr));
    }

    #[test]
    fn test_destination_clones_share_stream() {
        let dest = Destination::new(Vec::new());
        let other = dest.clone();
        assert!(dest.same_as(&other));
        assert!(!dest.same_as(&Destination::new(Vec::new())));
    }
}
