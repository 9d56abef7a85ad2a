//! Canonical record keys
//!
//! Every handler emits the built-in fields under these names, and the
//! capture decoder reads them back by the same names.

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const MESSAGE_KEY: &str = "msg";
pub const SOURCE_KEY: &str = "source";

// Source sub-object
pub const SOURCE_FILE_KEY: &str = "file";
pub const SOURCE_FUNCTION_KEY: &str = "function";
pub const SOURCE_LINE_KEY: &str = "line";

/// Conventional attribute key for error text
pub const ERROR_KEY: &str = "error";

/// Placeholder printed in place of redacted values
pub const REDACTED: &str = "***REDACTED***";
