//! Severity-extended structured logging
//!
//! `sevlog-core` layers six severities (Trace, Debug, Info, Warn, Error,
//! Fatal) over a small leveled logging engine:
//!
//! - [`engine`]: records, attributes, the [`Handler`] seam and the base
//!   text and JSON handlers
//! - [`levels`]: the severity registry (names, colours, parsing)
//! - [`Logger`]: the facade with one method per severity; Fatal exits
//! - [`console`] / [`structured`]: the two handler factories
//! - [`CaptureLogger`]: decodes its own output so tests can assert on it
//! - [`Settings`] and [`init()`]: profiles, env config and the `tracing` bridge
//!
//! # Usage
//!
//! ```rust
//! use sevlog_core::{attrs, init, Profile, Settings};
//!
//! let log = init(&Settings::from_profile(Profile::Development));
//! log.trace("cache lookup", &attrs!["key" => "user:42"]);
//! log.info("started", &[]);
//! ```

pub mod bridge;
pub mod capture;
pub mod console;
pub mod engine;
pub mod errors;
pub mod facade;
mod frames;
pub mod init;
pub mod levels;
pub mod macros;
pub mod structured;

pub use bridge::{level_from_tracing, LoggerLayer};
pub use capture::{CaptureLogger, FileSource, LogMessage, MessageField, POLL_TIMEOUT, QUEUE_CAPACITY};
pub use console::new_console;
pub use engine::{Attr, Destination, Engine, Handler, HandlerOptions, Level, LevelVar, Record, Value};
pub use errors::{ErrorKind, Result, SevlogError};
pub use facade::{HandlerFactory, Logger, NoExit, ProcessExit, Terminate, FATAL_EXIT_CODE};
pub use init::{init, Format, Profile, Settings};
pub use levels::{
    level_color, level_name, parse_level, LevelColor, LEVELS, LEVEL_DEBUG, LEVEL_ERROR,
    LEVEL_FATAL, LEVEL_INFO, LEVEL_TRACE, LEVEL_WARN, STACK_FRAMES,
};
pub use sevlog_core_types::{CancelToken, Context, Sensitive};
pub use structured::new_json;
