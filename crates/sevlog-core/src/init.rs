//! Logger setup
//!
//! Builds a [`Logger`] from a profile, from `SEVLOG_*` environment
//! variables, or from deserialized settings, and installs the process-wide
//! `tracing` subscriber once.

use std::str::FromStr;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::bridge::{is_own_target, LoggerLayer};
use crate::console::new_console;
use crate::engine::{Destination, Level};
use crate::errors::{Result, SevlogError};
use crate::facade::{HandlerFactory, Logger};
use crate::levels::{parse_level, LEVEL_DEBUG, LEVEL_INFO};
use crate::structured::new_json;

pub const ENV_LEVEL: &str = "SEVLOG_LEVEL";
pub const ENV_FORMAT: &str = "SEVLOG_FORMAT";
pub const ENV_SOURCE: &str = "SEVLOG_SOURCE";
/// Any non-empty value disables colour (<https://no-color.org>)
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Coloured console output at Debug with source locations
    Development,
    /// JSON output at Info
    Production,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Console,
    Json,
}

impl Format {
    pub fn factory(self) -> HandlerFactory {
        match self {
            Format::Console => new_console,
            Format::Json => new_json,
        }
    }
}

impl FromStr for Format {
    type Err = SevlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "text" => Ok(Format::Console),
            "json" => Ok(Format::Json),
            _ => Err(invalid(ENV_FORMAT, s)),
        }
    }
}

/// Everything needed to build a logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: Level,
    pub format: Format,
    pub color: bool,
    pub add_source: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LEVEL_INFO,
            format: Format::Console,
            color: true,
            add_source: false,
        }
    }
}

impl Settings {
    pub fn from_profile(profile: Profile) -> Self {
        match profile {
            Profile::Development => Self {
                level: LEVEL_DEBUG,
                format: Format::Console,
                color: true,
                add_source: true,
            },
            Profile::Production => Self {
                level: LEVEL_INFO,
                format: Format::Json,
                color: false,
                add_source: false,
            },
        }
    }

    /// Defaults overridden by `SEVLOG_LEVEL`, `SEVLOG_FORMAT`,
    /// `SEVLOG_SOURCE` and `NO_COLOR`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Settings::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(level) = lookup(ENV_LEVEL) {
            settings.level = parse_level(&level)?;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            settings.format = format.parse()?;
        }
        if let Some(source) = lookup(ENV_SOURCE) {
            settings.add_source = parse_flag(ENV_SOURCE, &source)?;
        }
        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            settings.color = false;
        }
        Ok(settings)
    }

    pub fn build(&self, destination: Destination) -> Logger {
        Logger::new(
            self.format.factory(),
            destination,
            self.add_source,
            self.level,
            self.color,
        )
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> SevlogError {
    SevlogError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    }
}

static INIT_ONCE: Once = Once::new();

/// Build a stderr logger from `settings` and install the global subscriber
///
/// The first call installs an `EnvFilter` (from `RUST_LOG`, default `info`)
/// with a [`LoggerLayer`] forwarding `tracing` events to the logger built
/// by that call, plus a plain formatter for the crate's own `sevlog::*`
/// diagnostics. Later calls only build a logger. An already installed
/// global subscriber is left in place.
///
/// # Example
///
/// ```
/// use sevlog_core::{init, Profile, Settings};
///
/// let log = init(&Settings::from_profile(Profile::Development));
/// log.info("ready", &[]);
/// ```
pub fn init(settings: &Settings) -> Logger {
    let logger = settings.build(Destination::stderr());
    INIT_ONCE.call_once(|| {
        let diagnostics = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter_fn(|meta| is_own_target(meta.target())));
        let installed = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(LoggerLayer::new(logger.clone()))
            .with(diagnostics)
            .try_init();
        if let Err(err) = installed {
            tracing::debug!(target: "sevlog::init", error = %err, "global subscriber already set");
        }
    });
    logger
}
