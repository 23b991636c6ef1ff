//! Logger configuration
//!
//! `Config` is deserialized from the provider's configuration section. Every
//! field has a default, so an absent section yields a production logger
//! writing JSON records to stderr at `info`.

use crate::{LogError, Result};
use atom_log_types::schema::LOGGER_TARGET;
use atom_log_types::Level;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter};

/// Record encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One JSON object per line
    #[default]
    Json,
    /// Tab-separated human-readable lines
    Console,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Console => "console",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "console" => Ok(Encoding::Console),
            other => Err(format!("unrecognized encoding: {:?}", other)),
        }
    }
}

/// Configuration consumed by `Logger::new`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum level that is written
    pub level: Level,
    /// Development mode: `dpanic` records panic after emission
    pub development: bool,
    /// Encoder name, `"json"` or `"console"`; resolved when the logger is built
    pub encoding: String,
    /// `"stdout"`, `"stderr"` or file paths; files are opened for append
    pub output_paths: Vec<String>,
    /// Where the logger reports its own write failures
    pub error_output_paths: Vec<String>,
    /// Fields attached to every record
    pub initial_fields: BTreeMap<String, String>,
    /// `EnvFilter` directives for events routed through the logger's
    /// dispatcher, e.g. `"hyper=warn,info"`
    pub filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::production()
    }
}

impl Config {
    /// JSON records to stderr at `info`
    pub fn production() -> Self {
        Self {
            level: Level::Info,
            development: false,
            encoding: Encoding::Json.to_string(),
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            initial_fields: BTreeMap::new(),
            filter: None,
        }
    }

    /// Console records to stderr at `debug`, with `dpanic` panicking
    pub fn development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            encoding: Encoding::Console.to_string(),
            ..Self::production()
        }
    }

    /// Resolve the configured encoder name
    pub(crate) fn resolve_encoding(&self) -> Result<Encoding> {
        self.encoding.parse::<Encoding>().map_err(LogError::construction)
    }

    /// Build the dispatcher filter
    ///
    /// The logger's own target is always enabled at the configured level so
    /// that target-specific directives cannot silence facade calls.
    pub(crate) fn build_filter(&self) -> Result<EnvFilter> {
        let own = LevelFilter::from_level(tracing_level(self.level));
        match self.filter.as_deref() {
            Some(directives) => {
                let filter = EnvFilter::try_new(directives).map_err(|e| {
                    LogError::construction(format!("invalid filter {:?}: {}", directives, e))
                })?;
                let own_directive = format!("{}={}", LOGGER_TARGET, own)
                    .parse::<Directive>()
                    .map_err(|e| LogError::construction(format!("invalid filter: {}", e)))?;
                Ok(filter.add_directive(own_directive))
            }
            None => Ok(EnvFilter::default().add_directive(own.into())),
        }
    }
}

/// Engine level used when emitting at `level`
pub(crate) fn tracing_level(level: Level) -> tracing::Level {
    match level {
        Level::Debug => tracing::Level::DEBUG,
        Level::Info => tracing::Level::INFO,
        Level::Warn => tracing::Level::WARN,
        Level::Error | Level::DPanic | Level::Panic | Level::Fatal => tracing::Level::ERROR,
    }
}

/// Level recorded for events that did not come through the logger API
pub(crate) fn from_tracing_level(level: tracing::Level) -> Level {
    if level == tracing::Level::ERROR {
        Level::Error
    } else if level == tracing::Level::WARN {
        Level::Warn
    } else if level == tracing::Level::INFO {
        Level::Info
    } else {
        Level::Debug
    }
}
