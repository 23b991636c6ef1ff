//! Error facility for the atom logging crates
//!
//! Every fallible logger operation returns `LogError`. Each variant maps to
//! a `LogErrorKind`, and each kind to a stable code that callers and tests
//! can match on without depending on message text.

use std::io;
use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Stable classification of logger errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogErrorKind {
    /// Options could not be turned into a configuration
    Config,
    /// The configuration was well-formed but the engine rejected it
    LoggerConstruction,
    /// The container refused the logger provider
    Registration,
    /// A sink failed to flush
    Flush,
    /// The logger could not become the global tracing dispatcher
    Install,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::Config => "ERR_CONFIG",
            LogErrorKind::LoggerConstruction => "ERR_LOGGER_CONSTRUCTION",
            LogErrorKind::Registration => "ERR_REGISTRATION",
            LogErrorKind::Flush => "ERR_FLUSH",
            LogErrorKind::Install => "ERR_INSTALL",
        }
    }
}

/// Errors surfaced by logger initialization, flushing and installation
#[derive(Error, Debug)]
pub enum LogError {
    #[error("invalid logger configuration: {reason}")]
    Config { reason: String },

    #[error("cannot construct logger: {reason}")]
    LoggerConstruction { reason: String },

    #[error("cannot register logger provider: {reason}")]
    Registration { reason: String },

    #[error("failed to flush sink {sink}: {source}")]
    Flush {
        sink: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot install logger as global dispatcher: {reason}")]
    Install { reason: String },
}

impl LogError {
    pub fn config(reason: impl ToString) -> Self {
        LogError::Config {
            reason: reason.to_string(),
        }
    }

    pub fn construction(reason: impl ToString) -> Self {
        LogError::LoggerConstruction {
            reason: reason.to_string(),
        }
    }

    pub fn registration(reason: impl ToString) -> Self {
        LogError::Registration {
            reason: reason.to_string(),
        }
    }

    pub fn flush(sink: impl Into<String>, source: io::Error) -> Self {
        LogError::Flush {
            sink: sink.into(),
            source,
        }
    }

    pub fn install(reason: impl ToString) -> Self {
        LogError::Install {
            reason: reason.to_string(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LogError::Config { .. } => LogErrorKind::Config,
            LogError::LoggerConstruction { .. } => LogErrorKind::LoggerConstruction,
            LogError::Registration { .. } => LogErrorKind::Registration,
            LogError::Flush { .. } => LogErrorKind::Flush,
            LogError::Install { .. } => LogErrorKind::Install,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
