//! Error definitions for the logging facade.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors surfaced by the facade, the level registry and the rotating writer.
#[derive(Debug, Error)]
pub enum LogError {
    /// A level name outside the recognized set (strict parsing only).
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),

    /// The rotation suffix is not a valid strftime pattern.
    #[error("invalid rotation pattern: {pattern:?}")]
    InvalidPattern { pattern: String },

    /// Rotation period shorter than one second.
    #[error("rotation period must be at least one second")]
    InvalidRotation,

    /// The rotated log file could not be opened.
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The link to the current log file could not be updated.
    #[error("failed to link {link} to {target}: {source}")]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A value handed to `try_reset_log` that is not a logger backend.
    #[error("unsupported logger type, expected a Backend or a tracing Dispatch")]
    UnsupportedLogger,

    /// The process-wide logger was already set.
    #[error("global logger already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for facade operations.
pub type LogResult<T> = Result<T, LogError>;
