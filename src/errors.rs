// src/errors.rs

//! Crate-wide error type.
//!
//! Start-up failures (path resolution, directory validation, watch
//! registration) are returned to the caller. Steady-state notification
//! errors only ever reach the log sink, and replacement failures are fatal.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("cannot get path to binary {arg0:?} (launch with absolute path): {source}")]
    Resolution {
        arg0: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot get absolute path to {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("additional directory {path:?} does not exist")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path:?}; can only watch directories")]
    NotADirectory { path: PathBuf },

    #[error("cannot setup watcher: {0}")]
    WatcherInit(#[source] notify::Error),

    #[error("cannot add {path:?} to watcher: {source}")]
    WatchSetup {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("reload error: {0}")]
    Notification(#[source] notify::Error),

    #[error("cannot restart {path:?}: {source}")]
    Replacement {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReloadError {
    /// True for the errors raised while validating caller-supplied directories.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReloadError::NotFound { .. }
                | ReloadError::NotADirectory { .. }
                | ReloadError::InvalidPath { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReloadError>;
