use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`crate::ModemBackend`] call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no modem configuration found (searched: {searched})")]
    NoConfig { searched: String },

    #[error("invalid modem configuration {}: {reason}", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("modem configuration has not been loaded")]
    NotConfigured,

    #[error("modem is not connected")]
    NotConnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("unexpected modem output: {0}")]
    Parse(String),
}

/// Stage-level failures of a [`crate::ModemSession`].
#[derive(Debug, Error)]
pub enum ModemError {
    #[error("modem configuration error: {0}")]
    Config(#[source] BackendError),

    #[error("modem connection error: {0}")]
    Connection(#[source] BackendError),

    #[error("modem did not connect within {0:?}")]
    ConnectTimeout(Duration),

    #[error("network info query failed: {0}")]
    NetworkInfo(#[source] BackendError),
}
