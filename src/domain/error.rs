use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for ballot-dapp operations.
///
/// State-machine failures are not represented here: they are reported back to the
/// rollup host as rejections and never abort the request loop.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file was given but does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Connection to the rollup server could not be established; nothing was sent.
    #[error("Rollup server unreachable: {0}")]
    Connection(String),

    /// Request was sent but no response arrived within the configured timeout.
    #[error("Rollup request timed out: {0}")]
    Timeout(String),

    /// Rollup server exchange failed.
    #[error("Rollup transport error: {message}")]
    Transport { message: String, status: Option<u16> },

    /// Rollup server answered with a body that does not follow the request protocol.
    #[error("Rollup protocol error: {0}")]
    Protocol(String),
}

impl AppError {
    pub fn transport<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::Transport { message: message.into(), status }
    }

    /// Whether retrying the same transport call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Connection(_) | AppError::Timeout(_) => true,
            AppError::Transport { status, .. } => {
                status.is_some_and(|code| code == 429 || code == 408 || code >= 500)
            }
            _ => false,
        }
    }

    /// Whether the failed request provably never reached the rollup server.
    pub fn is_unsent(&self) -> bool {
        matches!(self, AppError::Connection(_))
    }
}
