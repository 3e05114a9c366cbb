//! Error types for command execution

use std::time::Duration;
use thiserror::Error;

/// Unified error type for command execution
///
/// A process that runs and exits non-zero is not an error; it is reported
/// through [`CommandOutput`](crate::CommandOutput).
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to spawn a process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// Command not found
    #[error("command not found: {command}")]
    CommandNotFound {
        /// The command that was not found
        command: String,
    },

    /// The process did not finish within its time bound and was killed
    #[error("command `{command}` timed out after {timeout:?}")]
    TimedOut {
        /// The rendered command line
        command: String,
        /// The bound that was exceeded
        timeout: Duration,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Whether this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimedOut { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
