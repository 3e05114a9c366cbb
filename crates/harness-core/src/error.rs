//! Error types for harness-core

use thiserror::Error;

/// Result type alias for harness-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core harness error types
#[derive(Error, Debug)]
pub enum Error {
    /// A resource name could not be derived for a test case
    #[error("Naming error: {reason}")]
    Naming {
        /// Why the name could not be derived
        reason: String,
    },

    /// The command could not be run to completion (spawn failure, timeout)
    #[error("Invocation of `{command}` failed: {source}")]
    Invocation {
        /// The command line that was being invoked
        command: String,
        /// The underlying executor error
        #[source]
        source: command_executor::Error,
    },

    /// An expectation that cannot be checked meaningfully
    #[error("Invalid expectation: {message}")]
    InvalidExpectation {
        /// Error message
        message: String,
    },

    /// A fixture that does not describe a valid platform resource
    #[error("Invalid fixture: {message}")]
    InvalidFixture {
        /// Error message
        message: String,
    },

    /// A step referenced a capture no earlier step recorded
    #[error("Unknown capture '{0}'")]
    UnknownCapture(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] harness_config::ConfigError),
}

impl Error {
    /// Create a naming error
    pub fn naming(reason: impl Into<String>) -> Self {
        Self::Naming {
            reason: reason.into(),
        }
    }

    /// Create an invocation error
    pub fn invocation(command: impl Into<String>, source: command_executor::Error) -> Self {
        Self::Invocation {
            command: command.into(),
            source,
        }
    }

    /// Create an invalid expectation error
    pub fn invalid_expectation(message: impl Into<String>) -> Self {
        Self::InvalidExpectation {
            message: message.into(),
        }
    }

    /// Create an invalid fixture error
    pub fn invalid_fixture(message: impl Into<String>) -> Self {
        Self::InvalidFixture {
            message: message.into(),
        }
    }

    /// Whether this error is an invocation that exceeded its time bound
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Invocation { source, .. } if source.is_timeout())
    }
}
