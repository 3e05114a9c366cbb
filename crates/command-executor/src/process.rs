//! Exit status and captured output of a finished process

use serde::{Deserialize, Serialize};

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,
    /// Signal that terminated the process (Unix only)
    pub signal: Option<i32>,
}

impl ExitStatus {
    /// Exit code as a single integer.
    ///
    /// Signal terminations follow the shell convention of `128 + signal`.
    /// `-1` is returned when the platform reported neither.
    pub fn exit_code(&self) -> i32 {
        match (self.code, self.signal) {
            (Some(code), _) => code,
            (None, Some(signal)) => 128 + signal,
            (None, None) => -1,
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
            #[cfg(unix)]
            signal: {
                use std::os::unix::process::ExitStatusExt;
                status.signal()
            },
            #[cfg(not(unix))]
            signal: None,
        }
    }
}

/// Everything a finished process produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// How the process exited
    pub status: ExitStatus,
    /// Captured standard output, lossily decoded as UTF-8
    pub stdout: String,
    /// Captured standard error, lossily decoded as UTF-8
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_prefers_code() {
        let status = ExitStatus {
            code: Some(1),
            signal: None,
        };
        assert_eq!(status.exit_code(), 1);

        let signalled_too = ExitStatus {
            code: Some(0),
            signal: Some(15),
        };
        assert_eq!(signalled_too.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_folds_signal() {
        let status = ExitStatus {
            code: None,
            signal: Some(9),
        };
        assert_eq!(status.exit_code(), 137);
    }

    #[test]
    fn test_exit_code_without_code_or_signal() {
        let status = ExitStatus {
            code: None,
            signal: None,
        };
        assert_eq!(status.exit_code(), -1);
    }
}
