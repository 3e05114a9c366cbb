//! Matching invocation results against expectations
//!
//! Checks run in a fixed order and stop at the first mismatch: exit code,
//! then stdout (exact or substring), then stderr substring. Fields left
//! unset are not checked.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::invoker::Invocation;
use crate::{Error, Result};

/// How stdout must relate to an expected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPattern {
    /// Byte-for-byte equality, ignoring one trailing line terminator
    Exact(String),
    /// Substring presence
    Contains(String),
}

/// The declared outcome of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    /// Required exit code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Required stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<OutputPattern>,
    /// Text stderr must contain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr_contains: Option<String>,
}

impl Expectation {
    /// Exit code 0
    pub fn success() -> Self {
        Self::exit_code(0)
    }

    /// Exit code 1, the platform's handled-failure code
    pub fn failure() -> Self {
        Self::exit_code(1)
    }

    /// A specific exit code
    pub fn exit_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    /// Require stdout to equal `text`
    pub fn stdout_exact(mut self, text: impl Into<String>) -> Self {
        self.stdout = Some(OutputPattern::Exact(text.into()));
        self
    }

    /// Require stdout to contain `text`
    pub fn stdout_contains(mut self, text: impl Into<String>) -> Self {
        self.stdout = Some(OutputPattern::Contains(text.into()));
        self
    }

    /// Require stderr to contain `text`
    pub fn stderr_contains(mut self, text: impl Into<String>) -> Self {
        self.stderr_contains = Some(text.into());
        self
    }

    /// True when nothing would be checked
    pub fn is_empty(&self) -> bool {
        self.exit_code.is_none() && self.stdout.is_none() && self.stderr_contains.is_none()
    }

    /// Reject expectations that would pass anything
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::invalid_expectation(
                "at least one of exit code, stdout or stderr must be checked",
            ));
        }
        Ok(())
    }

    /// Compare `actual` against this expectation
    pub fn check(&self, actual: &Invocation) -> std::result::Result<(), Mismatch> {
        if let Some(expected) = self.exit_code {
            if actual.exit_code != expected {
                return Err(Mismatch::ExitCode {
                    expected,
                    actual: actual.exit_code,
                    stderr: actual.stderr.clone(),
                });
            }
        }

        match &self.stdout {
            Some(OutputPattern::Exact(expected)) => {
                if trim_record_separator(&actual.stdout) != trim_record_separator(expected) {
                    return Err(Mismatch::StdoutExact {
                        expected: expected.clone(),
                        actual: actual.stdout.clone(),
                    });
                }
            }
            Some(OutputPattern::Contains(needle)) => {
                if !actual.stdout.contains(needle.as_str()) {
                    return Err(Mismatch::StdoutContains {
                        expected: needle.clone(),
                        actual: actual.stdout.clone(),
                    });
                }
            }
            None => {}
        }

        if let Some(needle) = &self.stderr_contains {
            if !actual.stderr.contains(needle.as_str()) {
                return Err(Mismatch::StderrContains {
                    expected: needle.clone(),
                    actual: actual.stderr.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Strip one trailing `\n` (or `\r\n`)
pub fn trim_record_separator(s: &str) -> &str {
    match s.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => s,
    }
}

/// How an invocation diverged from its expectation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// Wrong exit code
    #[error("expected exit code {expected}, got {actual} (stderr: {stderr:?})")]
    ExitCode {
        /// Expected exit code
        expected: i32,
        /// Actual exit code
        actual: i32,
        /// stderr of the invocation, usually the explanation
        stderr: String,
    },
    /// stdout differs from the exact expected text
    #[error("expected stdout {expected:?}, got {actual:?}")]
    StdoutExact {
        /// Expected stdout
        expected: String,
        /// Actual stdout
        actual: String,
    },
    /// stdout lacks the expected substring
    #[error("expected stdout to contain {expected:?}, got {actual:?}")]
    StdoutContains {
        /// Expected substring
        expected: String,
        /// Actual stdout
        actual: String,
    },
    /// stderr lacks the expected substring
    #[error("expected stderr to contain {expected:?}, got {actual:?}")]
    StderrContains {
        /// Expected substring
        expected: String,
        /// Actual stderr
        actual: String,
    },
}
