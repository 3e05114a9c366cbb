//! Launcher trait for executing commands in different contexts

use crate::command::Command;
use crate::error::Result;
use crate::process::CommandOutput;
use async_trait::async_trait;
use std::time::Duration;

/// A launcher that runs a command to completion and captures its output
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    /// Run `command`, waiting at most `timeout` for it to finish.
    ///
    /// `None` or a zero duration waits indefinitely. A non-zero exit is
    /// returned as output, never as an error.
    async fn run(&self, command: Command, timeout: Option<Duration>) -> Result<CommandOutput>;
}
