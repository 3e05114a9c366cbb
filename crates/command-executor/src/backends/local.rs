//! Local process execution backend

use async_io::Timer;
use async_process::Stdio;
use async_trait::async_trait;
use futures_lite::future;
use std::io;
use std::time::Duration;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::launcher::Launcher;
use crate::process::{CommandOutput, ExitStatus};

/// Launcher for executing processes locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

#[async_trait]
impl Launcher for LocalLauncher {
    async fn run(&self, command: Command, timeout: Option<Duration>) -> Result<CommandOutput> {
        let rendered = command.to_string();
        let mut async_cmd = command.prepare();

        async_cmd.stdin(Stdio::null());
        async_cmd.stdout(Stdio::piped());
        async_cmd.stderr(Stdio::piped());

        let child = async_cmd
            .spawn()
            .map_err(|e| spawn_error(&command, e))?;
        tracing::trace!(pid = child.id(), command = %rendered, "spawned");

        // Dropping the output future drops the child, which kills it.
        let output = child.output();
        let output = match timeout.filter(|t| !t.is_zero()) {
            None => output.await?,
            Some(limit) => {
                let finished = async { Some(output.await) };
                let expired = async {
                    Timer::after(limit).await;
                    None
                };
                match future::or(finished, expired).await {
                    Some(result) => result?,
                    None => {
                        return Err(Error::TimedOut {
                            command: rendered,
                            timeout: limit,
                        });
                    }
                }
            }
        };

        Ok(CommandOutput {
            status: ExitStatus::from(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn spawn_error(command: &Command, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::command_not_found(command.get_program().to_string_lossy())
    } else {
        Error::spawn_failed(format!("Failed to spawn {}: {}", command, err))
    }
}
