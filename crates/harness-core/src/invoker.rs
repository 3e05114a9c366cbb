//! Running platform and host commands
//!
//! The harness issues two kinds of commands: subcommands of the platform's
//! management binary, and probes run directly on the host (to capture a
//! routing table baseline, or check a link exists). Both go through a
//! [`CommandInvoker`], which returns stdout, stderr and the exit code without
//! judging them. Non-zero exits are ordinary results; only a command that
//! could not run to completion is an error. Nothing is retried.

use async_trait::async_trait;
use command_executor::{Command, CommandOutput, Launcher, LocalLauncher};
use harness_config::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::{Error, Result};

/// A command line the harness wants run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum CommandLine {
    /// Arguments to the platform's management binary
    Platform {
        /// Subcommand and its arguments
        args: Vec<String>,
    },
    /// A program run directly on the host
    Host {
        /// Program to run
        program: String,
        /// Its arguments
        args: Vec<String>,
    },
}

impl CommandLine {
    /// A platform subcommand
    pub fn platform<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Platform {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A host program
    pub fn host<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Host {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A host program given as `argv`, program first
    pub fn host_argv(argv: &[String]) -> Result<Self> {
        match argv.split_first() {
            Some((program, args)) if !program.is_empty() => {
                Ok(Self::host(program.clone(), args.iter().cloned()))
            }
            _ => Err(Error::invalid_fixture("host command must name a program")),
        }
    }

    /// The arguments, without the program
    pub fn args(&self) -> &[String] {
        match self {
            CommandLine::Platform { args } | CommandLine::Host { args, .. } => args,
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Platform { args } => write!(f, "{}", args.join(" ")),
            CommandLine::Host { program, args } if args.is_empty() => write!(f, "(host) {}", program),
            CommandLine::Host { program, args } => {
                write!(f, "(host) {} {}", program, args.join(" "))
            }
        }
    }
}

/// What a finished command produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Exit code; signal terminations are reported as `128 + signal`
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl Invocation {
    /// Build an invocation result by hand
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// A successful invocation printing `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(0, stdout, "")
    }

    /// A handled failure (exit 1) printing `stderr`
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self::new(1, "", stderr)
    }
}

impl From<CommandOutput> for Invocation {
    fn from(output: CommandOutput) -> Self {
        Self {
            exit_code: output.status.exit_code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Runs a [`CommandLine`] and reports what happened
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    /// Run `command` once.
    ///
    /// Returns `Err` only when the command could not be run to completion.
    async fn invoke(&self, command: &CommandLine) -> Result<Invocation>;
}

/// Invoker that spawns real processes through a [`Launcher`]
#[derive(Debug, Clone)]
pub struct CliInvoker<L = LocalLauncher> {
    binary: PathBuf,
    timeout: Option<Duration>,
    launcher: L,
}

impl CliInvoker<LocalLauncher> {
    /// Invoker for `binary` running commands locally
    pub fn new(binary: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self::with_launcher(binary, timeout, LocalLauncher)
    }

    /// Invoker for the platform named in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.platform.binary, config.settings.command_timeout())
    }
}

impl<L: Launcher> CliInvoker<L> {
    /// Invoker using a custom launcher
    pub fn with_launcher(binary: impl Into<PathBuf>, timeout: Option<Duration>, launcher: L) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            launcher,
        }
    }

    /// The platform binary
    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }

    /// Every command runs in the C locale, so messages matched against
    /// stderr are never translated.
    fn to_command(&self, command: &CommandLine) -> Command {
        let builder = match command {
            CommandLine::Platform { args } => Command::builder(&self.binary).args(args),
            CommandLine::Host { program, args } => Command::builder(program).args(args),
        };
        builder.env("LC_ALL", "C").build()
    }
}

#[async_trait]
impl<L: Launcher> CommandInvoker for CliInvoker<L> {
    async fn invoke(&self, command: &CommandLine) -> Result<Invocation> {
        let cmd = self.to_command(command);
        let rendered = cmd.to_string();

        let output = self
            .launcher
            .run(cmd, self.timeout)
            .await
            .map_err(|e| Error::invocation(rendered.clone(), e))?;

        let invocation = Invocation::from(output);
        debug!(command = %rendered, exit_code = invocation.exit_code, "invoked");
        Ok(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_display() {
        let platform = CommandLine::platform(["network", "inspect", "bridge"]);
        let host = CommandLine::host("ip", ["route"]);

        assert_eq!(platform.to_string(), "network inspect bridge");
        assert_eq!(host.to_string(), "(host) ip route");
        assert_eq!(CommandLine::host("true", Vec::<String>::new()).to_string(), "(host) true");
    }

    #[test]
    fn test_host_argv() {
        let argv = vec!["ip".to_string(), "-4".to_string(), "route".to_string()];
        assert_eq!(
            CommandLine::host_argv(&argv).unwrap(),
            CommandLine::host("ip", ["-4", "route"])
        );
        assert!(CommandLine::host_argv(&[]).is_err());
    }

    #[smol_potat::test]
    async fn test_cli_invoker_reports_non_zero_exit() {
        let invoker = CliInvoker::new("sh", None);
        let command = CommandLine::platform(["-c", "echo 'network x already exist' >&2; exit 1"]);

        let invocation = invoker.invoke(&command).await.unwrap();

        assert_eq!(invocation.exit_code, 1);
        assert_eq!(invocation.stdout, "");
        assert!(invocation.stderr.contains("already exist"));
    }

    #[smol_potat::test]
    async fn test_cli_invoker_runs_in_the_c_locale() {
        let invoker = CliInvoker::new("sh", None);
        let platform = CommandLine::platform(["-c", "echo \"$LC_ALL\""]);
        let host = CommandLine::host("sh", ["-c", "echo \"$LC_ALL\""]);

        assert_eq!(invoker.invoke(&platform).await.unwrap().stdout, "C\n");
        assert_eq!(invoker.invoke(&host).await.unwrap().stdout, "C\n");
    }

    #[smol_potat::test]
    async fn test_cli_invoker_runs_host_commands_directly() {
        let invoker = CliInvoker::new("binary-that-is-never-used", None);
        let command = CommandLine::host("echo", ["default via 10.0.0.1 dev eth0"]);

        let invocation = invoker.invoke(&command).await.unwrap();

        assert_eq!(invocation, Invocation::ok("default via 10.0.0.1 dev eth0\n"));
    }

    #[smol_potat::test]
    async fn test_cli_invoker_timeout_is_an_invocation_fault() {
        let invoker = CliInvoker::new("sleep", Some(Duration::from_millis(100)));

        let err = invoker
            .invoke(&CommandLine::platform(["5"]))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("sleep 5"));
    }

    #[smol_potat::test]
    async fn test_cli_invoker_missing_binary() {
        let invoker = CliInvoker::new("no-such-platform-binary-1234", None);

        let err = invoker
            .invoke(&CommandLine::platform(["network", "ls"]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Invocation { .. }));
        assert!(!err.is_timeout());
    }
}
