//! Runtime-agnostic command execution library
//!
//! This crate provides the process-launch primitive the harness is built on:
//! a reusable [`Command`] builder, the [`Launcher`] trait, and a local backend
//! that captures stdout, stderr and the exit code of a single-shot command.

#![warn(missing_docs)]

pub mod backends;
pub mod command;
pub mod error;
pub mod launcher;
pub mod process;

pub use backends::LocalLauncher;
pub use command::{Command, CommandBuilder};
pub use error::{Error, Result};
pub use launcher::Launcher;
pub use process::{CommandOutput, ExitStatus};
