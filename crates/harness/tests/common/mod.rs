//! Common test utilities for CLI integration tests

#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test context owning a scratch directory the CLI runs in
pub struct CliTestContext {
    pub test_dir: TempDir,
    pub harness_binary: PathBuf,
}

impl CliTestContext {
    /// Create a new test context
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_dir: TempDir::new()?,
            harness_binary: PathBuf::from(env!("CARGO_BIN_EXE_network-harness")),
        })
    }

    /// Run a CLI command and return its output
    pub fn run_cli_command(&self, args: &[&str]) -> Result<CliOutput> {
        self.run_cli_command_with_env(args, &[])
    }

    /// Run a CLI command with custom environment variables
    pub fn run_cli_command_with_env(
        &self,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CliOutput> {
        let mut cmd = Command::new(&self.harness_binary);
        cmd.current_dir(self.test_dir.path());

        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd.args(args).output()?;

        Ok(CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        })
    }

    /// Create a custom configuration file
    pub fn create_config(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let config_path = self.test_dir.path().join(filename);
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Get the test directory path
    pub fn test_dir(&self) -> &Path {
        self.test_dir.path()
    }
}

#[derive(Debug)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CliOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.success {
            panic!(
                "Command failed with exit code {:?}\nSTDOUT:\n{}\nSTDERR:\n{}",
                self.exit_code, self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        if self.success {
            panic!(
                "Command succeeded but was expected to fail\nSTDOUT:\n{}\nSTDERR:\n{}",
                self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        if self.exit_code != Some(expected) {
            panic!(
                "Expected exit code {}, got {:?}\nSTDOUT:\n{}\nSTDERR:\n{}",
                expected, self.exit_code, self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        if !self.stdout.contains(text) {
            panic!("STDOUT does not contain '{}'\nSTDOUT:\n{}", text, self.stdout);
        }
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        if !self.stderr.contains(text) {
            panic!("STDERR does not contain '{}'\nSTDERR:\n{}", text, self.stderr);
        }
        self
    }
}
