//! # Harness Configuration
//!
//! YAML configuration for the network-lifecycle harness.
//!
//! A configuration names the platform binary under test, the image used for
//! probe containers, and the run-wide settings (timeouts, logging, resource
//! name prefix). Every field has a default, so an empty document is valid.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod parser;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Supported configuration version
pub const CONFIG_VERSION: &str = "1.0";

/// Image used for probe containers unless configured otherwise
pub const DEFAULT_IMAGE: &str = "registry.hub.docker.com/library/busybox:latest";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration version
    #[serde(default = "default_version")]
    pub version: String,

    /// The platform under test
    #[serde(default)]
    pub platform: PlatformSettings,

    /// Run-wide settings
    #[serde(default)]
    pub settings: Settings,

    /// Host-side probes
    #[serde(default)]
    pub host: HostSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            platform: PlatformSettings::default(),
            settings: Settings::default(),
            host: HostSettings::default(),
        }
    }
}

impl Config {
    /// Check the configuration for values the harness cannot work with
    pub fn validate(&self) -> Result<()> {
        parser::validate_config(self)
    }
}

/// The container-management platform being driven
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlatformSettings {
    /// Management binary, looked up on `PATH` unless absolute
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Image for probe containers; must already be present
    #[serde(default = "default_image")]
    pub image: String,

    /// Host link the default bridge network is expected to create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_device: Option<String>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            image: default_image(),
            bridge_device: None,
        }
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Per-command timeout in seconds, 0 disables it
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,

    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prefix of every resource name the harness creates
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    /// Fixed run identifier; generated per run when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Settings {
    /// Per-command timeout, `None` when disabled
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout > 0).then(|| Duration::from_secs(self.command_timeout))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            command_timeout: default_command_timeout(),
            log_level: default_log_level(),
            name_prefix: default_name_prefix(),
            run_id: None,
        }
    }
}

/// Host-side probe configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostSettings {
    /// Command printing the host routing table, program first
    #[serde(default = "default_route_probe")]
    pub route_probe: Vec<String>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            route_probe: default_route_probe(),
        }
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_binary() -> String {
    "pouch".to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_command_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_name_prefix() -> String {
    "nh".to_string()
}

fn default_route_probe() -> Vec<String> {
    vec!["ip".to_string(), "route".to_string()]
}
