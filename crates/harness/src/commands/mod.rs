pub mod list;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use harness_config::{Config, parser};
use std::path::Path;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG: &str = "harness.yaml";

/// Load `path`, or `harness.yaml` if it exists, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => parser::parse_file(path)
            .with_context(|| format!("Failed to parse configuration {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => parser::parse_file(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to parse configuration {}", DEFAULT_CONFIG)),
        None => Ok(Config::default()),
    }
}
