//! Configuration parser with environment variable substitution

use crate::{CONFIG_VERSION, Config, ConfigError, Result};
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;
use std::sync::LazyLock;

static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference pattern"));

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Parse a YAML configuration file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse YAML configuration from a string
///
/// Environment references are substituted in string values only, so a
/// reference inside a comment is never expanded.
pub fn parse_str(content: &str) -> Result<Config> {
    let mut raw: Value = serde_yaml::from_str(content)?;
    if raw.is_null() {
        raw = Value::Mapping(Default::default());
    }
    substitute_value(&mut raw)?;

    let config: Config = serde_yaml::from_value(raw)?;
    validate_config(&config)?;
    Ok(config)
}

fn substitute_value(value: &mut Value) -> Result<()> {
    match value {
        Value::String(s) => {
            *s = substitute_env_vars(s)?;
        }
        Value::Sequence(items) => {
            for item in items {
                substitute_value(item)?;
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                substitute_value(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported version: {}, expected {}",
            config.version, CONFIG_VERSION
        )));
    }

    if config.platform.binary.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "platform.binary must not be empty".to_string(),
        ));
    }

    if config.platform.image.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "platform.image must not be empty".to_string(),
        ));
    }

    if let Some(device) = &config.platform.bridge_device {
        if device.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "platform.bridge_device must not be empty when set".to_string(),
            ));
        }
    }

    if config.host.route_probe.is_empty() || config.host.route_probe[0].trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "host.route_probe must name a program".to_string(),
        ));
    }

    if !LOG_LEVELS.contains(&config.settings.log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "Unknown log level '{}', expected one of {}",
            config.settings.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if !is_name_fragment(&config.settings.name_prefix) {
        return Err(ConfigError::ValidationError(format!(
            "settings.name_prefix '{}' {}",
            config.settings.name_prefix, NAME_FRAGMENT_RULE
        )));
    }

    if let Some(run_id) = &config.settings.run_id {
        if !is_name_fragment(run_id) {
            return Err(ConfigError::ValidationError(format!(
                "settings.run_id '{}' {}",
                run_id, NAME_FRAGMENT_RULE
            )));
        }
    }

    Ok(())
}

/// How a resource name fragment must look, for error messages
pub const NAME_FRAGMENT_RULE: &str = "must start with [a-z0-9] and contain only [a-z0-9_-]";

/// Whether `s` can be one part of a resource name.
///
/// Fragments never contain [`NAME_SEPARATOR`], so joining them with it can
/// not make two different part lists collide.
pub fn is_name_fragment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-'))
}

/// Joins the parts of a resource name
pub const NAME_SEPARATOR: char = '.';

/// Substitute environment variables in a string
///
/// Supports `${VAR}` and `${VAR:-default}`. All missing variables are
/// reported together.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut errors = Vec::new();

    let result = ENV_REF.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_expr = &cap[1];

        // Handle default values: ${VAR:-default}
        let (var_name, default_value) = match var_expr.find(":-") {
            Some(pos) => (&var_expr[..pos], Some(&var_expr[pos + 2..])),
            None => (var_expr, None),
        };

        match (std::env::var(var_name), default_value) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                errors.push(var_name.to_string());
                String::new()
            }
        }
    });

    if !errors.is_empty() {
        return Err(ConfigError::EnvVarNotFound(errors.join(", ")));
    }

    Ok(result.into_owned())
}
