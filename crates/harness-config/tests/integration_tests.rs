//! Integration tests for harness-config

use harness_config::{ConfigError, DEFAULT_IMAGE, parser};
use std::time::Duration;

#[test]
fn test_full_config_parsing() {
    let yaml = r#"
version: "1.0"

platform:
  binary: /usr/local/bin/pouch
  image: "busybox:1.36"
  bridge_device: p0

settings:
  command_timeout: 30
  log_level: debug
  name_prefix: ci
  run_id: build-1234

host:
  route_probe: ["ip", "-4", "route"]
"#;

    let config = parser::parse_str(yaml).unwrap();

    assert_eq!(config.platform.binary, "/usr/local/bin/pouch");
    assert_eq!(config.platform.image, "busybox:1.36");
    assert_eq!(config.platform.bridge_device.as_deref(), Some("p0"));
    assert_eq!(config.settings.command_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.settings.log_level, "debug");
    assert_eq!(config.settings.name_prefix, "ci");
    assert_eq!(config.settings.run_id.as_deref(), Some("build-1234"));
    assert_eq!(config.host.route_probe, vec!["ip", "-4", "route"]);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = parser::parse_str("version: \"1.0\"\n").unwrap();

    assert_eq!(config.platform.binary, "pouch");
    assert_eq!(config.platform.image, DEFAULT_IMAGE);
    assert_eq!(config.platform.bridge_device, None);
    assert_eq!(config.settings.command_timeout(), Some(Duration::from_secs(60)));
    assert_eq!(config.settings.name_prefix, "nh");
    assert_eq!(config.host.route_probe, vec!["ip", "route"]);
}

#[test]
fn test_zero_timeout_disables_bound() {
    let config = parser::parse_str("settings:\n  command_timeout: 0\n").unwrap();
    assert_eq!(config.settings.command_timeout(), None);
}

#[test]
fn test_env_substitution_in_values() {
    let yaml = r#"
platform:
  binary: "${HARNESS_TEST_UNSET_BINARY:-docker}"
  # ${HARNESS_TEST_ONLY_IN_COMMENT} is never expanded
"#;

    let config = parser::parse_str(yaml).unwrap();
    assert_eq!(config.platform.binary, "docker");
}

#[test]
fn test_missing_env_var_is_an_error() {
    let yaml = "platform:\n  image: \"${HARNESS_TEST_UNSET_IMAGE}\"\n";

    let err = parser::parse_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::EnvVarNotFound(ref v) if v == "HARNESS_TEST_UNSET_IMAGE"));
}

#[test]
fn test_validation_failures() {
    let cases = [
        ("version: \"2.0\"\n", "Unsupported version"),
        ("platform:\n  binary: \"\"\n", "platform.binary"),
        ("platform:\n  image: \" \"\n", "platform.image"),
        ("host:\n  route_probe: []\n", "host.route_probe"),
        ("settings:\n  log_level: loud\n", "Unknown log level"),
        ("settings:\n  name_prefix: Bad_Prefix\n", "settings.name_prefix"),
        ("settings:\n  run_id: \"-x\"\n", "settings.run_id"),
    ];

    for (yaml, expected) in cases {
        let err = parser::parse_str(yaml).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "yaml {:?} produced {:?}",
            yaml,
            err.to_string()
        );
    }
}

#[test]
fn test_unknown_fields_are_rejected() {
    let err = parser::parse_str("platform:\n  binnary: pouch\n").unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[test]
fn test_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("harness.yaml");
    std::fs::write(&path, "platform:\n  binary: docker\n").unwrap();

    let config = parser::parse_file(&path).unwrap();
    assert_eq!(config.platform.binary, "docker");

    let err = parser::parse_file(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError(_)));
}
