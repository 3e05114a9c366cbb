//! CLI integration tests for network-harness
//!
//! The platform binary is replaced by `true` or `false`, so these tests need
//! no container platform.

mod common;

use common::CliTestContext;

const CASE_IDS: [&str; 6] = [
    "network-default",
    "network-bridge-works",
    "network-create-wrong-driver",
    "network-create-with-label",
    "network-create-with-option",
    "network-create-dup",
];

fn platform_config(binary: &str) -> String {
    format!(
        r#"
version: "1.0"
platform:
  binary: "{binary}"
settings:
  command_timeout: 10
  run_id: ci1
host:
  route_probe: ["true"]
"#
    )
}

#[test]
fn test_validate_valid_config() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx.create_config("valid.yaml", &platform_config("pouch")).unwrap();

    let output = ctx
        .run_cli_command(&["validate", "-c", config.to_str().unwrap()])
        .unwrap();

    output
        .assert_success()
        .assert_stdout_contains("✓ Configuration valid")
        .assert_stdout_contains("Run id: ci1");
}

#[test]
fn test_validate_rejects_invalid_config() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx
        .create_config("bad.yaml", "version: \"2.0\"\n")
        .unwrap();

    let output = ctx
        .run_cli_command(&["validate", "-c", config.to_str().unwrap()])
        .unwrap();

    output
        .assert_failure()
        .assert_stderr_contains("Invalid configuration");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let ctx = CliTestContext::new().unwrap();

    let output = ctx
        .run_cli_command(&["validate", "-c", "does-not-exist.yaml"])
        .unwrap();

    output
        .assert_failure()
        .assert_stderr_contains("Failed to read config file");
}

#[test]
fn test_validate_without_config_uses_defaults() {
    let ctx = CliTestContext::new().unwrap();

    let output = ctx.run_cli_command(&["validate"]).unwrap();

    output
        .assert_success()
        .assert_stdout_contains("validating defaults")
        .assert_stdout_contains("Platform binary: pouch");
}

#[test]
fn test_default_config_file_is_picked_up() {
    let ctx = CliTestContext::new().unwrap();
    ctx.create_config("harness.yaml", &platform_config("docker"))
        .unwrap();

    let output = ctx.run_cli_command(&["validate"]).unwrap();

    output
        .assert_success()
        .assert_stdout_contains("Validating harness.yaml")
        .assert_stdout_contains("Platform binary: docker");
}

#[test]
fn test_list_shows_cases_and_resource_names() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx.create_config("list.yaml", &platform_config("pouch")).unwrap();

    let output = ctx
        .run_cli_command(&["list", "-c", config.to_str().unwrap()])
        .unwrap();

    output.assert_success().assert_stdout_contains("Run ci1");
    for id in CASE_IDS {
        output.assert_stdout_contains(&format!("nh.ci1.{id}"));
    }
}

#[test]
fn test_run_against_failing_platform_reports_every_case() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx.create_config("false.yaml", &platform_config("false")).unwrap();

    let output = ctx
        .run_cli_command(&["run", "-c", config.to_str().unwrap(), "--format", "json"])
        .unwrap();

    output.assert_exit_code(1);
    let report: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(report["run_id"], "ci1");
    let cases = report["cases"].as_array().unwrap();
    assert_eq!(cases.len(), CASE_IDS.len());
    for (case, id) in cases.iter().zip(CASE_IDS) {
        assert_eq!(case["case"], id);
        assert_eq!(case["verdict"], "fail");
    }
}

#[test]
fn test_run_passing_case_exits_zero() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx
        .create_config("env.yaml", &platform_config("${NH_TEST_PLATFORM}"))
        .unwrap();

    let output = ctx
        .run_cli_command_with_env(
            &["run", "-c", config.to_str().unwrap(), "--filter", "network-default"],
            &[("NH_TEST_PLATFORM", "true")],
        )
        .unwrap();

    output
        .assert_success()
        .assert_stdout_contains("PASS")
        .assert_stdout_contains("1 passed, 0 failed");
}

#[test]
fn test_run_writes_log_file() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx.create_config("log.yaml", &platform_config("true")).unwrap();
    let log_dir = ctx.test_dir().join("logs");

    let output = ctx
        .run_cli_command(&[
            "run",
            "-c",
            config.to_str().unwrap(),
            "--filter",
            "network-default",
            "--log-dir",
            log_dir.to_str().unwrap(),
        ])
        .unwrap();

    output.assert_success();
    let log = std::fs::read_to_string(log_dir.join("network-harness.log")).unwrap();
    assert!(log.contains("Starting network lifecycle suite"), "{log}");
}

#[test]
fn test_run_with_unmatched_filter_fails() {
    let ctx = CliTestContext::new().unwrap();
    let config = ctx.create_config("filter.yaml", &platform_config("true")).unwrap();

    let output = ctx
        .run_cli_command(&["run", "-c", config.to_str().unwrap(), "--filter", "nothing"])
        .unwrap();

    output
        .assert_failure()
        .assert_stderr_contains("No test case matches filter 'nothing'");
}
