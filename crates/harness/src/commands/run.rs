use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use comfy_table::{Cell, Color, Table};
use harness_core::prelude::*;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use crate::logging;

/// How the suite report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary table
    Text,
    /// The full report as JSON
    Json,
}

pub async fn run(
    config_path: Option<&Path>,
    verbose: u8,
    filter: Option<&str>,
    format: OutputFormat,
    log_dir: Option<&Path>,
) -> Result<ExitCode> {
    let config = super::load_config(config_path)?;
    let _guard = logging::init(logging::level(verbose, &config.settings.log_level)?, log_dir)?;

    let ctx = SuiteContext::from_config(&config).context("Failed to prepare suite")?;
    let cases = select(network_lifecycle_suite(&ctx)?, filter);
    if cases.is_empty() {
        bail!("No test case matches filter '{}'", filter.unwrap_or_default());
    }

    info!(
        run = %ctx.run_id(),
        binary = %config.platform.binary,
        cases = cases.len(),
        "Starting network lifecycle suite"
    );
    let orchestrator = Orchestrator::new(CliInvoker::from_config(&config));
    let report = orchestrator.run_suite(ctx.run_id(), &cases).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => display_report(&report),
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn display_report(report: &SuiteReport) {
    let mut table = Table::new();
    table.set_header(vec!["CASE", "RESULT", "PHASE", "DURATION", "NOTES"]);

    for case in &report.cases {
        let (result, color, phase) = match &case.verdict {
            Verdict::Pass => ("PASS", Color::Green, "-".to_string()),
            Verdict::Fail { phase, .. } => ("FAIL", Color::Red, phase.to_string()),
        };

        let mut notes = Vec::new();
        let known = case.known_issues().count();
        if known > 0 {
            notes.push(format!("{} known issue(s)", known));
        }
        if !case.cleanup_faults.is_empty() {
            notes.push(format!("{} cleanup fault(s)", case.cleanup_faults.len()));
        }
        let notes = if notes.is_empty() {
            "-".to_string()
        } else {
            notes.join(", ")
        };

        table.add_row(vec![
            Cell::new(&case.case),
            Cell::new(result).fg(color),
            Cell::new(phase),
            Cell::new(format!("{}ms", case.duration_ms)),
            Cell::new(notes),
        ]);
    }

    println!("Run {}", report.run_id);
    println!("{}", table);

    for case in &report.cases {
        if let Verdict::Fail { reason, .. } = &case.verdict {
            println!("✗ {}: {}", case.case, reason);
        }
        for fault in &case.cleanup_faults {
            println!("  ⚠ cleanup `{}`: {}", fault.command, fault.reason);
        }
    }

    println!(
        "{} passed, {} failed",
        report.passed(),
        report.failed()
    );
}
