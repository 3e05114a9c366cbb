use anyhow::{Context, Result};
use comfy_table::Table;
use harness_core::prelude::*;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, filter: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let ctx = SuiteContext::from_config(&config).context("Failed to prepare suite")?;
    let cases = select(network_lifecycle_suite(&ctx)?, filter);

    let mut table = Table::new();
    table.set_header(vec!["CASE", "NETWORK", "STEPS", "DESCRIPTION"]);
    for case in &cases {
        table.add_row(vec![
            case.id.to_string(),
            ctx.namer.name_for(&case.id)?,
            (case.setup.len() + case.steps.len()).to_string(),
            case.description.clone(),
        ]);
    }

    println!("Run {}", ctx.run_id());
    println!("{}", table);
    Ok(())
}
