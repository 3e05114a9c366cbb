use anyhow::Result;
use std::path::Path;

use super::DEFAULT_CONFIG;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating {}...", path.display()),
        None if Path::new(DEFAULT_CONFIG).exists() => println!("Validating {}...", DEFAULT_CONFIG),
        None => println!("No configuration file, validating defaults..."),
    }

    // Validation is done during parsing
    let config = super::load_config(config_path)?;

    println!("✓ Configuration valid");
    println!("  Version: {}", config.version);
    println!("  Platform binary: {}", config.platform.binary);
    println!("  Image: {}", config.platform.image);
    if let Some(device) = &config.platform.bridge_device {
        println!("  Bridge device: {}", device);
    }
    match config.settings.command_timeout() {
        Some(timeout) => println!("  Command timeout: {}s", timeout.as_secs()),
        None => println!("  Command timeout: none"),
    }
    println!("  Name prefix: {}", config.settings.name_prefix);
    println!(
        "  Run id: {}",
        config.settings.run_id.as_deref().unwrap_or("generated per run")
    );
    println!("  Route probe: {}", config.host.route_probe.join(" "));

    Ok(())
}
