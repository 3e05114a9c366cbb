use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;

use commands::run::OutputFormat;

#[derive(Parser)]
#[command(name = "network-harness")]
#[command(about = "Network lifecycle harness - exercises a container platform's network commands")]
#[command(version)]
struct Cli {
    /// Configuration file path (harness.yaml is used when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the network lifecycle suite
    Run {
        /// Only run cases whose id contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write logs to a file in this directory instead of stderr
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// List the suite's cases and the resource names they use
    List {
        /// Only list cases whose id contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> Result<ExitCode> {
    smol::block_on(async {
        let cli = Cli::parse();
        let config = cli.config.as_deref();

        match cli.command {
            Commands::Run {
                filter,
                format,
                log_dir,
            } => {
                commands::run::run(config, cli.verbose, filter.as_deref(), format, log_dir.as_deref())
                    .await
            }
            Commands::List { filter } => {
                commands::list::run(config, filter.as_deref()).await?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Validate => {
                commands::validate::run(config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    })
}
