use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

/// Log file written when a log directory is given
pub const LOG_FILE: &str = "network-harness.log";

/// Level from the `-v` count, falling back to the configured one
pub fn level(verbose: u8, configured: &str) -> Result<Level> {
    match verbose {
        0 => configured
            .parse()
            .map_err(|_| anyhow!("Invalid log level '{}'", configured)),
        1 => Ok(Level::DEBUG),
        _ => Ok(Level::TRACE),
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so stdout stays machine-readable. With `log_dir` they go
/// to [`LOG_FILE`] in that directory; keep the returned guard alive until
/// exit so buffered lines are flushed.
pub fn init(level: Level, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI colors in log file
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(None)
        }
    }
}
