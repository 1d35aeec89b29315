//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ResultExt};

/// Environment variable that overrides the default log filter.
pub const LOG_ENV_VAR: &str = "SENTINEL_LOG";

const DEFAULT_FILTER: &str =
    "scam_sentinel=info,sentinel_app=info,sentinel_transport=info,sentinel_tui=info,warn";

const LOG_FILE_NAME: &str = "sentinel.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/scam-sentinel/logs/`. Stdout is never
/// used: the TUI owns the terminal and headless mode owns stdout for NDJSON.
/// Log level is controlled by the `SENTINEL_LOG` environment variable.
///
/// # Examples
/// ```bash
/// SENTINEL_LOG=debug sentinel
/// SENTINEL_LOG=sentinel_transport=trace sentinel --headless
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(build_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Scam Sentinel starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// `SENTINEL_LOG` if set and valid, otherwise the default filter.
fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("scam-sentinel").join("logs"))
}
