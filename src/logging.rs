//! Logging setup.
//!
//! Wizard (TUI) mode writes to `{state}/logs/anuncio-{datetime}.log` so log
//! lines never land on the alternate screen. Subcommands log to stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the background log writer alive; flushes on drop
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,

    /// Only set when logging to a file
    pub log_file_path: Option<PathBuf>,
}

/// Level directive: `--debug` wins over the configured level
fn level_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

fn log_file_name(now: DateTime<Utc>) -> String {
    format!("anuncio-{}.log", now.format("%Y%m%dT%H%M%SZ"))
}

/// Whether this run writes its log to a file
pub fn logs_to_file(config: &Config, is_tui_mode: bool) -> bool {
    is_tui_mode && config.logging.to_file
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let directive =
        std::env::var("RUST_LOG").unwrap_or_else(|_| level_directive(config, debug_override));
    let filter = EnvFilter::new(directive);

    if !logs_to_file(config, is_tui_mode) {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        return Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        });
    }

    let logs_dir = config.logs_path();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let log_filename = log_file_name(Utc::now());
    let log_file_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(LoggingHandle {
        _guard: Some(guard),
        log_file_path: Some(log_file_path),
    })
}
