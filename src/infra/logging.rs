use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError, storage_layout::StorageLayout};

const LOG_FILE_PREFIX: &str = "replykb.log";

/// Routes logs to a daily rolling file, since the TUI owns the terminal.
/// The returned guard flushes pending records when dropped.
pub fn init(config: &LogConfig) -> Result<WorkerGuard, AppError> {
    let layout = StorageLayout::resolve(config)?;
    layout.ensure_dirs()?;

    let appender = tracing_appender::rolling::daily(&layout.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    tracing::debug!(log_dir = %layout.log_dir.display(), "file logging initialized");
    Ok(guard)
}

/// Stderr logging for the non-interactive subcommands.
pub fn init_stderr(config: &LogConfig) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(AppError::LoggingInit)
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}
