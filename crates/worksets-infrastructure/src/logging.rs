//! Tracing subscriber setup.
//!
//! Logs go to stderr and, when `debug_log` is enabled, to `debug.log` in the
//! worksets directory. `RUST_LOG` overrides the configured level.

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use worksets_core::config::WorksetsConfig;
use worksets_core::{Result, WorksetsError};

use crate::paths::{DEBUG_LOG_FILE_NAME, WorksetsPaths};

fn env_filter(config: &WorksetsConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for as long as logs should reach the file;
/// dropping it flushes and stops the background writer.
///
/// # Errors
///
/// - `Io` when the log directory cannot be created
/// - `Config` when a global subscriber is already installed
pub fn init_logging(config: &WorksetsConfig, paths: &WorksetsPaths) -> Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = if config.debug_log {
        std::fs::create_dir_all(paths.config_dir())?;
        let appender = tracing_appender::rolling::never(paths.config_dir(), DEBUG_LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| WorksetsError::config(format!("logging already initialized: {e}")))?;

    Ok(guard)
}
