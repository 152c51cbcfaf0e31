use anyhow::{Context, Result};
use std::path::PathBuf;
use worksets_core::config::WorksetsConfig;
use worksets_core::model::Session;
use worksets_core::repository::SessionRepository;
use worksets_infrastructure::logging::{self, WorkerGuard};
use worksets_infrastructure::{ConfigService, JsonSessionRepository, WorksetsPaths};

/// Uses `--config-dir` when given, the per-user directory otherwise.
pub fn resolve_paths(config_dir: Option<PathBuf>) -> Result<WorksetsPaths> {
    match config_dir {
        Some(dir) => Ok(WorksetsPaths::new(dir)),
        None => WorksetsPaths::from_platform().context("Failed to locate the worksets directory"),
    }
}

pub fn load_config(paths: &WorksetsPaths) -> WorksetsConfig {
    ConfigService::new(paths).load_or_default()
}

/// Installs logging. Failures are printed and otherwise ignored.
pub fn init_logging(config: &WorksetsConfig, paths: &WorksetsPaths) -> Option<WorkerGuard> {
    match logging::init_logging(config, paths) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    }
}

/// Loads the stored session, failing when there is none.
pub async fn load_stored_session(
    repository: &JsonSessionRepository,
    paths: &WorksetsPaths,
) -> Result<Session> {
    repository
        .load_session()
        .await
        .with_context(|| format!("Failed to read {}", paths.session_file().display()))?
        .with_context(|| format!("No stored session in {}", paths.config_dir().display()))
}
