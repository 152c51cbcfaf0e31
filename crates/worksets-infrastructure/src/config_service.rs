//! Configuration service implementation.
//!
//! Loads `config.toml` from the worksets directory and caches it.

use std::sync::{Arc, RwLock};
use tracing::warn;
use worksets_core::config::WorksetsConfig;
use worksets_core::{Result, WorksetsError};

use crate::paths::WorksetsPaths;
use crate::storage::AtomicTomlFile;

/// Loads and caches the application configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<WorksetsConfig>>,
    cache: Arc<RwLock<Option<WorksetsConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &WorksetsPaths) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(paths.config_file())),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, reading the file on first use.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<WorksetsConfig> {
        if let Some(cached) = self.read_cache()? {
            return Ok(cached);
        }
        let loaded = self.file.load()?.unwrap_or_default();
        self.write_cache(Some(loaded.clone()))?;
        Ok(loaded)
    }

    /// Like [`ConfigService::load`], falling back to defaults on any error.
    pub fn load_or_default(&self) -> WorksetsConfig {
        self.load().unwrap_or_else(|e| {
            warn!("[ConfigService] using default configuration: {}", e);
            WorksetsConfig::default()
        })
    }

    /// Applies `f` to the stored configuration under the file lock and saves it.
    pub fn update<F>(&self, f: F) -> Result<WorksetsConfig>
    where
        F: FnOnce(&mut WorksetsConfig),
    {
        let updated = self.file.update(WorksetsConfig::default(), f)?;
        self.write_cache(Some(updated.clone()))?;
        Ok(updated)
    }

    /// Drops the cached copy so the next [`ConfigService::load`] rereads the file.
    pub fn invalidate_cache(&self) -> Result<()> {
        self.write_cache(None)
    }

    fn read_cache(&self) -> Result<Option<WorksetsConfig>> {
        self.cache
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| WorksetsError::internal("config cache lock poisoned"))
    }

    fn write_cache(&self, value: Option<WorksetsConfig>) -> Result<()> {
        let mut guard = self
            .cache
            .write()
            .map_err(|_| WorksetsError::internal("config cache lock poisoned"))?;
        *guard = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(&WorksetsPaths::new(dir.path()));
        assert_eq!(service.load().unwrap(), WorksetsConfig::default());
    }

    #[test]
    fn test_update_persists_and_refreshes_cache() {
        let dir = TempDir::new().unwrap();
        let paths = WorksetsPaths::new(dir.path());
        let service = ConfigService::new(&paths);
        service.load().unwrap();

        service.update(|c| c.log_level = "debug".into()).unwrap();

        assert_eq!(service.load().unwrap().log_level, "debug");
        let fresh = ConfigService::new(&paths);
        assert_eq!(fresh.load().unwrap().log_level, "debug");
    }

    #[test]
    fn test_cache_survives_external_edits_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let paths = WorksetsPaths::new(dir.path());
        let service = ConfigService::new(&paths);
        service.load().unwrap();

        std::fs::write(paths.config_file(), "debug_log = false\n").unwrap();
        assert!(service.load().unwrap().debug_log);

        service.invalidate_cache().unwrap();
        assert!(!service.load().unwrap().debug_log);
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = WorksetsPaths::new(dir.path());
        std::fs::write(paths.config_file(), "log_level = [").unwrap();
        let service = ConfigService::new(&paths);

        assert!(service.load().is_err());
        assert_eq!(service.load_or_default(), WorksetsConfig::default());
    }
}
