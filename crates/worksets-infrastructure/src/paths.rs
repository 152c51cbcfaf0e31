//! Path management for worksets configuration and session files.
//!
//! Everything lives under one directory so a user can back it up or wipe it
//! in one go.

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "worksets";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find the user configuration directory")]
    ConfigDirNotFound,
}

/// Resolved locations of all worksets files.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/worksets/
/// ├── session.json                       # Live session
/// ├── session-backup-<timestamp>.json    # Session backups
/// ├── config.toml                        # Application configuration
/// ├── debug.log                          # Log file when enabled
/// ├── worksets/                          # Saved worksets
/// │   └── workset-<name>[-<timestamp>].json
/// └── collections/                       # Saved collections
///     └── collection-<name>.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksetsPaths {
    config_dir: PathBuf,
}

impl WorksetsPaths {
    /// Uses the platform config directory (e.g. `~/.config/worksets/`).
    ///
    /// # Errors
    ///
    /// Returns `PathError::ConfigDirNotFound` when the platform has no config directory.
    pub fn from_platform() -> Result<Self, PathError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join(APP_DIR_NAME)))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Uses `config_dir` as the worksets directory.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE_NAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn debug_log_file(&self) -> PathBuf {
        self.config_dir.join(DEBUG_LOG_FILE_NAME)
    }

    pub fn worksets_dir(&self) -> PathBuf {
        self.config_dir.join("worksets")
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.config_dir.join("collections")
    }
}

pub const SESSION_FILE_NAME: &str = "session.json";
pub const DEBUG_LOG_FILE_NAME: &str = "debug.log";
