//! Explicit application lifecycle.
//!
//! `AppContext` owns everything that lives between the desktop enabling the
//! extension and disabling it. Nothing is global: the context is created by
//! the host, passed collaborators explicitly and dropped on shutdown.

use std::sync::Arc;
use tracing::{info, warn};
use worksets_core::Result;
use worksets_core::chooser::AppChooser;
use worksets_core::config::{AppChooserConfig, WorksetsConfig};
use worksets_core::desktop::DesktopShell;
use worksets_core::prompt::UserPrompt;
use worksets_core::validator::{self, ChmodDecision};
use worksets_infrastructure::{ConfigService, JsonSessionRepository, WorksetsPaths};

use crate::session::{SessionFactory, SessionManager};

/// Checks the configured application-chooser helper before it is used.
///
/// The helper is only made executable after its checksum passed, and a pinned
/// checksum is verified even when it already is executable. Returns `false`
/// when the helper must not be run. Without a configured path there is
/// nothing to check.
pub fn prepare_app_chooser(config: &AppChooserConfig) -> Result<bool> {
    let Some(path) = config.path.as_deref() else {
        return Ok(true);
    };
    let expected = config.expected_sha256.as_deref();

    let decision = validator::ensure_app_chooser_executable(path, expected);
    match &decision {
        ChmodDecision::Refused(_) => return Ok(false),
        ChmodDecision::AlreadyExecutable if expected.is_some() => {
            let check = validator::verify_app_chooser_integrity(path, expected);
            if !check.is_verified() {
                warn!(
                    "[AppContext] application chooser {} failed its checksum: {:?}",
                    path.display(),
                    check
                );
                return Ok(false);
            }
        }
        _ => {}
    }
    validator::apply_chmod(path, &decision)?;
    Ok(true)
}

/// Everything the running extension owns.
pub struct AppContext {
    paths: WorksetsPaths,
    config: WorksetsConfig,
    shell: Arc<dyn DesktopShell>,
    prompt: Arc<dyn UserPrompt>,
    chooser: Option<Arc<dyn AppChooser>>,
    manager: Option<Arc<SessionManager>>,
}

impl AppContext {
    /// Creates a disabled context.
    ///
    /// # Arguments
    ///
    /// * `paths` - Where the session and exported objects live
    /// * `config` - Application configuration
    /// * `shell` - The desktop
    /// * `prompt` - Dialogs and feedback
    /// * `chooser` - Launcher for the application-chooser helper, if available
    pub fn new(
        paths: WorksetsPaths,
        config: WorksetsConfig,
        shell: Arc<dyn DesktopShell>,
        prompt: Arc<dyn UserPrompt>,
        chooser: Option<Arc<dyn AppChooser>>,
    ) -> Self {
        Self {
            paths,
            config,
            shell,
            prompt,
            chooser,
            manager: None,
        }
    }

    /// Creates a disabled context with the configuration read from `config.toml`.
    pub fn from_config(
        paths: WorksetsPaths,
        shell: Arc<dyn DesktopShell>,
        prompt: Arc<dyn UserPrompt>,
        chooser: Option<Arc<dyn AppChooser>>,
    ) -> Self {
        let config = ConfigService::new(&paths).load_or_default();
        Self::new(paths, config, shell, prompt, chooser)
    }

    pub fn config(&self) -> &WorksetsConfig {
        &self.config
    }

    pub fn paths(&self) -> &WorksetsPaths {
        &self.paths
    }

    /// The running session manager, if enabled.
    pub fn manager(&self) -> Option<&Arc<SessionManager>> {
        self.manager.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.manager.is_some()
    }

    /// Loads (or creates) the session and starts driving the desktop.
    ///
    /// Enabling an enabled context returns the running manager.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be written.
    pub async fn enable(&mut self) -> Result<Arc<SessionManager>> {
        if let Some(manager) = &self.manager {
            return Ok(manager.clone());
        }

        let chooser = match prepare_app_chooser(&self.config.app_chooser) {
            Ok(true) => self.chooser.clone(),
            Ok(false) => {
                warn!("[AppContext] application chooser disabled");
                None
            }
            Err(e) => {
                warn!("[AppContext] application chooser disabled: {}", e);
                None
            }
        };

        let manager = Arc::new(SessionManager::new(
            Arc::new(JsonSessionRepository::new(&self.paths)),
            self.shell.clone(),
            self.prompt.clone(),
            chooser,
            SessionFactory::new(&self.config.prototypes),
        ));
        manager.start().await?;
        info!("[AppContext] enabled in {}", self.paths.config_dir().display());
        self.manager = Some(manager.clone());
        Ok(manager)
    }

    /// Flushes the session, resets the desktop and drops the manager.
    pub async fn disable(&mut self) -> Result<()> {
        let Some(manager) = self.manager.take() else {
            return Ok(());
        };
        manager.destroy().await?;
        info!("[AppContext] disabled");
        Ok(())
    }
}
