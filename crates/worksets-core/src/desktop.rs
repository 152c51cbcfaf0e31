//! The desktop shell as seen by worksets.
//!
//! Implementations wrap whatever window manager or shell is hosting the
//! session. Calls are synchronous and are expected to return quickly; the
//! shell reports changes back through the session manager's event methods.

use serde_json::Value;

use crate::model::{BackgroundStyle, FavApp};
use crate::validator;

/// Metadata the shell knows about an installed application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppInfo {
    pub id: String,
    pub display_name: String,
    pub icon: String,
    pub exec: String,
}

/// Read-only queries about the active workspace.
pub trait ActiveWorkspaceQuery: Send + Sync {
    /// Index of the workspace the user is looking at.
    fn active_workspace_index(&self) -> usize;

    /// Application ids with windows open on the given workspace.
    fn workspace_app_ids(&self, index: usize) -> Vec<String>;
}

/// Window-manager operations the synchronizer and session manager drive.
pub trait DesktopShell: ActiveWorkspaceQuery {
    fn workspace_count(&self) -> usize;

    fn activate_workspace(&self, index: usize);

    /// Appends a workspace at the end and returns its index.
    fn append_workspace(&self) -> usize;

    /// Marks whether the workspace survives being empty.
    fn set_workspace_persistent(&self, index: usize, persistent: bool);

    /// The shell's current favorites, as application ids.
    fn favorite_app_ids(&self) -> Vec<String>;

    fn set_favorite_app_ids(&self, app_ids: &[String]);

    fn app_info(&self, app_id: &str) -> Option<AppInfo>;

    /// Current background image (may carry a `file://` prefix).
    fn background(&self) -> String;

    fn set_background(&self, path: &str, style: BackgroundStyle);

    /// Whether the desktop currently uses a dark color scheme.
    fn prefers_dark(&self) -> bool {
        false
    }
}

/// Builds favorite entries for application ids using the shell's metadata.
///
/// Entries go through the validator like any other untrusted record; ids the
/// shell cannot describe become bare entries.
pub fn resolve_favorites(shell: &dyn DesktopShell, app_ids: &[String]) -> Vec<FavApp> {
    let mut apps: Vec<FavApp> = Vec::new();
    for (index, app_id) in app_ids.iter().enumerate() {
        if app_id.is_empty() || apps.iter().any(|app| &app.name == app_id) {
            continue;
        }
        let raw = match shell.app_info(app_id) {
            Some(info) => serde_json::json!({
                "name": app_id,
                "displayName": info.display_name,
                "icon": info.icon,
                "exec": info.exec,
            }),
            None => serde_json::json!({ "name": app_id, "displayName": app_id }),
        };
        if let Some(app) = validator::validate_fav_app(&raw, index) {
            apps.push(app);
        }
    }
    apps.truncate(validator::MAX_FAV_APPS_COUNT);
    apps
}

/// The shell's background as a plain path, or an empty string.
pub fn current_background(shell: &dyn DesktopShell) -> String {
    validator::validate_image_path(&Value::String(shell.background()), "desktop background")
}
