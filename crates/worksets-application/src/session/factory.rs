use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use worksets_core::config::PrototypeConfig;
use worksets_core::desktop::{self, DesktopShell};
use worksets_core::model::{FavApp, Session, Workset};
use worksets_core::validator::{self, DEFAULT_SESSION_NAME, PRIMARY_WORKSET_NAME};

/// Name of the single workset of a session created without the environment.
pub const NEW_WORKSET_NAME: &str = "New";

fn builtin_workset_prototype() -> Value {
    json!({
        "WorksetName": "",
        "BackgroundImage": "",
        "BackgroundImageDark": "",
        "BackgroundStyle": "ZOOM",
        "BackgroundStyleDark": "ZOOM",
        "FavApps": []
    })
}

fn builtin_session_prototype() -> Value {
    json!({
        "SessionName": DEFAULT_SESSION_NAME,
        "Default": "",
        "Options": {
            "ShowNotifications": true,
            "ShowHelpers": true,
            "IsolateWorkspaces": false,
            "ShowPanelIndicator": true,
            "ShowWorkspaceOverlay": true,
            "ShowOverlayThumbnailLabels": true,
            "HideAppList": false,
            "DisableWallpaperManagement": false,
            "ReverseMenu": false,
            "DebugMode": false,
            "GrayscaleIcon": false,
            "CliSwitch": ""
        },
        "Worksets": [builtin_workset_prototype()],
        "workspaceMaps": {}
    })
}

/// Parses a configured prototype, falling back to the built-in one.
fn prototype(configured: Option<&str>, builtin: fn() -> Value, what: &str) -> Map<String, Value> {
    if let Some(raw) = configured {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => {
                debug!("[SessionFactory] using configured {} prototype", what);
                return object;
            }
            Ok(_) => warn!("[SessionFactory] {} prototype is not a JSON object; using built-in", what),
            Err(e) => warn!("[SessionFactory] {} prototype is not valid JSON ({}); using built-in", what, e),
        }
    }
    match builtin() {
        Value::Object(object) => object,
        _ => Map::new(),
    }
}

fn fav_apps_value(apps: &[FavApp]) -> Value {
    serde_json::to_value(apps).unwrap_or_else(|_| Value::Array(Vec::new()))
}

/// Builds new sessions and worksets from prototype templates.
///
/// Every record it produces goes through the validator, so a hand-edited
/// prototype in `config.toml` can never smuggle in anything the loader would
/// reject.
pub struct SessionFactory {
    session_prototype: Map<String, Value>,
    workset_prototype: Map<String, Value>,
}

impl Default for SessionFactory {
    fn default() -> Self {
        Self::new(&PrototypeConfig::default())
    }
}

impl SessionFactory {
    /// Creates a new SessionFactory.
    ///
    /// # Arguments
    ///
    /// * `prototypes` - Optional JSON overrides for the session and workset templates
    pub fn new(prototypes: &PrototypeConfig) -> Self {
        Self {
            session_prototype: prototype(
                prototypes.session.as_deref(),
                builtin_session_prototype,
                "session",
            ),
            workset_prototype: prototype(
                prototypes.workset.as_deref(),
                builtin_workset_prototype,
                "workset",
            ),
        }
    }

    /// Creates a session with a single workset shown on the first workspace.
    ///
    /// # Arguments
    ///
    /// * `from_environment` - Seed the workset (named `Primary`) with the desktop's
    ///   current favorites and background; otherwise it is an empty `New` workset
    /// * `shell` - The desktop to read favorites and background from
    ///
    /// # Returns
    ///
    /// A validated session whose `Default` is the new workset.
    pub fn new_session(&self, from_environment: bool, shell: &dyn DesktopShell) -> Session {
        let mut object = self.session_prototype.clone();
        let mut first = object
            .get("Worksets")
            .and_then(Value::as_array)
            .and_then(|worksets| worksets.first())
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(|| self.workset_prototype.clone());

        let name = if from_environment {
            let favorites = desktop::resolve_favorites(shell, &shell.favorite_app_ids());
            first.insert("FavApps".into(), fav_apps_value(&favorites));
            first.insert(
                "BackgroundImage".into(),
                Value::String(desktop::current_background(shell)),
            );
            PRIMARY_WORKSET_NAME
        } else {
            NEW_WORKSET_NAME
        };
        first.insert("WorksetName".into(), Value::String(name.to_string()));

        object.insert("SessionName".into(), Value::String(DEFAULT_SESSION_NAME.into()));
        object.insert("Default".into(), Value::String(name.to_string()));
        object.insert("Worksets".into(), Value::Array(vec![Value::Object(first)]));
        object.insert(
            "workspaceMaps".into(),
            json!({ "Workspace0": { "defaultWorkset": name, "currentWorkset": name } }),
        );

        let value = Value::Object(object);
        validator::validate_session(&value).unwrap_or_else(|| Session {
            session_name: DEFAULT_SESSION_NAME.to_string(),
            default: name.to_string(),
            options: Default::default(),
            worksets: vec![Workset::new(name)],
            workspace_maps: Default::default(),
        })
    }

    /// Creates a workset from the workset prototype.
    ///
    /// # Arguments
    ///
    /// * `name` - Already-cleaned workset name
    /// * `from_environment` - Seed the favorites with the desktop's favorites
    ///   followed by the applications running on the active workspace
    /// * `shell` - The desktop to read from
    ///
    /// # Returns
    ///
    /// A validated workset. The background is always taken from the desktop.
    pub fn new_workset(&self, name: &str, from_environment: bool, shell: &dyn DesktopShell) -> Workset {
        let mut object = self.workset_prototype.clone();

        let favorites = if from_environment {
            let mut app_ids = shell.favorite_app_ids();
            app_ids.extend(shell.workspace_app_ids(shell.active_workspace_index()));
            desktop::resolve_favorites(shell, &app_ids)
        } else {
            Vec::new()
        };
        object.insert("WorksetName".into(), Value::String(name.to_string()));
        object.insert("FavApps".into(), fav_apps_value(&favorites));
        object.insert(
            "BackgroundImage".into(),
            Value::String(desktop::current_background(shell)),
        );

        validator::validate_workset(&Value::Object(object), 0)
            .unwrap_or_else(|| Workset::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use worksets_core::desktop::{ActiveWorkspaceQuery, AppInfo};
    use worksets_core::model::{BackgroundStyle, BoolOption, WorkspaceSlot};

    struct StaticShell {
        favorites: Vec<String>,
        running: Vec<String>,
        background: Mutex<String>,
    }

    impl StaticShell {
        fn new() -> Self {
            Self {
                favorites: vec!["firefox.desktop".into(), "code.desktop".into()],
                running: vec!["code.desktop".into(), "slack.desktop".into()],
                background: Mutex::new(String::new()),
            }
        }
    }

    impl ActiveWorkspaceQuery for StaticShell {
        fn active_workspace_index(&self) -> usize {
            0
        }

        fn workspace_app_ids(&self, _index: usize) -> Vec<String> {
            self.running.clone()
        }
    }

    impl DesktopShell for StaticShell {
        fn workspace_count(&self) -> usize {
            1
        }
        fn activate_workspace(&self, _index: usize) {}
        fn append_workspace(&self) -> usize {
            1
        }
        fn set_workspace_persistent(&self, _index: usize, _persistent: bool) {}
        fn favorite_app_ids(&self) -> Vec<String> {
            self.favorites.clone()
        }
        fn set_favorite_app_ids(&self, _app_ids: &[String]) {}
        fn app_info(&self, app_id: &str) -> Option<AppInfo> {
            (app_id == "firefox.desktop").then(|| AppInfo {
                id: app_id.into(),
                display_name: "Firefox".into(),
                icon: "firefox".into(),
                exec: "firefox %u".into(),
            })
        }
        fn background(&self) -> String {
            self.background.lock().unwrap().clone()
        }
        fn set_background(&self, _path: &str, _style: BackgroundStyle) {}
    }

    #[test]
    fn test_environment_session_seeds_primary() {
        let shell = StaticShell::new();
        let session = SessionFactory::default().new_session(true, &shell);

        assert_eq!(session.worksets.len(), 1);
        let primary = &session.worksets[0];
        assert_eq!(primary.workset_name, PRIMARY_WORKSET_NAME);
        assert_eq!(primary.favorite_ids(), vec!["firefox.desktop", "code.desktop"]);
        assert_eq!(primary.fav_apps[0].display_name, "Firefox");
        assert_eq!(primary.fav_apps[0].exec, "firefox %u");
        assert_eq!(session.default, PRIMARY_WORKSET_NAME);

        let slot0 = session.workspace_maps.get(WorkspaceSlot::new(0).unwrap());
        assert_eq!(slot0.default_workset, PRIMARY_WORKSET_NAME);
        assert_eq!(slot0.current_workset, PRIMARY_WORKSET_NAME);
        assert_eq!(session.options.flag(BoolOption::ShowHelpers), Some(true));
    }

    #[test]
    fn test_blank_session_has_empty_new_workset() {
        let session = SessionFactory::default().new_session(false, &StaticShell::new());
        assert_eq!(session.workset_names(), vec![NEW_WORKSET_NAME]);
        assert!(session.worksets[0].fav_apps.is_empty());
        assert_eq!(session.default, NEW_WORKSET_NAME);
    }

    #[test]
    fn test_environment_workset_merges_running_apps() {
        let workset = SessionFactory::default().new_workset("Dev", true, &StaticShell::new());
        assert_eq!(workset.workset_name, "Dev");
        assert_eq!(
            workset.favorite_ids(),
            vec!["firefox.desktop", "code.desktop", "slack.desktop"]
        );

        let blank = SessionFactory::default().new_workset("Blank", false, &StaticShell::new());
        assert!(blank.fav_apps.is_empty());
    }

    #[test]
    fn test_configured_prototypes_apply_and_bad_ones_fall_back() {
        let factory = SessionFactory::new(&PrototypeConfig {
            session: Some("not json".into()),
            workset: Some(r#"{"BackgroundStyle":"spanned"}"#.into()),
        });
        let workset = factory.new_workset("Wide", false, &StaticShell::new());
        assert_eq!(workset.background_style, BackgroundStyle::Spanned);
        assert_eq!(workset.background_style_dark, BackgroundStyle::Spanned);

        let session = factory.new_session(false, &StaticShell::new());
        assert_eq!(session.options.flag(BoolOption::ShowNotifications), Some(true));
    }
}
