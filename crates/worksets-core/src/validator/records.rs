//! Structural validation of the persisted records.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    MAX_APP_ID_LENGTH, MAX_CLI_SWITCH_LENGTH, MAX_DISPLAY_NAME_LENGTH, MAX_FAV_APPS_COUNT,
    MAX_ICON_LENGTH, MAX_NAME_LENGTH, MAX_SESSION_NAME_LENGTH, MAX_WORKSET_NAME_LENGTH,
    MAX_WORKSETS_COUNT, PATH_SEPARATORS, SHELL_METACHARS, field, report_unknown_keys, safe_array,
    safe_boolean, safe_enum, safe_string, truncate_chars, validate_exec_string,
    validate_image_path,
};
use crate::model::{
    BackgroundStyle, BoolOption, Collection, FavApp, Options, Session, Workset, WorkspaceMaps,
    WorkspaceSlot,
};

const FAV_APP_KEYS: &[&str] = &["name", "displayName", "icon", "exec"];
const WORKSET_KEYS: &[&str] = &[
    "WorksetName",
    "BackgroundImage",
    "BackgroundImageDark",
    "BackgroundStyle",
    "BackgroundStyleDark",
    "FavApps",
    "WindowData",
];
const SESSION_KEYS: &[&str] = &["SessionName", "Default", "Options", "Worksets", "workspaceMaps"];
const COLLECTION_KEYS: &[&str] = &["CollectionName", "Worksets"];

pub const PRIMARY_WORKSET_NAME: &str = "Primary";
pub const DEFAULT_SESSION_NAME: &str = "Default";

/// Cleans a workset name that arrived as a plain string.
///
/// Truncates, trims, and removes every shell metacharacter and path separator.
/// Returns `fallback` when nothing usable is left.
pub fn clean_workset_name(raw: &str, fallback: &str) -> String {
    let truncated = truncate_chars(raw, MAX_WORKSET_NAME_LENGTH);
    let trimmed = truncated.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !SHELL_METACHARS.contains(c) && !PATH_SEPARATORS.contains(c))
        .collect();
    if cleaned.len() != trimmed.len() {
        warn!(
            "[Validator] workset name {:?} contained unsafe characters; using {:?}",
            trimmed, cleaned
        );
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// [`clean_workset_name`] for a JSON value; non-strings yield `fallback`.
pub fn validate_workset_name(value: &Value, fallback: &str) -> String {
    let raw = safe_string(value, "WorksetName", MAX_WORKSET_NAME_LENGTH, "");
    clean_workset_name(&raw, fallback)
}

/// Validates one favorite application entry.
///
/// Returns `None` for non-objects and for entries with neither a name nor a
/// display name. An unsafe `exec` is replaced by an empty string.
pub fn validate_fav_app(value: &Value, index: usize) -> Option<FavApp> {
    let Some(object) = value.as_object() else {
        debug!("[Validator] FavApps[{}] is not an object; dropped", index);
        return None;
    };
    let context = format!("FavApps[{index}]");
    report_unknown_keys(object, FAV_APP_KEYS, &context);

    let name = safe_string(field(object, "name"), "FavApp.name", MAX_APP_ID_LENGTH, "");
    let display_name = safe_string(
        field(object, "displayName"),
        "FavApp.displayName",
        MAX_DISPLAY_NAME_LENGTH,
        "",
    );
    if name.is_empty() && display_name.is_empty() {
        debug!("[Validator] {} has neither name nor displayName; dropped", context);
        return None;
    }

    Some(FavApp {
        name,
        display_name,
        icon: safe_string(field(object, "icon"), "FavApp.icon", MAX_ICON_LENGTH, ""),
        exec: validate_exec_string(field(object, "exec"), "FavApp.exec"),
    })
}

/// Validates a favorites array: caps it, skips placeholders, drops invalid
/// entries and keeps only the first entry for each application id.
pub fn validate_fav_apps(value: &Value, field_name: &str) -> Vec<FavApp> {
    let mut apps: Vec<FavApp> = Vec::new();
    for (index, item) in safe_array(value, field_name, MAX_FAV_APPS_COUNT)
        .iter()
        .enumerate()
    {
        if item.as_str().is_some_and(str::is_empty) {
            continue;
        }
        let Some(app) = validate_fav_app(item, index) else {
            continue;
        };
        if !app.name.is_empty() && apps.iter().any(|existing| existing.name == app.name) {
            debug!(
                "[Validator] {} duplicate entry '{}' dropped",
                field_name, app.name
            );
            continue;
        }
        apps.push(app);
    }
    apps
}

fn validate_style(value: &Value, field_name: &str, fallback: BackgroundStyle) -> BackgroundStyle {
    let name = safe_enum(value, field_name, &BackgroundStyle::NAMES, fallback.as_str());
    BackgroundStyle::from_canonical(&name).unwrap_or(fallback)
}

/// Validates a workset record. `index` provides the `Workset <index>` fallback name.
pub fn validate_workset(value: &Value, index: usize) -> Option<Workset> {
    let Some(object) = value.as_object() else {
        debug!("[Validator] Worksets[{}] is not an object; dropped", index);
        return None;
    };
    report_unknown_keys(object, WORKSET_KEYS, &format!("Worksets[{index}]"));

    let workset_name =
        validate_workset_name(field(object, "WorksetName"), &format!("Workset {index}"));
    let background_style = validate_style(
        field(object, "BackgroundStyle"),
        "BackgroundStyle",
        BackgroundStyle::default(),
    );
    let background_style_dark = validate_style(
        field(object, "BackgroundStyleDark"),
        "BackgroundStyleDark",
        background_style,
    );

    Some(Workset {
        background_image: validate_image_path(field(object, "BackgroundImage"), "BackgroundImage"),
        background_image_dark: validate_image_path(
            field(object, "BackgroundImageDark"),
            "BackgroundImageDark",
        ),
        background_style,
        background_style_dark,
        fav_apps: validate_fav_apps(field(object, "FavApps"), "FavApps"),
        workset_name,
        active: false,
        active_workspace_index: None,
    })
}

/// Validates a worksets array, keeping the first workset for each name.
fn validate_worksets(value: &Value) -> Vec<Workset> {
    let mut worksets: Vec<Workset> = Vec::new();
    for (index, item) in safe_array(value, "Worksets", MAX_WORKSETS_COUNT)
        .iter()
        .enumerate()
    {
        let Some(workset) = validate_workset(item, index) else {
            continue;
        };
        if worksets
            .iter()
            .any(|existing| existing.workset_name == workset.workset_name)
        {
            warn!(
                "[Validator] duplicate workset '{}' dropped",
                workset.workset_name
            );
            continue;
        }
        worksets.push(workset);
    }
    worksets
}

/// Validates the options object. Unknown keys are ignored; absent keys stay absent.
pub fn validate_options(value: &Value) -> Options {
    let mut options = Options::default();
    let Some(object) = value.as_object() else {
        if !value.is_null() {
            debug!("[Validator] Options is not an object; using defaults");
        }
        return options;
    };

    for (key, raw) in object {
        if key == "CliSwitch" {
            if !raw.is_null() {
                options.cli_switch =
                    Some(safe_string(raw, "CliSwitch", MAX_CLI_SWITCH_LENGTH, ""));
            }
            continue;
        }
        match BoolOption::from_key(key) {
            Some(option) if !raw.is_null() => {
                options.set_flag(option, safe_boolean(raw, key, false));
            }
            Some(_) => {}
            None => debug!("[Validator] Options ignoring unknown key '{}'", key),
        }
    }
    options
}

/// Validates the ten workspace slot entries. Unknown keys are ignored.
pub fn validate_workspace_maps(value: &Value) -> WorkspaceMaps {
    let mut maps = WorkspaceMaps::default();
    let Some(object) = value.as_object() else {
        if !value.is_null() {
            debug!("[Validator] workspaceMaps is not an object; using empty maps");
        }
        return maps;
    };

    for (key, raw) in object {
        let Some(slot) = WorkspaceSlot::from_key(key) else {
            debug!("[Validator] workspaceMaps ignoring unknown key '{}'", key);
            continue;
        };
        let Some(entry) = raw.as_object() else {
            debug!("[Validator] {} is not an object; left empty", key);
            continue;
        };
        let target = maps.get_mut(slot);
        target.default_workset =
            safe_string(field(entry, "defaultWorkset"), "defaultWorkset", MAX_NAME_LENGTH, "");
        target.current_workset =
            safe_string(field(entry, "currentWorkset"), "currentWorkset", MAX_NAME_LENGTH, "");
    }
    maps
}

fn clean_session_name(value: &Value) -> String {
    let raw = safe_string(value, "SessionName", MAX_SESSION_NAME_LENGTH, DEFAULT_SESSION_NAME);
    let cleaned: String = raw.chars().filter(|c| !SHELL_METACHARS.contains(c)).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_SESSION_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Validates and repairs a whole session.
///
/// Beyond field-level checks this enforces the cross-record invariants:
/// workset names are unique (first wins), at least one workset exists (a
/// `Primary` workset is injected otherwise), `Default` names an existing
/// workset, map entries only name existing worksets, and no workset is
/// current on two slots (lowest slot wins).
///
/// Returns `None` when `value` is not a JSON object.
pub fn validate_session(value: &Value) -> Option<Session> {
    let Some(object) = value.as_object() else {
        warn!("[Validator] session is not a JSON object");
        return None;
    };
    report_unknown_keys(object, SESSION_KEYS, "Session");

    let mut worksets = validate_worksets(field(object, "Worksets"));
    if worksets.is_empty() {
        warn!(
            "[Validator] session has no valid worksets; adding '{}'",
            PRIMARY_WORKSET_NAME
        );
        worksets.push(Workset::new(PRIMARY_WORKSET_NAME));
    }
    let known = |name: &str| worksets.iter().any(|ws| ws.workset_name == name);

    let mut default = safe_string(field(object, "Default"), "Default", MAX_NAME_LENGTH, "");
    if !known(&default) {
        if !default.is_empty() {
            warn!(
                "[Validator] Default '{}' does not name a workset; using '{}'",
                default, worksets[0].workset_name
            );
        }
        default = worksets[0].workset_name.clone();
    }

    let mut workspace_maps = validate_workspace_maps(field(object, "workspaceMaps"));
    for (slot, entry) in workspace_maps.iter_mut() {
        if !entry.default_workset.is_empty() && !known(&entry.default_workset) {
            debug!(
                "[Validator] {} default '{}' is unknown; cleared",
                slot, entry.default_workset
            );
            entry.default_workset.clear();
        }
        if !entry.current_workset.is_empty() && !known(&entry.current_workset) {
            debug!(
                "[Validator] {} current '{}' is unknown; cleared",
                slot, entry.current_workset
            );
            entry.current_workset.clear();
        }
    }
    for slot in workspace_maps.dedupe_current() {
        debug!("[Validator] {} cleared duplicate currentWorkset", slot);
    }

    Some(Session {
        session_name: clean_session_name(field(object, "SessionName")),
        default,
        options: validate_options(field(object, "Options")),
        worksets,
        workspace_maps,
    })
}

/// Validates a saved collection of worksets.
pub fn validate_collection(value: &Value) -> Option<Collection> {
    let Some(object) = value.as_object() else {
        warn!("[Validator] collection is not a JSON object");
        return None;
    };
    report_unknown_keys(object, COLLECTION_KEYS, "Collection");

    Some(Collection {
        collection_name: validate_workset_name(field(object, "CollectionName"), "Collection"),
        worksets: validate_worksets(field(object, "Worksets")),
    })
}
