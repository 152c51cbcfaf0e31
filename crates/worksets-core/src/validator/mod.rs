//! Untrusted-input validation.
//!
//! Everything that enters the model from disk, from a helper process or from
//! the desktop passes through here. The functions never fail: they repair,
//! truncate, substitute a fallback or drop the offending piece, and log what
//! they did. The only "no result" outcome is a `None` for inputs that are not
//! objects at all.

mod exec;
mod integrity;
mod path;
mod records;

pub use exec::{has_shell_metachars, strip_field_codes, validate_exec_string};
pub use integrity::{
    ChmodDecision, IntegrityCheck, apply_chmod, compute_file_sha256,
    ensure_app_chooser_executable, verify_app_chooser_integrity,
};
pub use path::{PathChecks, validate_file_path, validate_image_path};
pub use records::{
    DEFAULT_SESSION_NAME, PRIMARY_WORKSET_NAME, clean_workset_name, validate_collection,
    validate_fav_app, validate_fav_apps, validate_options, validate_session, validate_workset,
    validate_workset_name, validate_workspace_maps,
};

use serde_json::Value;
use tracing::debug;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_WORKSET_NAME_LENGTH: usize = MAX_NAME_LENGTH;
pub const MAX_SESSION_NAME_LENGTH: usize = 100;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 200;
pub const MAX_EXEC_LENGTH: usize = 1024;
pub const MAX_CLI_SWITCH_LENGTH: usize = MAX_EXEC_LENGTH;
pub const MAX_ICON_LENGTH: usize = 512;
pub const MAX_APP_ID_LENGTH: usize = 512;
pub const MAX_PATH_LENGTH: usize = 4096;
pub const MAX_ENUM_LENGTH: usize = 100;
pub const MAX_FAV_APPS_COUNT: usize = 100;
pub const MAX_WORKSETS_COUNT: usize = 50;
pub const MAX_IMAGE_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Characters with meaning to a POSIX shell, plus NUL and line breaks.
pub const SHELL_METACHARS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '!', '<', '>', '\\', '#', '\0', '\r', '\n',
];

pub(crate) const PATH_SEPARATORS: &[char] = &['/', '\\', '\0'];

pub(crate) static NULL: Value = Value::Null;

/// Looks up `key` on an object, yielding `Null` when absent.
pub(crate) fn field<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> &'a Value {
    object.get(key).unwrap_or(&NULL)
}

/// Truncates to at most `max_len` characters.
pub fn truncate_chars(value: &str, max_len: usize) -> String {
    match value.char_indices().nth(max_len) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}

/// Returns the string content of `value`, truncated to `max_len` characters.
///
/// Non-strings yield `fallback`. `Null` is treated as absent and is not logged.
pub fn safe_string(value: &Value, field_name: &str, max_len: usize, fallback: &str) -> String {
    match value {
        Value::String(s) => {
            if s.chars().count() > max_len {
                debug!(
                    "[Validator] {} truncated to {} characters",
                    field_name, max_len
                );
            }
            truncate_chars(s, max_len)
        }
        Value::Null => fallback.to_string(),
        other => {
            debug!(
                "[Validator] {} expected a string, got {}; using fallback",
                field_name,
                type_name(other)
            );
            fallback.to_string()
        }
    }
}

/// Returns `value` if it is a boolean, otherwise `fallback`.
pub fn safe_boolean(value: &Value, field_name: &str, fallback: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => fallback,
        other => {
            debug!(
                "[Validator] {} expected a boolean, got {}; using fallback",
                field_name,
                type_name(other)
            );
            fallback
        }
    }
}

/// Returns the canonical member of `allowed` matching `value`.
///
/// Exact matches win; otherwise an upper-cased match is accepted. Anything
/// else yields `fallback`.
pub fn safe_enum(value: &Value, field_name: &str, allowed: &[&str], fallback: &str) -> String {
    let candidate = safe_string(value, field_name, MAX_ENUM_LENGTH, fallback);
    if allowed.contains(&candidate.as_str()) {
        return candidate;
    }
    let upper = candidate.to_uppercase();
    if let Some(canonical) = allowed.iter().find(|allowed| **allowed == upper) {
        return (*canonical).to_string();
    }
    debug!(
        "[Validator] {} value '{}' is not one of {:?}; using '{}'",
        field_name, candidate, allowed, fallback
    );
    fallback.to_string()
}

/// Returns the elements of `value` if it is an array, keeping at most `max_len`.
pub fn safe_array<'a>(value: &'a Value, field_name: &str, max_len: usize) -> &'a [Value] {
    match value {
        Value::Array(items) => {
            if items.len() > max_len {
                debug!(
                    "[Validator] {} has {} entries; keeping the first {}",
                    field_name,
                    items.len(),
                    max_len
                );
                &items[..max_len]
            } else {
                items
            }
        }
        Value::Null => &[],
        other => {
            debug!(
                "[Validator] {} expected an array, got {}",
                field_name,
                type_name(other)
            );
            &[]
        }
    }
}

/// Logs and ignores keys that are not part of a record's schema.
pub(crate) fn report_unknown_keys(
    object: &serde_json::Map<String, Value>,
    allowed: &[&str],
    context: &str,
) {
    for key in object.keys() {
        if !allowed.contains(&key.as_str()) {
            debug!("[Validator] {} ignoring unknown key '{}'", context, key);
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
