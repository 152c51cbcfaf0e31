use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

use super::{MAX_IMAGE_FILE_SIZE, MAX_PATH_LENGTH};

/// Which file-system checks [`validate_file_path`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathChecks {
    pub allow_empty: bool,
    pub check_exists: bool,
    pub check_is_file: bool,
    pub check_not_symlink: bool,
    pub check_file_size: bool,
    pub max_file_size: u64,
}

impl Default for PathChecks {
    fn default() -> Self {
        Self {
            allow_empty: true,
            check_exists: false,
            check_is_file: false,
            check_not_symlink: true,
            check_file_size: false,
            max_file_size: MAX_IMAGE_FILE_SIZE,
        }
    }
}

impl PathChecks {
    /// Checks used for background images: must exist, be a regular file, not
    /// be a symlink and stay under the image size limit.
    pub fn image() -> Self {
        Self {
            check_exists: true,
            check_is_file: true,
            check_file_size: true,
            ..Self::default()
        }
    }

    fn touches_fs(&self) -> bool {
        self.check_exists || self.check_is_file || self.check_not_symlink || self.check_file_size
    }
}

/// Validates a local file path, returning it (without any `file://` prefix)
/// or an empty string when a check fails.
///
/// Only absolute paths without `..` components are accepted, whatever
/// `checks` says.
///
/// Symlink detection uses `symlink_metadata`, so a link is seen as a link even
/// when its target is a valid file.
pub fn validate_file_path(value: &Value, field_name: &str, checks: &PathChecks) -> String {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Null => "",
        _ => {
            warn!("[Validator] {} is not a string path", field_name);
            return String::new();
        }
    };
    let path = raw.strip_prefix("file://").unwrap_or(raw);

    if path.is_empty() {
        if !checks.allow_empty {
            warn!("[Validator] {} is empty", field_name);
        }
        return String::new();
    }
    if !path.starts_with('/') {
        warn!("[Validator] {} is not an absolute path: {}", field_name, path);
        return String::new();
    }
    if path.split('/').any(|component| component == "..") {
        warn!("[Validator] {} contains a '..' component: {}", field_name, path);
        return String::new();
    }
    if path.chars().count() > MAX_PATH_LENGTH {
        warn!("[Validator] {} exceeds {} characters", field_name, MAX_PATH_LENGTH);
        return String::new();
    }
    if path.contains('\0') {
        warn!("[Validator] {} contains a NUL byte", field_name);
        return String::new();
    }
    if !checks.touches_fs() {
        return path.to_string();
    }

    if checks.check_exists && !Path::new(path).exists() {
        warn!("[Validator] {} does not exist: {}", field_name, path);
        return String::new();
    }

    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("[Validator] {} cannot be inspected ({}): {}", field_name, e, path);
            return String::new();
        }
    };

    if checks.check_not_symlink && metadata.file_type().is_symlink() {
        warn!("[Validator] {} is a symbolic link: {}", field_name, path);
        return String::new();
    }
    if checks.check_is_file && !metadata.is_file() {
        warn!("[Validator] {} is not a regular file: {}", field_name, path);
        return String::new();
    }
    if checks.check_file_size && metadata.len() > checks.max_file_size {
        warn!(
            "[Validator] {} is {} bytes, over the {} byte limit: {}",
            field_name,
            metadata.len(),
            checks.max_file_size,
            path
        );
        return String::new();
    }

    path.to_string()
}

/// [`validate_file_path`] with [`PathChecks::image`].
pub fn validate_image_path(value: &Value, field_name: &str) -> String {
    validate_file_path(value, field_name, &PathChecks::image())
}
