//! File names for backups and saved objects.

use chrono::{DateTime, TimeZone};

pub const SESSION_BACKUP_PREFIX: &str = "session-backup-";
pub const WORKSET_PREFIX: &str = "workset-";
pub const COLLECTION_PREFIX: &str = "collection-";
pub const JSON_EXTENSION: &str = ".json";

/// Length of a [`timestamp`].
const STAMP_LEN: usize = "2026-10-19T14-03-59".len();

/// Keeps only `[A-Za-z0-9.-]`.
pub fn sanitize_stamp(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '.')
        .collect()
}

/// A sortable, filename-safe timestamp such as `2026-10-19T14-03-59`.
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    sanitize_stamp(&at.format("%Y-%m-%dT%H-%M-%S").to_string())
}

/// Object names are already free of path separators; this also drops spaces.
fn file_safe(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `session-backup-<stamp>` (without extension).
pub fn session_backup_stem(stamp: &str) -> String {
    format!("{SESSION_BACKUP_PREFIX}{stamp}")
}

/// Ordering key of `session-backup-<stamp>[-<n>].json`: the stamp, then the
/// collision suffix. `None` for other file names.
pub fn session_backup_order(file_name: &str) -> Option<(String, u32)> {
    let rest = file_name
        .strip_prefix(SESSION_BACKUP_PREFIX)?
        .strip_suffix(JSON_EXTENSION)?;
    if rest.is_empty() {
        return None;
    }
    let suffix = rest
        .get(STAMP_LEN..)
        .and_then(|tail| tail.strip_prefix('-'))
        .and_then(|n| n.parse::<u32>().ok());
    match (rest.get(..STAMP_LEN), suffix) {
        (Some(stamp), Some(n)) => Some((stamp.to_string(), n)),
        _ => Some((rest.to_string(), 0)),
    }
}

/// `workset-<name>[-<stamp>]` (without extension).
pub fn workset_stem(name: &str, stamp: Option<&str>) -> String {
    match stamp {
        Some(stamp) => format!("{WORKSET_PREFIX}{}-{stamp}", file_safe(name)),
        None => format!("{WORKSET_PREFIX}{}", file_safe(name)),
    }
}

/// `collection-<name>.json`
pub fn collection_file_name(name: &str) -> String {
    format!("{COLLECTION_PREFIX}{}{JSON_EXTENSION}", file_safe(name))
}

/// Recovers the object name from `<prefix><name>.json`.
pub fn object_name(file_name: &str, prefix: &str) -> Option<String> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(JSON_EXTENSION)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
