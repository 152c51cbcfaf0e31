//! Hash and permission checks for the application-chooser helper.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, WorksetsError};

/// Outcome of checking the helper binary against its expected hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    /// The file was readable and matched (or no hash was pinned).
    Verified { sha256: String },
    /// The file was readable but its hash differs from the pinned one.
    Mismatch { expected: String, actual: String },
    /// The file could not be read.
    Unreadable,
}

impl IntegrityCheck {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// What to do about the helper's executable bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChmodDecision {
    AlreadyExecutable,
    /// The file verified and may be made executable with [`apply_chmod`].
    NeedsChmod,
    /// The file failed verification; it must not be made executable.
    Refused(IntegrityCheck),
}

/// Hex-encoded SHA-256 of a file's contents, or `None` if it cannot be read.
pub fn compute_file_sha256(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            Some(hex::encode(hasher.finalize()))
        }
        Err(e) => {
            warn!("[Integrity] cannot read {}: {}", path.display(), e);
            None
        }
    }
}

/// Checks the helper against an optional pinned SHA-256 (compared case-insensitively).
pub fn verify_app_chooser_integrity(path: &Path, expected_sha256: Option<&str>) -> IntegrityCheck {
    let Some(actual) = compute_file_sha256(path) else {
        return IntegrityCheck::Unreadable;
    };
    match expected_sha256.map(str::trim).filter(|expected| !expected.is_empty()) {
        Some(expected) if !expected.eq_ignore_ascii_case(&actual) => {
            warn!(
                "[Integrity] {} hash mismatch: expected {}, found {}",
                path.display(),
                expected,
                actual
            );
            IntegrityCheck::Mismatch {
                expected: expected.to_ascii_lowercase(),
                actual,
            }
        }
        _ => {
            debug!("[Integrity] {} verified ({})", path.display(), actual);
            IntegrityCheck::Verified { sha256: actual }
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

/// Decides whether the helper may be made executable.
///
/// An already executable file is reported as such without hashing. Otherwise
/// the file has to pass [`verify_app_chooser_integrity`] first.
pub fn ensure_app_chooser_executable(path: &Path, expected_sha256: Option<&str>) -> ChmodDecision {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_file() && is_executable(&metadata) {
            return ChmodDecision::AlreadyExecutable;
        }
    }
    match verify_app_chooser_integrity(path, expected_sha256) {
        IntegrityCheck::Verified { .. } => ChmodDecision::NeedsChmod,
        other => {
            warn!(
                "[Integrity] refusing to make {} executable: {:?}",
                path.display(),
                other
            );
            ChmodDecision::Refused(other)
        }
    }
}

/// Sets mode `0o755` on the helper when `decision` is [`ChmodDecision::NeedsChmod`].
///
/// Returns `Ok(false)` when there was nothing to do.
///
/// # Errors
///
/// - `Contract` when called with a `Refused` decision
/// - `Io` when the permissions cannot be changed
pub fn apply_chmod(path: &Path, decision: &ChmodDecision) -> Result<bool> {
    match decision {
        ChmodDecision::AlreadyExecutable => Ok(false),
        ChmodDecision::Refused(check) => Err(WorksetsError::contract(format!(
            "apply_chmod called for {} after a refused check: {:?}",
            path.display(),
            check
        ))),
        ChmodDecision::NeedsChmod => {
            set_mode_755(path)?;
            info!("[Integrity] made {} executable", path.display());
            Ok(true)
        }
    }
}

#[cfg(unix)]
fn set_mode_755(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode_755(_path: &Path) -> Result<()> {
    Ok(())
}
