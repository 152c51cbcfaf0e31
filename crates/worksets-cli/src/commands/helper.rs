use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use worksets_core::config::WorksetsConfig;
use worksets_core::validator::{self, ChmodDecision, IntegrityCheck};

/// Reports what the session manager would decide about the helper.
///
/// Nothing on disk is changed.
pub fn verify(
    config: &WorksetsConfig,
    path: Option<PathBuf>,
    expected: Option<String>,
) -> Result<()> {
    let path = path
        .or_else(|| config.app_chooser.path.clone())
        .context("No helper path given and none configured in [app_chooser]")?;
    let expected = expected.or_else(|| config.app_chooser.expected_sha256.clone());
    print!("{}", report(&path, expected.as_deref()));
    Ok(())
}

fn report(path: &Path, expected: Option<&str>) -> String {
    let mut lines = vec![format!("helper:   {}", path.display())];
    lines.push(match validator::verify_app_chooser_integrity(path, expected) {
        IntegrityCheck::Verified { sha256 } if expected.is_some() => {
            format!("sha256:   {sha256} (matches)")
        }
        IntegrityCheck::Verified { sha256 } => format!("sha256:   {sha256} (nothing pinned)"),
        IntegrityCheck::Mismatch { expected, actual } => {
            format!("sha256:   {actual} (MISMATCH, expected {expected})")
        }
        IntegrityCheck::Unreadable => "sha256:   unreadable".to_string(),
    });
    lines.push(
        match validator::ensure_app_chooser_executable(path, expected) {
            ChmodDecision::AlreadyExecutable => "decision: already executable",
            ChmodDecision::NeedsChmod => "decision: would be made executable",
            ChmodDecision::Refused(_) => "decision: refused",
        }
        .to_string(),
    );
    lines.join("\n") + "\n"
}
