use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use worksets_core::model::Session;
use worksets_core::repository::SessionRepository;
use worksets_core::validator;
use worksets_infrastructure::{JsonSessionRepository, WorksetsPaths};

use super::utils::load_stored_session;

/// Prints the session `file` would load as, after repair.
pub fn validate(file: &Path) -> Result<()> {
    println!("{}", sanitized_json(file)?);
    Ok(())
}

fn sanitized_json(file: &Path) -> Result<String> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;
    let session = validator::validate_session(&value)
        .with_context(|| format!("{} is not a JSON object", file.display()))?;
    Ok(serde_json::to_string_pretty(&session)?)
}

pub async fn show(paths: &WorksetsPaths) -> Result<()> {
    let repository = JsonSessionRepository::new(paths);
    let session = load_stored_session(&repository, paths).await?;
    print!("{}", summarize(&session));
    Ok(())
}

/// Copies `session.json` byte-for-byte, so even an unreadable file can be kept.
pub async fn backup(paths: &WorksetsPaths) -> Result<()> {
    let repository = JsonSessionRepository::new(paths);
    match repository
        .backup_session_file()
        .await
        .context("Failed to back up the session")?
    {
        Some(filename) => println!("{}", paths.config_dir().join(filename).display()),
        None => anyhow::bail!("No stored session in {}", paths.config_dir().display()),
    }
    Ok(())
}

fn summarize(session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Session: {}", session.session_name);
    let _ = writeln!(out, "Default workset: {}", session.default);
    let _ = writeln!(out, "Worksets:");
    for workset in &session.worksets {
        let _ = writeln!(
            out,
            "  {} ({} favorites, background {})",
            workset.workset_name,
            workset.fav_apps.len(),
            if workset.background_image.is_empty() {
                "unset"
            } else {
                workset.background_image.as_str()
            }
        );
    }
    let assigned: Vec<_> = session
        .workspace_maps
        .iter()
        .filter(|(_, entry)| !entry.default_workset.is_empty() || !entry.current_workset.is_empty())
        .collect();
    if !assigned.is_empty() {
        let _ = writeln!(out, "Workspaces:");
        for (slot, entry) in assigned {
            let _ = writeln!(
                out,
                "  {}: default '{}', last shown '{}'",
                slot, entry.default_workset, entry.current_workset
            );
        }
    }
    out
}
