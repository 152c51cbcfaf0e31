use anyhow::{Context, Result};
use tracing::debug;
use worksets_core::prompt::ObjectKind;
use worksets_core::repository::{SessionRepository, StoredObject};
use worksets_infrastructure::{JsonSessionRepository, WorksetsPaths};

use super::utils::load_stored_session;

pub async fn list(paths: &WorksetsPaths) -> Result<()> {
    let repository = JsonSessionRepository::new(paths);
    let objects = repository
        .list_stored_objects()
        .await
        .context("Failed to list saved objects")?;
    if objects.is_empty() {
        println!("No saved worksets or collections.");
        return Ok(());
    }
    for object in &objects {
        println!("{}", describe(object));
    }
    Ok(())
}

fn describe(object: &StoredObject) -> String {
    let kind = match object.kind {
        ObjectKind::Workset => "workset",
        ObjectKind::Collection => "collection",
    };
    format!("{kind:<10} {:<24} {}", object.name, object.path.display())
}

/// Writes one workset of the stored session to the worksets directory.
pub async fn export(paths: &WorksetsPaths, name: &str) -> Result<()> {
    let repository = JsonSessionRepository::new(paths);
    let session = load_stored_session(&repository, paths).await?;
    let workset = session
        .workset(name)
        .with_context(|| format!("No workset named '{name}' in the stored session"))?;

    let filename = repository
        .save_workset(workset, false)
        .await
        .with_context(|| format!("Failed to export '{name}'"))?;
    debug!("[Export] wrote {}", filename);
    println!("{}", paths.worksets_dir().join(filename).display());
    Ok(())
}
