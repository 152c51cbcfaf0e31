//! JSON-file SessionRepository implementation.

use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};
use worksets_core::model::{Collection, Session, Workset};
use worksets_core::prompt::ObjectKind;
use worksets_core::repository::{SessionRepository, StoredObject};
use worksets_core::validator;
use worksets_core::{Result, WorksetsError};

use crate::paths::{SESSION_FILE_NAME, WorksetsPaths};
use crate::storage::naming::{self, COLLECTION_PREFIX, JSON_EXTENSION, WORKSET_PREFIX};
use crate::storage::{EnumerateOptions, JsonStore};

/// Stores the session as `session.json` and saved objects as individual
/// JSON files.
///
/// ```text
/// config_dir/
/// ├── session.json
/// ├── session-backup-<stamp>.json
/// ├── worksets/workset-<name>[-<stamp>].json
/// └── collections/collection-<name>.json
/// ```
///
/// Every file is written atomically. Backups never overwrite each other: a
/// name already taken gets a numeric suffix.
pub struct JsonSessionRepository {
    root: JsonStore,
    worksets: JsonStore,
    collections: JsonStore,
}

impl JsonSessionRepository {
    pub fn new(paths: &WorksetsPaths) -> Self {
        Self {
            root: JsonStore::new(paths.config_dir()),
            worksets: JsonStore::new(paths.worksets_dir()),
            collections: JsonStore::new(paths.collections_dir()),
        }
    }

    fn stamp() -> String {
        naming::timestamp(&Local::now())
    }

    fn load_validated(&self, filename: &str) -> Result<Session> {
        let value = self.root.load(filename)?;
        validator::validate_session(&value).ok_or_else(|| {
            WorksetsError::serialization("JSON", format!("{filename} is not a JSON object"))
        })
    }

    /// Session backups, oldest first by the stamp in their file name.
    fn session_backups(&self) -> Result<Vec<String>> {
        let mut backups: Vec<((String, u32), String)> = self
            .root
            .enumerate_children(&EnumerateOptions::default())?
            .into_iter()
            .filter_map(|entry| {
                naming::session_backup_order(&entry.file_name).map(|key| (key, entry.file_name))
            })
            .collect();
        backups.sort();
        Ok(backups.into_iter().map(|(_, name)| name).collect())
    }

    fn store_for(&self, kind: ObjectKind) -> &JsonStore {
        match kind {
            ObjectKind::Workset => &self.worksets,
            ObjectKind::Collection => &self.collections,
        }
    }

    fn list_kind(&self, kind: ObjectKind, prefix: &str) -> Result<Vec<StoredObject>> {
        let objects = self
            .store_for(kind)
            .enumerate_children(&EnumerateOptions::default())?
            .into_iter()
            .filter_map(|entry| {
                naming::object_name(&entry.file_name, prefix).map(|name| StoredObject {
                    kind,
                    name,
                    path: entry.path,
                })
            })
            .collect();
        Ok(objects)
    }
}

fn is_inside(path: &Path, directory: &Path) -> bool {
    path.parent() == Some(directory)
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn load_session(&self) -> Result<Option<Session>> {
        if !self.root.exists(SESSION_FILE_NAME) {
            return Ok(None);
        }
        self.load_validated(SESSION_FILE_NAME).map(Some)
    }

    async fn load_latest_backup(&self) -> Result<Option<Session>> {
        for filename in self.session_backups()?.iter().rev() {
            match self.load_validated(filename) {
                Ok(session) => {
                    info!("[JsonSessionRepository] restored from {}", filename);
                    return Ok(Some(session));
                }
                Err(e) => warn!("[JsonSessionRepository] skipping backup {}: {}", filename, e),
            }
        }
        Ok(None)
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        self.root.save(session, SESSION_FILE_NAME, false)?;
        Ok(())
    }

    async fn backup_session(&self, session: &Session) -> Result<String> {
        let filename = self
            .root
            .available_name(&naming::session_backup_stem(&Self::stamp()));
        self.root.save(session, &filename, false)?;
        info!("[JsonSessionRepository] session backed up to {}", filename);
        Ok(filename)
    }

    async fn backup_session_file(&self) -> Result<Option<String>> {
        if !self.root.exists(SESSION_FILE_NAME) {
            return Ok(None);
        }
        let filename = self
            .root
            .available_name(&naming::session_backup_stem(&Self::stamp()));
        self.root.copy(SESSION_FILE_NAME, &filename)?;
        info!("[JsonSessionRepository] session file copied to {}", filename);
        Ok(Some(filename))
    }

    async fn save_workset(&self, workset: &Workset, backup: bool) -> Result<String> {
        let filename = if backup {
            let stamp = Self::stamp();
            self.worksets
                .available_name(&naming::workset_stem(&workset.workset_name, Some(&stamp)))
        } else {
            format!(
                "{}{JSON_EXTENSION}",
                naming::workset_stem(&workset.workset_name, None)
            )
        };
        self.worksets.save(workset, &filename, false)?;
        Ok(filename)
    }

    async fn save_collection(&self, collection: &Collection) -> Result<String> {
        let filename = naming::collection_file_name(&collection.collection_name);
        self.collections.save(collection, &filename, false)?;
        Ok(filename)
    }

    async fn list_stored_objects(&self) -> Result<Vec<StoredObject>> {
        let mut objects = self.list_kind(ObjectKind::Workset, WORKSET_PREFIX)?;
        objects.extend(self.list_kind(ObjectKind::Collection, COLLECTION_PREFIX)?);
        Ok(objects)
    }

    async fn read_stored_object(&self, object: &StoredObject) -> Result<Value> {
        let store = self.store_for(object.kind);
        if !is_inside(&object.path, store.directory()) {
            return Err(WorksetsError::contract(format!(
                "{} is outside {}",
                object.path.display(),
                store.directory().display()
            )));
        }
        Ok(JsonStore::load_path(&object.path)?)
    }
}
