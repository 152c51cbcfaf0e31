//! Session repository trait.
//!
//! Defines the interface for persisting the live session and the saved
//! workset/collection files.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Collection, Session, Workset};
use crate::prompt::ObjectKind;

/// A saved workset or collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectKind,
    /// Object name as recovered from the file name.
    pub name: String,
    pub path: PathBuf,
}

/// An abstract repository for session persistence.
///
/// Sessions come back already validated. Saved objects come back as raw JSON
/// because the caller decides which record they must validate as.
///
/// # Implementation Notes
///
/// Implementations should:
/// - write each file atomically
/// - never overwrite an existing backup
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the primary session file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session loaded and validated
    /// - `Ok(None)`: No session file yet
    /// - `Err(_)`: The file exists but cannot be read or is not a JSON object
    async fn load_session(&self) -> Result<Option<Session>>;

    /// Loads the most recent session backup, if any.
    async fn load_latest_backup(&self) -> Result<Option<Session>>;

    /// Overwrites the primary session file.
    async fn save_session(&self, session: &Session) -> Result<()>;

    /// Writes a timestamped backup of `session` and returns its file name.
    async fn backup_session(&self, session: &Session) -> Result<String>;

    /// Copies the primary session file byte-for-byte to a timestamped backup.
    ///
    /// Used before replacing a session file that failed to load.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(file_name))`: Backup written
    /// - `Ok(None)`: There was no session file to copy
    async fn backup_session_file(&self) -> Result<Option<String>>;

    /// Saves a workset to its own file and returns the file name.
    ///
    /// With `backup` the file name carries a timestamp so earlier saves are kept.
    async fn save_workset(&self, workset: &Workset, backup: bool) -> Result<String>;

    /// Saves a collection and returns the file name.
    async fn save_collection(&self, collection: &Collection) -> Result<String>;

    /// Lists saved workset and collection files.
    async fn list_stored_objects(&self) -> Result<Vec<StoredObject>>;

    /// Reads a saved object as unvalidated JSON.
    async fn read_stored_object(&self, object: &StoredObject) -> Result<Value>;
}
