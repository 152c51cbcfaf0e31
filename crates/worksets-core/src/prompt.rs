use async_trait::async_trait;
use std::path::PathBuf;

use crate::model::WorkspaceSlot;

/// Editable properties of a workset shown in the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksetEdit {
    pub name: String,
    pub default_slots: Vec<WorkspaceSlot>,
}

/// Kind of object that can be listed and loaded from the object manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Workset,
    Collection,
}

/// Where an object-manager entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectSource {
    /// A workset already in the live session.
    Session,
    /// A saved file under the worksets or collections directory.
    File(PathBuf),
}

/// One selectable entry in the object manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCandidate {
    pub kind: ObjectKind,
    pub name: String,
    pub source: ObjectSource,
}

/// User-facing dialogs.
///
/// Every method resolves to `None` when the user cancels; cancelling never
/// mutates the session.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// Asks for the name of a new workset, pre-filled with `suggestion`.
    async fn propose_new_workset_name(&self, suggestion: &str) -> Option<String>;

    async fn edit_workset(&self, current: WorksetEdit) -> Option<WorksetEdit>;

    async fn choose_object(&self, candidates: Vec<ObjectCandidate>) -> Option<ObjectCandidate>;

    /// Shows a transient notification.
    fn show_feedback(&self, message: &str);
}
