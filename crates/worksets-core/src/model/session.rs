use serde::Serialize;
use serde_json::Value;

use super::{Options, Workset, WorkspaceMaps, WorkspaceSlot};
use crate::error::{Result, WorksetsError};
use crate::validator;

/// The whole persisted state: named worksets, per-slot assignments and options.
///
/// Invariants kept by every mutator here and repaired by the validator on load:
/// at least one workset; unique workset names; `default` names an existing
/// workset; every non-empty map entry names an existing workset; no workset is
/// `currentWorkset` of two slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    #[serde(rename = "SessionName")]
    pub session_name: String,
    #[serde(rename = "Default")]
    pub default: String,
    #[serde(rename = "Options")]
    pub options: Options,
    #[serde(rename = "Worksets")]
    pub worksets: Vec<Workset>,
    #[serde(rename = "workspaceMaps")]
    pub workspace_maps: WorkspaceMaps,
}

impl Session {
    /// Builds a session from untrusted JSON, repairing whatever can be repaired.
    ///
    /// Returns `None` only when `value` is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        validator::validate_session(value)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(WorksetsError::from)
    }

    pub fn workset(&self, name: &str) -> Option<&Workset> {
        self.worksets.iter().find(|ws| ws.workset_name == name)
    }

    pub fn workset_mut(&mut self, name: &str) -> Option<&mut Workset> {
        self.worksets.iter_mut().find(|ws| ws.workset_name == name)
    }

    pub fn workset_index(&self, name: &str) -> Option<usize> {
        self.worksets.iter().position(|ws| ws.workset_name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.workset_index(name).is_some()
    }

    pub fn workset_names(&self) -> Vec<String> {
        self.worksets.iter().map(|ws| ws.workset_name.clone()).collect()
    }

    /// Renames a workset and every reference to it.
    ///
    /// `new_name` is cleaned like any other workset name first. Returns the
    /// name actually stored.
    ///
    /// # Errors
    ///
    /// - `NotFound` when `old_name` is not in the session
    /// - `Conflict` when the cleaned name is empty or already taken
    pub fn rename_workset(&mut self, old_name: &str, new_name: &str) -> Result<String> {
        let index = self
            .workset_index(old_name)
            .ok_or_else(|| WorksetsError::not_found("workset", old_name))?;
        let new_name = validator::clean_workset_name(new_name, "");
        if new_name.is_empty() {
            return Err(WorksetsError::conflict("workset name is empty after cleaning"));
        }
        if new_name == old_name {
            return Ok(new_name);
        }
        if self.contains(&new_name) {
            return Err(WorksetsError::conflict(format!(
                "a workset named '{new_name}' already exists"
            )));
        }

        self.worksets[index].workset_name = new_name.clone();
        self.workspace_maps.rename(old_name, &new_name);
        if self.default == old_name {
            self.default = new_name.clone();
        }
        Ok(new_name)
    }

    /// Makes `name` the default of exactly the given slots.
    ///
    /// Slots not listed stop defaulting to `name`; other worksets' defaults on
    /// unlisted slots are left alone.
    pub fn set_default_slots(&mut self, name: &str, slots: &[WorkspaceSlot]) -> Result<()> {
        if !self.contains(name) {
            return Err(WorksetsError::not_found("workset", name));
        }
        for (slot, entry) in self.workspace_maps.iter_mut() {
            if slots.contains(&slot) {
                entry.default_workset = name.to_string();
            } else if entry.default_workset == name {
                entry.default_workset.clear();
            }
        }
        Ok(())
    }

    /// Removes a workset and every reference to it.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the workset does not exist
    /// - `Conflict` when it is the only workset left
    pub fn remove_workset(&mut self, name: &str) -> Result<Workset> {
        let index = self
            .workset_index(name)
            .ok_or_else(|| WorksetsError::not_found("workset", name))?;
        if self.worksets.len() == 1 {
            return Err(WorksetsError::conflict("cannot delete the last workset"));
        }

        let removed = self.worksets.remove(index);
        self.workspace_maps.forget(name);
        if self.default == name {
            self.default = self.worksets[0].workset_name.clone();
        }
        Ok(removed)
    }

    /// Adds a workset, refusing duplicate names.
    pub fn insert_workset(&mut self, workset: Workset) -> Result<()> {
        if self.contains(&workset.workset_name) {
            return Err(WorksetsError::conflict(format!(
                "a workset named '{}' already exists",
                workset.workset_name
            )));
        }
        if self.worksets.len() >= validator::MAX_WORKSETS_COUNT {
            return Err(WorksetsError::conflict("the session is full"));
        }
        self.worksets.push(workset);
        Ok(())
    }

    /// Forgets every runtime assignment: no slot shows anything, nothing is active.
    pub fn clear_runtime_state(&mut self) {
        self.workspace_maps.clear_current();
        for workset in &mut self.worksets {
            workset.clear_runtime_state();
        }
    }
}
