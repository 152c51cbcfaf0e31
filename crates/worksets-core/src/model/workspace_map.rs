use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Number of workspace slots tracked by a session (`Workspace0`..`Workspace9`).
pub const SLOT_COUNT: usize = 10;

/// Index of a tracked workspace slot, always below [`SLOT_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkspaceSlot(usize);

impl WorkspaceSlot {
    /// Returns the slot for a desktop workspace index, if it is tracked.
    pub fn new(index: usize) -> Option<Self> {
        (index < SLOT_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// The JSON key for this slot, e.g. `Workspace3`.
    pub fn key(self) -> String {
        format!("Workspace{}", self.0)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        key.strip_prefix("Workspace")
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = WorkspaceSlot> {
        (0..SLOT_COUNT).map(WorkspaceSlot)
    }
}

impl fmt::Display for WorkspaceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workspace{}", self.0)
    }
}

/// Per-slot assignment: the workset a slot opens with, and the one it shows now.
///
/// An empty string means "none".
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMapEntry {
    pub default_workset: String,
    pub current_workset: String,
}

/// The ten workspace slots of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceMaps {
    entries: [WorkspaceMapEntry; SLOT_COUNT],
}

impl WorkspaceMaps {
    pub fn get(&self, slot: WorkspaceSlot) -> &WorkspaceMapEntry {
        &self.entries[slot.0]
    }

    pub fn get_mut(&mut self, slot: WorkspaceSlot) -> &mut WorkspaceMapEntry {
        &mut self.entries[slot.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkspaceSlot, &WorkspaceMapEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (WorkspaceSlot(index), entry))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WorkspaceSlot, &mut WorkspaceMapEntry)> {
        self.entries
            .iter_mut()
            .enumerate()
            .map(|(index, entry)| (WorkspaceSlot(index), entry))
    }

    /// Lowest slot currently showing `name`.
    pub fn slot_showing(&self, name: &str) -> Option<WorkspaceSlot> {
        self.iter()
            .find(|(_, entry)| !name.is_empty() && entry.current_workset == name)
            .map(|(slot, _)| slot)
    }

    /// Slots that open with `name` by default.
    pub fn default_slots_of(&self, name: &str) -> Vec<WorkspaceSlot> {
        self.iter()
            .filter(|(_, entry)| !name.is_empty() && entry.default_workset == name)
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Clears every `currentWorkset` assignment.
    pub fn clear_current(&mut self) {
        for entry in &mut self.entries {
            entry.current_workset.clear();
        }
    }

    /// Keeps only the lowest slot showing each workset and returns the slots that were cleared.
    pub fn dedupe_current(&mut self) -> Vec<WorkspaceSlot> {
        let mut seen: Vec<String> = Vec::new();
        let mut cleared = Vec::new();
        for (slot, entry) in self.iter_mut() {
            if entry.current_workset.is_empty() {
                continue;
            }
            if seen.contains(&entry.current_workset) {
                entry.current_workset.clear();
                cleared.push(slot);
            } else {
                seen.push(entry.current_workset.clone());
            }
        }
        cleared
    }

    /// Number of distinct worksets currently shown.
    pub fn distinct_current_count(&self) -> usize {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.current_workset.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Highest slot that shows any workset.
    pub fn highest_assigned_slot(&self) -> Option<WorkspaceSlot> {
        self.iter()
            .filter(|(_, entry)| !entry.current_workset.is_empty())
            .map(|(slot, _)| slot)
            .last()
    }

    /// Rewrites every reference to `old` so that it names `new`.
    pub fn rename(&mut self, old: &str, new: &str) {
        for entry in &mut self.entries {
            if entry.default_workset == old {
                entry.default_workset = new.to_string();
            }
            if entry.current_workset == old {
                entry.current_workset = new.to_string();
            }
        }
    }

    /// Drops every reference to `name`, both default and current.
    pub fn forget(&mut self, name: &str) {
        for entry in &mut self.entries {
            if entry.default_workset == name {
                entry.default_workset.clear();
            }
            if entry.current_workset == name {
                entry.current_workset.clear();
            }
        }
    }
}

impl Serialize for WorkspaceMaps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SLOT_COUNT))?;
        for (slot, entry) in self.iter() {
            map.serialize_entry(&slot.key(), entry)?;
        }
        map.end()
    }
}
