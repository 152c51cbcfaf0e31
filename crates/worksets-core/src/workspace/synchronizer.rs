use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::desktop::DesktopShell;
use crate::model::{BoolOption, Session, Workset, WorkspaceMaps, WorkspaceSlot};

/// What [`WorkspaceSynchronizer::display_workset`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The workset was already shown; the desktop switched to its workspace.
    SwitchedTo(usize),
    /// The workset was loaded onto the given workspace.
    Loaded(usize),
}

impl Activation {
    pub fn workspace_index(&self) -> usize {
        match self {
            Activation::SwitchedTo(index) | Activation::Loaded(index) => *index,
        }
    }
}

/// Number of workspaces that must stay alive for the current assignments.
///
/// At least one, at least one per distinct shown workset, and enough to reach
/// the highest slot that shows anything.
pub fn required_workspaces(maps: &WorkspaceMaps) -> usize {
    let through_highest = maps
        .highest_assigned_slot()
        .map_or(0, |slot| slot.index() + 1);
    maps.distinct_current_count().max(through_highest).max(1)
}

/// The only writer of `currentWorkset` and of the workset activity flags.
///
/// Every method takes the session explicitly; the caller serializes access
/// (the session manager holds its lock for the whole call).
pub struct WorkspaceSynchronizer {
    shell: Arc<dyn DesktopShell>,
    last_pushed_favorites: Option<Vec<String>>,
}

impl WorkspaceSynchronizer {
    /// Takes over a freshly loaded session.
    ///
    /// Stale assignments from the previous run are dropped, then the default
    /// workset of the active workspace (if any) is loaded.
    pub fn attach(shell: Arc<dyn DesktopShell>, session: &mut Session) -> Self {
        let mut synchronizer = Self {
            shell,
            last_pushed_favorites: None,
        };
        session.clear_runtime_state();
        synchronizer.workspace_update(session, false);
        synchronizer.load_default_worksets(session);
        synchronizer.workspace_update(session, false);
        debug!("[WorkspaceSynchronizer] attached to session '{}'", session.session_name);
        synchronizer
    }

    pub fn shell(&self) -> &Arc<dyn DesktopShell> {
        &self.shell
    }

    /// The workset shown on workspace `index`.
    pub fn workset_on<'s>(&self, session: &'s Session, index: usize) -> Option<&'s Workset> {
        match WorkspaceSlot::new(index) {
            Some(slot) => {
                let name = &session.workspace_maps.get(slot).current_workset;
                if name.is_empty() {
                    None
                } else {
                    session.workset(name)
                }
            }
            None => session
                .worksets
                .iter()
                .find(|ws| ws.active && ws.active_workspace_index == Some(index)),
        }
    }

    /// The workset shown on the active workspace.
    pub fn active_workset<'s>(&self, session: &'s Session) -> Option<&'s Workset> {
        self.workset_on(session, self.shell.active_workspace_index())
    }

    /// Handles the desktop switching to another workspace.
    pub fn on_workspace_switched(&mut self, session: &mut Session) {
        self.workspace_update(session, false);
        let active = self.shell.active_workspace_index();
        let shown = self
            .workset_on(session, active)
            .map(|ws| ws.workset_name.clone());
        match shown {
            Some(name) => {
                debug!("[WorkspaceSynchronizer] workspace {} shows '{}'", active, name);
                self.apply_workset(session, &name);
            }
            None => {
                self.load_default_worksets(session);
            }
        }
        self.workspace_update(session, false);
    }

    /// Shows a workset.
    ///
    /// A workset that is already shown somewhere is switched to. Otherwise it
    /// is loaded onto the active workspace, or onto a newly appended one when
    /// `load_in_new_workspace` is set. Returns `None` for unknown names.
    pub fn display_workset(
        &mut self,
        session: &mut Session,
        name: &str,
        load_in_new_workspace: bool,
    ) -> Option<Activation> {
        let Some(position) = session.workset_index(name) else {
            debug!("[WorkspaceSynchronizer] display: no workset named '{}'", name);
            return None;
        };

        let target = &session.worksets[position];
        if let (true, Some(index)) = (target.active, target.active_workspace_index) {
            if self.shell.active_workspace_index() != index {
                self.shell.activate_workspace(index);
            }
            self.apply_workset(session, name);
            self.workspace_update(session, false);
            info!("[WorkspaceSynchronizer] switched to '{}' on workspace {}", name, index);
            return Some(Activation::SwitchedTo(index));
        }

        if load_in_new_workspace {
            self.workspace_update(session, false);
            let index = self.shell.append_workspace();
            self.shell.activate_workspace(index);
        }
        let index = self.shell.active_workspace_index();

        for workset in &mut session.worksets {
            if workset.active_workspace_index == Some(index) {
                workset.clear_runtime_state();
            }
        }
        match WorkspaceSlot::new(index) {
            Some(slot) => {
                session.workspace_maps.get_mut(slot).current_workset = name.to_string();
            }
            None => warn!(
                "[WorkspaceSynchronizer] workspace {} is beyond the tracked slots; '{}' will not be remembered",
                index, name
            ),
        }
        let target = &mut session.worksets[position];
        target.active = true;
        target.active_workspace_index = Some(index);

        self.apply_workset(session, name);
        self.workspace_update(session, false);
        info!("[WorkspaceSynchronizer] loaded '{}' on workspace {}", name, index);
        Some(Activation::Loaded(index))
    }

    /// Loads the default workset of the active workspace when nothing is shown there.
    ///
    /// A default that is already shown on another workspace is left where it is.
    pub fn load_default_worksets(&mut self, session: &mut Session) -> Option<String> {
        let slot = WorkspaceSlot::new(self.shell.active_workspace_index())?;
        let entry = session.workspace_maps.get(slot);
        if !entry.current_workset.is_empty() || entry.default_workset.is_empty() {
            return None;
        }
        let name = entry.default_workset.clone();
        if let Some(elsewhere) = session.workspace_maps.slot_showing(&name) {
            debug!(
                "[WorkspaceSynchronizer] default '{}' for {} is already shown on {}",
                name, slot, elsewhere
            );
            return None;
        }
        self.display_workset(session, &name, false)?;
        Some(name)
    }

    /// Stops showing a workset. Returns whether it was shown.
    pub fn close_workset(&mut self, session: &mut Session, name: &str) -> bool {
        let Some(workset) = session.workset_mut(name) else {
            return false;
        };
        let was_active = workset.active;
        workset.clear_runtime_state();
        for (_, entry) in session.workspace_maps.iter_mut() {
            if entry.current_workset == name {
                entry.current_workset.clear();
            }
        }
        self.workspace_update(session, false);
        if was_active {
            info!("[WorkspaceSynchronizer] closed '{}'", name);
        }
        was_active
    }

    /// Reconciles assignments and workspace persistence.
    ///
    /// Clears duplicate current assignments (lowest slot wins), refreshes the
    /// activity flags, appends workspaces until the required count exists and
    /// marks exactly the first `required` workspaces persistent. Workspaces are
    /// never removed. With `destroy` only the first workspace is kept persistent.
    pub fn workspace_update(&self, session: &mut Session, destroy: bool) {
        for slot in session.workspace_maps.dedupe_current() {
            debug!("[WorkspaceSynchronizer] cleared duplicate assignment on {}", slot);
        }
        refresh_activity(session);

        let required = if destroy {
            1
        } else {
            required_workspaces(&session.workspace_maps)
        };
        let mut count = self.shell.workspace_count();
        while count < required {
            self.shell.append_workspace();
            count += 1;
        }
        for index in 0..count {
            self.shell.set_workspace_persistent(index, false);
        }
        for index in 0..required {
            self.shell.set_workspace_persistent(index, true);
        }
    }

    /// Pushes a workset's favorites and background to the desktop.
    pub fn apply_workset(&mut self, session: &Session, name: &str) {
        let Some(workset) = session.workset(name) else {
            return;
        };
        let favorites = workset.favorite_ids();
        self.shell.set_favorite_app_ids(&favorites);
        self.last_pushed_favorites = Some(favorites);

        if session.options.is_enabled(BoolOption::DisableWallpaperManagement) {
            return;
        }
        let (image, style) = workset.background_for(self.shell.prefers_dark());
        if !image.is_empty() {
            self.shell.set_background(image, style);
        }
    }

    /// Re-applies a workset after its content changed, if it is on the active workspace.
    pub fn reapply_if_active(&mut self, session: &Session, name: &str) -> bool {
        let shown_here = self
            .active_workset(session)
            .is_some_and(|ws| ws.workset_name == name);
        if shown_here {
            self.apply_workset(session, name);
        }
        shown_here
    }

    /// Filters favorites-changed notifications caused by our own pushes.
    ///
    /// Returns `true` when `live` is a user change that should be recorded.
    pub fn accept_favorites_change(&mut self, live: &[String]) -> bool {
        if self.last_pushed_favorites.as_deref() == Some(live) {
            debug!("[WorkspaceSynchronizer] ignoring echo of our own favorites push");
            return false;
        }
        self.last_pushed_favorites = Some(live.to_vec());
        true
    }

    /// Returns the desktop to a single persistent workspace.
    pub fn teardown(&mut self, session: &mut Session) {
        self.shell.activate_workspace(0);
        self.workspace_update(session, true);
        self.last_pushed_favorites = None;
        debug!("[WorkspaceSynchronizer] detached");
    }
}

/// Sets `active`/`active_workspace_index` from the slot assignments.
///
/// Worksets shown on workspaces beyond the tracked slots keep their flags.
fn refresh_activity(session: &mut Session) {
    for index in 0..session.worksets.len() {
        let slot = session
            .workspace_maps
            .slot_showing(&session.worksets[index].workset_name);
        let workset = &mut session.worksets[index];
        match slot {
            Some(slot) => {
                workset.active = true;
                workset.active_workspace_index = Some(slot.index());
            }
            None if workset
                .active_workspace_index
                .is_some_and(|shown_on| WorkspaceSlot::new(shown_on).is_none()) => {}
            None => workset.clear_runtime_state(),
        }
    }
}
