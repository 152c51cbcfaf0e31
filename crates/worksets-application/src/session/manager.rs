use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use worksets_core::chooser::{self, AppChooser};
use worksets_core::desktop::{self, DesktopShell};
use worksets_core::model::{
    BackgroundStyle, BoolOption, Collection, FavApp, Session, Workset, WorkspaceSlot,
};
use worksets_core::prompt::{ObjectCandidate, ObjectKind, ObjectSource, UserPrompt, WorksetEdit};
use worksets_core::repository::{SessionRepository, StoredObject};
use worksets_core::validator::{self, MAX_CLI_SWITCH_LENGTH, MAX_FAV_APPS_COUNT};
use worksets_core::workspace::{Activation, WorkspaceSynchronizer};
use worksets_core::Result;

use super::factory::SessionFactory;

const NEW_WORKSET_SUGGESTION: &str = "New Workset";
const COLLECTION_FALLBACK_NAME: &str = "Collection";

/// Everything guarded by the manager's lock.
#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    synchronizer: Option<WorkspaceSynchronizer>,
    /// JSON of the last successful `session.json` write.
    last_saved: Option<String>,
}

impl SessionState {
    fn parts(&mut self) -> Option<(&mut Session, &mut WorkspaceSynchronizer)> {
        match (self.session.as_mut(), self.synchronizer.as_mut()) {
            (Some(session), Some(synchronizer)) => Some((session, synchronizer)),
            _ => None,
        }
    }
}

/// Owns the live session and runs every user action and desktop event on it.
///
/// `SessionManager` is responsible for:
/// - Loading, creating, restoring and saving the session
/// - Creating, editing and deleting worksets
/// - Showing worksets on workspaces through the [`WorkspaceSynchronizer`]
/// - Exporting and importing worksets and collections
///
/// All operations are serialized by one lock held for the whole mutation,
/// cleanup and save. Dialogs are awaited before the lock is taken, so a
/// pending prompt never blocks desktop events.
///
/// Operations naming a workset that no longer exists do nothing and return
/// `Ok(None)`, `Ok(false)` or `Ok(())`.
pub struct SessionManager {
    state: Mutex<SessionState>,
    repository: Arc<dyn SessionRepository>,
    shell: Arc<dyn DesktopShell>,
    prompt: Arc<dyn UserPrompt>,
    chooser: Option<Arc<dyn AppChooser>>,
    factory: SessionFactory,
}

impl SessionManager {
    /// Creates a manager with no session loaded; call [`SessionManager::start`] next.
    ///
    /// # Arguments
    ///
    /// * `repository` - Storage for the session and exported objects
    /// * `shell` - The desktop being driven
    /// * `prompt` - Dialogs and on-screen feedback
    /// * `chooser` - The application-chooser helper, if one is installed
    /// * `factory` - Builds new sessions and worksets
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        shell: Arc<dyn DesktopShell>,
        prompt: Arc<dyn UserPrompt>,
        chooser: Option<Arc<dyn AppChooser>>,
        factory: SessionFactory,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            repository,
            shell,
            prompt,
            chooser,
            factory,
        }
    }

    fn feedback(&self, message: &str) {
        info!("[SessionManager] {}", message);
        self.prompt.show_feedback(message);
    }

    /// Takes over a session: the synchronizer drops stale assignments and
    /// shows the defaults.
    fn install(&self, state: &mut SessionState, mut session: Session) {
        let synchronizer = WorkspaceSynchronizer::attach(self.shell.clone(), &mut session);
        info!(
            "[SessionManager] session '{}' with {} worksets is live",
            session.session_name,
            session.worksets.len()
        );
        state.session = Some(session);
        state.synchronizer = Some(synchronizer);
    }

    /// Writes `session.json` unless it would be identical to the last write.
    async fn persist(&self, state: &mut SessionState) -> Result<()> {
        let Some(session) = state.session.as_ref() else {
            return Ok(());
        };
        let serialized = serde_json::to_string(session)?;
        if state.last_saved.as_deref() == Some(serialized.as_str()) {
            debug!("[SessionManager] session unchanged; save skipped");
            return Ok(());
        }
        self.repository.save_session(session).await?;
        state.last_saved = Some(serialized);
        debug!("[SessionManager] session saved");
        Ok(())
    }

    /// Loads the stored session, or creates one from the desktop.
    ///
    /// A session file that cannot be read is copied aside byte-for-byte before
    /// being replaced, so nothing the user had is lost.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let session = match self.repository.load_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                info!("[SessionManager] no stored session; creating one from the desktop");
                self.factory.new_session(true, self.shell.as_ref())
            }
            Err(e) => {
                error!("[SessionManager] stored session is unreadable: {}", e);
                match self.repository.backup_session_file().await {
                    Ok(Some(copy)) => warn!("[SessionManager] unreadable session kept as {}", copy),
                    Ok(None) => {}
                    Err(e) => error!("[SessionManager] could not copy the unreadable session: {}", e),
                }
                self.factory.new_session(true, self.shell.as_ref())
            }
        };
        self.install(&mut state, session);
        self.persist(&mut state).await
    }

    /// Replaces the live session with a new one.
    ///
    /// # Arguments
    ///
    /// * `from_environment` - Seed the first workset from the desktop's favorites
    /// * `backup` - Write a backup of the current session first
    pub async fn new_session(&self, from_environment: bool, backup: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        if backup {
            if let Some(current) = state.session.as_ref() {
                self.repository.backup_session(current).await?;
            }
        }
        let session = self.factory.new_session(from_environment, self.shell.as_ref());
        self.install(&mut state, session);
        self.persist(&mut state).await?;
        self.feedback("New session created.");
        Ok(())
    }

    /// Reloads the session from disk, or from the newest backup with `restore`.
    ///
    /// Returns `false` when there was nothing to load; the live session is
    /// then left alone.
    pub async fn load_session(&self, restore: bool) -> Result<bool> {
        let mut state = self.state.lock().await;
        let loaded = if restore {
            self.repository.load_latest_backup().await?
        } else {
            self.repository.load_session().await?
        };
        let Some(session) = loaded else {
            self.feedback(if restore {
                "No session backup found."
            } else {
                "No saved session found."
            });
            return Ok(false);
        };
        self.install(&mut state, session);
        self.persist(&mut state).await?;
        if restore {
            self.feedback("Session restored from backup.");
        }
        Ok(true)
    }

    /// Saves the live session. With `backup` a timestamped copy is written
    /// instead and its file name returned.
    pub async fn save_session(&self, backup: bool) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        let Some(session) = state.session.as_ref() else {
            return Ok(None);
        };
        if backup {
            let filename = self.repository.backup_session(session).await?;
            self.feedback(&format!("Session backed up to {filename}."));
            return Ok(Some(filename));
        }
        self.persist(&mut state).await?;
        Ok(None)
    }

    /// Adds a workset built from the workset prototype.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the new workset; the user is asked when `None`
    /// * `target_index` - Workspace the workset should open on by default.
    ///   If that workspace is active and shows nothing, the workset is shown
    /// * `from_environment` - Seed favorites from the desktop
    ///
    /// # Returns
    ///
    /// The name the workset was stored under, or `None` when cancelled or
    /// refused.
    pub async fn new_workset(
        &self,
        name: Option<&str>,
        target_index: Option<usize>,
        from_environment: bool,
    ) -> Result<Option<String>> {
        let raw = match name {
            Some(name) => name.to_string(),
            None => match self.prompt.propose_new_workset_name(NEW_WORKSET_SUGGESTION).await {
                Some(name) => name,
                None => return Ok(None),
            },
        };
        let name = validator::clean_workset_name(&raw, "");
        if name.is_empty() {
            self.feedback("A workset needs a name.");
            return Ok(None);
        }
        let workset = self
            .factory
            .new_workset(&name, from_environment, self.shell.as_ref());

        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(None);
        };
        if let Err(e) = session.insert_workset(workset) {
            if e.is_conflict() {
                self.feedback(&format!("Cannot create '{name}': {e}"));
                return Ok(None);
            }
            return Err(e);
        }
        if let Some(slot) = target_index.and_then(WorkspaceSlot::new) {
            session.workspace_maps.get_mut(slot).default_workset = name.clone();
            synchronizer.load_default_worksets(session);
            synchronizer.workspace_update(session, false);
        }
        self.persist(&mut state).await?;
        self.feedback(&format!("Workset {name} created."));
        Ok(Some(name))
    }

    /// Opens the edit dialog for a workset and applies the result.
    ///
    /// The dialog can rename the workset and choose the workspaces it opens
    /// on by default. Returns whether anything was committed.
    pub async fn edit_workset(&self, name: &str) -> Result<bool> {
        let current = {
            let state = self.state.lock().await;
            let Some(session) = state.session.as_ref().filter(|s| s.contains(name)) else {
                return Ok(false);
            };
            WorksetEdit {
                name: name.to_string(),
                default_slots: session.workspace_maps.default_slots_of(name),
            }
        };

        let Some(edit) = self.prompt.edit_workset(current).await else {
            return Ok(false);
        };

        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        if !session.contains(name) {
            debug!("[SessionManager] '{}' went away while being edited", name);
            return Ok(false);
        }
        let stored_name = match session.rename_workset(name, &edit.name) {
            Ok(stored_name) => stored_name,
            Err(e) if e.is_conflict() => {
                self.feedback(&format!("Cannot rename '{name}': {e}"));
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        session.set_default_slots(&stored_name, &edit.default_slots)?;
        synchronizer.workspace_update(session, false);
        synchronizer.load_default_worksets(session);
        synchronizer.workspace_update(session, false);
        self.persist(&mut state).await?;
        self.feedback("Changes saved.");
        Ok(true)
    }

    /// Renames a workset and every reference to it. Returns the stored name.
    pub async fn rename_workset(&self, old_name: &str, new_name: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(None);
        };
        if !session.contains(old_name) {
            return Ok(None);
        }
        let stored_name = match session.rename_workset(old_name, new_name) {
            Ok(stored_name) => stored_name,
            Err(e) if e.is_conflict() => {
                self.feedback(&format!("Cannot rename '{old_name}': {e}"));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        synchronizer.workspace_update(session, false);
        self.persist(&mut state).await?;
        Ok(Some(stored_name))
    }

    /// Makes `name` the default workset of exactly `slots`.
    pub async fn set_workset_default_slots(&self, name: &str, slots: &[WorkspaceSlot]) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(());
        };
        if !session.contains(name) {
            return Ok(());
        }
        session.set_default_slots(name, slots)?;
        synchronizer.load_default_worksets(session);
        synchronizer.workspace_update(session, false);
        self.persist(&mut state).await
    }

    /// Removes a workset after exporting a timestamped backup of it.
    ///
    /// The last workset of a session cannot be deleted.
    ///
    /// # Returns
    ///
    /// The backup's file name.
    pub async fn delete_workset(&self, name: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(None);
        };
        let Some(workset) = session.workset(name) else {
            return Ok(None);
        };
        if session.worksets.len() == 1 {
            self.feedback("The last workset of a session cannot be deleted.");
            return Ok(None);
        }

        let backup = self.repository.save_workset(workset, true).await?;
        synchronizer.close_workset(session, name);
        session.remove_workset(name)?;
        synchronizer.workspace_update(session, false);
        self.persist(&mut state).await?;
        self.feedback(&format!(
            "Workset {name} removed from the session; backup saved to {backup}."
        ));
        Ok(Some(backup))
    }

    /// Sets the session's default workset.
    pub async fn set_default_workset(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some(session) = state.session.as_mut() else {
            return Ok(());
        };
        if !session.contains(name) {
            return Ok(());
        }
        session.default = name.to_string();
        self.persist(&mut state).await
    }

    /// Shows a workset; see [`WorkspaceSynchronizer::display_workset`].
    pub async fn display_workset(
        &self,
        name: &str,
        load_in_new_workspace: bool,
    ) -> Result<Option<Activation>> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(None);
        };
        let activation = synchronizer.display_workset(session, name, load_in_new_workspace);
        if activation.is_some() {
            self.persist(&mut state).await?;
        }
        Ok(activation)
    }

    /// Stops showing a workset. Returns whether it was shown.
    pub async fn close_workset(&self, name: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let closed = synchronizer.close_workset(session, name);
        if closed {
            self.persist(&mut state).await?;
        }
        Ok(closed)
    }

    /// Appends a favorite to a workset.
    ///
    /// The entry is validated again, duplicates and full lists are refused,
    /// and the workset is re-applied if it is shown on the active workspace.
    pub async fn add_favorite(&self, name: &str, favorite: FavApp) -> Result<bool> {
        let Some(favorite) = validator::validate_fav_app(&serde_json::to_value(&favorite)?, 0)
            .filter(|app| !app.name.is_empty())
        else {
            self.feedback("That application cannot be added.");
            return Ok(false);
        };

        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let Some(workset) = session.workset_mut(name) else {
            return Ok(false);
        };
        if workset.has_favorite(&favorite.name) {
            self.feedback(&format!("{} is already a favorite of {name}.", favorite.display_name));
            return Ok(false);
        }
        if workset.fav_apps.len() >= MAX_FAV_APPS_COUNT {
            self.feedback(&format!("{name} already has {MAX_FAV_APPS_COUNT} favorites."));
            return Ok(false);
        }
        let display_name = favorite.display_name.clone();
        workset.fav_apps.push(favorite);
        synchronizer.reapply_if_active(session, name);
        self.persist(&mut state).await?;
        self.feedback(&format!("{display_name} added to {name}."));
        Ok(true)
    }

    /// Runs the application-chooser helper and adds the picked application.
    pub async fn add_favorite_from_chooser(&self, name: &str) -> Result<Option<FavApp>> {
        let Some(chooser) = self.chooser.clone() else {
            self.feedback("No application chooser is configured.");
            return Ok(None);
        };
        {
            let state = self.state.lock().await;
            if !state.session.as_ref().is_some_and(|s| s.contains(name)) {
                return Ok(None);
            }
        }

        let Some(stdout) = chooser.choose_app(name).await? else {
            debug!("[SessionManager] application chooser cancelled");
            return Ok(None);
        };
        let Some(app) = chooser::parse_chooser_output(&stdout) else {
            self.feedback("The application chooser returned nothing usable.");
            return Ok(None);
        };
        let added = self.add_favorite(name, app.clone()).await?;
        Ok(added.then_some(app))
    }

    /// Removes a favorite from a workset, re-applying it if shown here.
    pub async fn remove_favorite(&self, name: &str, app_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let Some(workset) = session.workset_mut(name) else {
            return Ok(false);
        };
        let before = workset.fav_apps.len();
        workset.fav_apps.retain(|app| app.name != app_id);
        if workset.fav_apps.len() == before {
            return Ok(false);
        }
        synchronizer.reapply_if_active(session, name);
        self.persist(&mut state).await?;
        Ok(true)
    }

    /// Sets a workset's light or dark background image.
    ///
    /// The path is validated as an image; an empty path clears the background.
    pub async fn set_workset_background(&self, name: &str, path: &str, dark: bool) -> Result<bool> {
        let field = if dark {
            "BackgroundImageDark"
        } else {
            "BackgroundImage"
        };
        let image = validator::validate_image_path(&Value::String(path.to_string()), field);
        if image.is_empty() && !path.trim().is_empty() {
            self.feedback(&format!("{path} cannot be used as a background."));
            return Ok(false);
        }

        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let Some(workset) = session.workset_mut(name) else {
            return Ok(false);
        };
        if dark {
            workset.background_image_dark = image;
        } else {
            workset.background_image = image;
        }
        synchronizer.reapply_if_active(session, name);
        self.persist(&mut state).await?;
        Ok(true)
    }

    /// Sets a workset's light or dark background style.
    pub async fn set_workset_background_style(
        &self,
        name: &str,
        style: BackgroundStyle,
        dark: bool,
    ) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let Some(workset) = session.workset_mut(name) else {
            return Ok(false);
        };
        if dark {
            workset.background_style_dark = style;
        } else {
            workset.background_style = style;
        }
        synchronizer.reapply_if_active(session, name);
        self.persist(&mut state).await?;
        Ok(true)
    }

    /// Toggles a session option and re-applies the active workset.
    pub async fn set_option(&self, option: BoolOption, value: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(());
        };
        session.options.set_flag(option, value);
        debug!("[SessionManager] {} = {}", option.key(), value);
        if let Some(active) = synchronizer
            .active_workset(session)
            .map(|ws| ws.workset_name.clone())
        {
            synchronizer.apply_workset(session, &active);
        }
        self.persist(&mut state).await
    }

    /// Sets the `CliSwitch` option.
    pub async fn set_cli_switch(&self, value: &str) -> Result<()> {
        let value = validator::safe_string(
            &Value::String(value.to_string()),
            "CliSwitch",
            MAX_CLI_SWITCH_LENGTH,
            "",
        );
        let mut state = self.state.lock().await;
        let Some(session) = state.session.as_mut() else {
            return Ok(());
        };
        session.options.cli_switch = Some(value);
        self.persist(&mut state).await
    }

    /// Exports a workset to the worksets directory.
    ///
    /// With `backup` the file name carries a timestamp and never overwrites
    /// an earlier export.
    pub async fn save_workset(&self, name: &str, backup: bool) -> Result<Option<String>> {
        let state = self.state.lock().await;
        let Some(workset) = state.session.as_ref().and_then(|s| s.workset(name)) else {
            return Ok(None);
        };
        let filename = self.repository.save_workset(workset, backup).await?;
        if !backup {
            self.feedback(&format!("Workset saved to {filename}."));
        }
        Ok(Some(filename))
    }

    /// Exports every workset of the session as a named collection.
    pub async fn save_collection(&self, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().await;
        let Some(session) = state.session.as_ref() else {
            return Ok(None);
        };
        let collection = Collection {
            collection_name: validator::clean_workset_name(name, COLLECTION_FALLBACK_NAME),
            worksets: session.worksets.clone(),
        };
        let filename = self.repository.save_collection(&collection).await?;
        self.feedback(&format!("Collection saved to {filename}."));
        Ok(Some(filename))
    }

    /// Lists the worksets in the session followed by every exported workset
    /// and collection on disk.
    pub async fn show_object_manager(&self) -> Result<Vec<ObjectCandidate>> {
        let mut candidates: Vec<ObjectCandidate> = {
            let state = self.state.lock().await;
            state
                .session
                .iter()
                .flat_map(|s| s.worksets.iter())
                .map(|ws| ObjectCandidate {
                    kind: ObjectKind::Workset,
                    name: ws.workset_name.clone(),
                    source: ObjectSource::Session,
                })
                .collect()
        };
        candidates.extend(
            self.repository
                .list_stored_objects()
                .await?
                .into_iter()
                .map(|object| ObjectCandidate {
                    kind: object.kind,
                    name: object.name,
                    source: ObjectSource::File(object.path),
                }),
        );
        Ok(candidates)
    }

    /// Lets the user pick an exported workset or collection and adds it to
    /// the session.
    ///
    /// The file is re-read and validated before anything is inserted. Worksets
    /// whose names are already taken are skipped.
    ///
    /// # Returns
    ///
    /// The names of the worksets added.
    pub async fn load_object(&self) -> Result<Vec<String>> {
        let candidates = self.show_object_manager().await?;
        let Some(choice) = self.prompt.choose_object(candidates).await else {
            return Ok(Vec::new());
        };
        let ObjectSource::File(path) = choice.source else {
            self.feedback(&format!("{} is already in the session.", choice.name));
            return Ok(Vec::new());
        };

        let stored = StoredObject {
            kind: choice.kind,
            name: choice.name,
            path,
        };
        let value = self.repository.read_stored_object(&stored).await?;
        let incoming = match stored.kind {
            ObjectKind::Workset => validator::validate_workset(&value, 0).into_iter().collect(),
            ObjectKind::Collection => validator::validate_collection(&value)
                .map(|collection| collection.worksets)
                .unwrap_or_default(),
        };
        if incoming.is_empty() {
            self.feedback(&format!("{} does not contain a usable workset.", stored.name));
            return Ok(Vec::new());
        }

        let mut state = self.state.lock().await;
        let Some(session) = state.session.as_mut() else {
            return Ok(Vec::new());
        };
        let added = insert_all(session, incoming, |message| self.feedback(message))?;
        if !added.is_empty() {
            self.persist(&mut state).await?;
            self.feedback(&format!("Loaded {} from file.", added.join(", ")));
        }
        Ok(added)
    }

    /// Records a favorites change made by the user in the desktop.
    ///
    /// Only the workset on the active workspace is updated and nothing is
    /// activated or reassigned. Echoes of our own pushes are ignored.
    pub async fn on_favorites_changed(&self) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(false);
        };
        let live = self.shell.favorite_app_ids();
        if !synchronizer.accept_favorites_change(&live) {
            return Ok(false);
        }
        let Some(active) = synchronizer
            .active_workset(session)
            .map(|ws| ws.workset_name.clone())
        else {
            return Ok(false);
        };
        let favorites = desktop::resolve_favorites(self.shell.as_ref(), &live);
        if let Some(workset) = session.workset_mut(&active) {
            workset.fav_apps = favorites;
        }
        debug!("[SessionManager] favorites of '{}' follow the desktop", active);
        self.persist(&mut state).await?;
        Ok(true)
    }

    /// Handles the desktop switching workspaces.
    pub async fn on_workspace_switched(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some((session, synchronizer)) = state.parts() else {
            return Ok(());
        };
        synchronizer.on_workspace_switched(session);
        self.persist(&mut state).await
    }

    /// Returns the desktop to one workspace, flushes the session and drops it.
    pub async fn destroy(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some((session, synchronizer)) = state.parts() {
            synchronizer.teardown(session);
        }
        let flushed = self.persist(&mut state).await;
        state.session = None;
        state.synchronizer = None;
        state.last_saved = None;
        info!("[SessionManager] session closed");
        flushed
    }

    /// A copy of the live session, including runtime activity flags.
    pub async fn session_snapshot(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    /// Name of the workset shown on the active workspace.
    pub async fn active_workset_name(&self) -> Option<String> {
        let state = self.state.lock().await;
        let session = state.session.as_ref()?;
        state
            .synchronizer
            .as_ref()?
            .active_workset(session)
            .map(|ws| ws.workset_name.clone())
    }
}

/// Inserts worksets, skipping (and reporting) names already taken.
fn insert_all(
    session: &mut Session,
    incoming: Vec<Workset>,
    report: impl Fn(&str),
) -> Result<Vec<String>> {
    let mut added = Vec::new();
    for workset in incoming {
        let name = workset.workset_name.clone();
        match session.insert_workset(workset) {
            Ok(()) => added.push(name),
            Err(e) if e.is_conflict() => report(&format!("Skipped '{name}': {e}")),
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}
