pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use config::JournalConfig;
use errors::CoreError;
use models::{
    backup::ReorderBackup,
    journal::{JournalEntry, JournalInput},
    settings::{MirrorSettings, PresetKind, ProfileSettings, Theme},
    stats::DashboardStats,
    view::{ListFilter, SortColumn, SortState},
};
use services::{
    backup_service::BackupService, journal_service::JournalService, list_service::ListService,
    preset_service::PresetService, profile_service::ProfileService, stats_service::StatsService,
};
use state::AppState;
use storage::{
    file_store::FileStore,
    kv::KeyValueStore,
    manager::StorageManager,
    mirror::{DirectoryMirror, FsDirectoryMirror},
};

/// Main entry point for the Trading Journal core library.
/// Holds the session state and all services needed to operate on it.
///
/// Every mutation writes through to the primary store before the in-memory
/// state is updated, so after a failed write the state matches what the
/// store holds.
#[must_use]
pub struct TradingJournal {
    state: AppState,
    storage: StorageManager,
    mirror: Option<Arc<dyn DirectoryMirror>>,
    /// Last detached mirror write. Each write waits for the one before it,
    /// so awaiting the tail waits for all of them.
    mirror_tail: Option<JoinHandle<()>>,
    /// One-shot informational message about degraded storage.
    storage_notice: Option<String>,
    profile_service: ProfileService,
    preset_service: PresetService,
    journal_service: JournalService,
    list_service: ListService,
    stats_service: StatsService,
    backup_service: BackupService,
}

impl std::fmt::Debug for TradingJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingJournal")
            .field("storage_root", &self.state.storage_root)
            .field("profiles", &self.state.profiles.len())
            .field("current_profile", &self.state.current_profile)
            .field("journals", &self.state.journals.len())
            .field("mirror", &self.mirror.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

impl TradingJournal {
    /// Open the journal over a primary store and restore the last session
    /// (active storage root and profile).
    ///
    /// Fails with `CoreError::StorageUnavailable` if the store rejects writes.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        store.probe()?;
        let mut journal = Self::build(StorageManager::new(store));
        journal.restore_session()?;
        Ok(journal)
    }

    /// Open a file-backed journal as described by `config`.
    ///
    /// An unusable mirror directory is not fatal: the journal runs on the
    /// primary store alone and reports it once via `take_storage_notice`.
    pub fn open_with_config(config: &JournalConfig) -> Result<Self, CoreError> {
        let store = FileStore::open(&config.data_file)?;
        let mut journal = Self::open(Arc::new(store))?;
        if let Some(dir) = &config.mirror_dir {
            // The error is kept as the storage notice.
            let _ = journal.attach_mirror_dir(dir.clone());
        }
        Ok(journal)
    }

    // ── Directory Mirror ────────────────────────────────────────────

    /// Mirror journal and settings saves into `mirror` from now on.
    pub fn attach_mirror(&mut self, mirror: Arc<dyn DirectoryMirror>) {
        tracing::info!(mirror = mirror.name(), "directory mirror attached");
        self.mirror = Some(mirror);
    }

    /// Attach a filesystem mirror rooted at `dir`.
    ///
    /// On failure the journal keeps running without a mirror and the reason
    /// is stored as the storage notice.
    pub fn attach_mirror_dir(&mut self, dir: PathBuf) -> Result<(), CoreError> {
        match FsDirectoryMirror::open(dir) {
            Ok(mirror) => {
                self.attach_mirror(Arc::new(mirror));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "directory mirror unavailable, using primary store only");
                self.storage_notice = Some(format!(
                    "{e}. Data is saved to the journal store only."
                ));
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    /// Take the pending storage notice, if any. Each notice is returned once.
    pub fn take_storage_notice(&mut self) -> Option<String> {
        self.storage_notice.take()
    }

    /// Wait for every detached mirror write to finish.
    pub async fn flush_mirror(&mut self) {
        if let Some(tail) = self.mirror_tail.take() {
            if let Err(e) = tail.await {
                tracing::warn!(error = %e, "mirror task aborted");
            }
        }
    }

    // ── Storage Root & Profiles ─────────────────────────────────────

    /// Make `path` the active storage root and load its profile registry.
    /// Switching to a different root clears the active profile.
    pub fn set_storage_root(&mut self, path: &str) -> Result<(), CoreError> {
        let root = path.trim();
        if root.is_empty() {
            return Err(CoreError::MissingInput("storage root"));
        }

        let profiles = self.profile_service.list(&self.storage, root)?;
        self.storage.set_active_root(root)?;
        if self.state.storage_root.as_deref() != Some(root) && self.state.current_profile.is_some() {
            self.storage.set_active_profile(None)?;
            self.state.reset_profile();
        }

        self.state.storage_root = Some(root.to_string());
        self.state.profiles = profiles;
        tracing::info!(root, profiles = self.state.profiles.len(), "storage root selected");
        Ok(())
    }

    #[must_use]
    pub fn storage_root(&self) -> Option<&str> {
        self.state.storage_root.as_deref()
    }

    /// Profile names stored under any root, in creation order.
    pub fn list_profiles(&self, root: &str) -> Result<Vec<String>, CoreError> {
        self.profile_service.list(&self.storage, root)
    }

    /// Profile names of the active root.
    #[must_use]
    pub fn profiles(&self) -> &[String] {
        &self.state.profiles
    }

    /// Create a profile under the active root. Returns the stored (trimmed) name.
    pub fn create_profile(&mut self, name: &str) -> Result<String, CoreError> {
        let root = self.require_root()?;
        let (name, settings) =
            self.profile_service
                .create(&self.storage, &root, &mut self.state.profiles, name)?;

        let document = MirrorSettings {
            profile_name: name.clone(),
            settings,
            created_at: Utc::now(),
        };
        self.mirror_detached("provision", &name, move |mirror, profile| async move {
            mirror.provision_profile(&profile, &document).await
        });
        Ok(name)
    }

    /// Delete a profile with all of its data. Deleting the active profile
    /// clears the active pointer.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), CoreError> {
        let root = self.require_root()?;
        let is_current = self.state.current_profile.as_deref() == Some(name);
        if let Err(e) = self
            .profile_service
            .delete(&self.storage, &root, &mut self.state.profiles, name)
        {
            // The profile stays listed but its data may already be gone.
            if is_current {
                if let Err(reload) = self.load_profile(&root, name) {
                    tracing::warn!(profile = name, error = %reload, "reload after failed delete failed");
                }
            }
            return Err(e);
        }

        if is_current {
            self.storage.set_active_profile(None)?;
            self.state.reset_profile();
        }

        self.mirror_detached("remove", name, |mirror, profile| async move {
            mirror.remove_profile(&profile).await
        });
        Ok(())
    }

    /// Make `name` the active profile and load its settings, journals and
    /// custom order.
    pub fn select_profile(&mut self, name: &str) -> Result<(), CoreError> {
        let root = self.require_root()?;
        if !self.state.profiles.iter().any(|p| p == name) {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        }
        self.storage.set_active_profile(Some(name))?;
        self.load_profile(&root, name)
    }

    /// Reload the active profile from the primary store.
    pub fn reload_profile(&mut self) -> Result<(), CoreError> {
        let (root, profile) = self.require_profile()?;
        self.load_profile(&root, &profile)
    }

    #[must_use]
    pub fn current_profile(&self) -> Option<&str> {
        self.state.current_profile.as_deref()
    }

    /// Read-only view of the whole session state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ── Presets ─────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &ProfileSettings {
        &self.state.settings
    }

    #[must_use]
    pub fn presets(&self, kind: PresetKind) -> &[String] {
        self.state.settings.list(kind)
    }

    /// Add a preset value. Returns `false` for blank input (nothing changes).
    pub fn add_preset(&mut self, kind: PresetKind, value: &str) -> Result<bool, CoreError> {
        let (root, profile) = self.require_profile()?;
        let mut settings = self.state.settings.clone();
        if !self.preset_service.add(&mut settings, kind, value)? {
            return Ok(false);
        }
        self.commit_settings(&root, &profile, settings)?;
        Ok(true)
    }

    /// Remove a preset value. Journal entries that use it keep their label.
    /// Returns `false` when the value wasn't in the list.
    pub fn remove_preset(&mut self, kind: PresetKind, value: &str) -> Result<bool, CoreError> {
        let (root, profile) = self.require_profile()?;
        let mut settings = self.state.settings.clone();
        if !self.preset_service.remove(&mut settings, kind, value) {
            return Ok(false);
        }
        self.commit_settings(&root, &profile, settings)?;
        Ok(true)
    }

    // ── Journal Entries ─────────────────────────────────────────────

    /// Validate and save a journal entry.
    ///
    /// Without `editing_id` a new entry is created at the head of the list;
    /// with it, the matching entry is replaced in place. Returns the entry id.
    pub fn save_journal(&mut self, input: JournalInput, editing_id: Option<i64>) -> Result<i64, CoreError> {
        let (root, profile) = self.require_profile()?;

        let mut journals = self.state.journals.clone();
        let id = self
            .journal_service
            .upsert(&mut journals, input, editing_id, Utc::now())?;

        let mut order = self.state.custom_order.clone();
        if editing_id.is_none() {
            if let Some(order) = order.as_mut() {
                order.insert(0, id);
            }
        }

        self.commit_journals(&root, &profile, journals, order)?;
        tracing::info!(
            profile = %profile,
            id,
            edited = editing_id.is_some(),
            "journal entry saved"
        );
        Ok(id)
    }

    /// Delete one entry. Returns whether it existed.
    pub fn delete_journal(&mut self, id: i64) -> Result<bool, CoreError> {
        Ok(self.delete_journals(&[id])? > 0)
    }

    /// Delete every entry whose id is listed. Returns how many were removed.
    pub fn delete_journals(&mut self, ids: &[i64]) -> Result<usize, CoreError> {
        let (root, profile) = self.require_profile()?;

        let mut journals = self.state.journals.clone();
        let removed = self.journal_service.delete(&mut journals, ids);
        if removed == 0 {
            return Ok(0);
        }

        let order = self
            .state
            .custom_order
            .as_ref()
            .map(|order| order.iter().copied().filter(|id| !ids.contains(id)).collect::<Vec<_>>());

        self.commit_journals(&root, &profile, journals, order)?;
        tracing::info!(profile = %profile, removed, "journal entries deleted");
        Ok(removed)
    }

    /// All entries in natural order (newest first).
    #[must_use]
    pub fn journals(&self) -> &[JournalEntry] {
        &self.state.journals
    }

    #[must_use]
    pub fn journal(&self, id: i64) -> Option<&JournalEntry> {
        self.state.journals.iter().find(|j| j.id == id)
    }

    #[must_use]
    pub fn journal_count(&self) -> usize {
        self.state.journals.len()
    }

    // ── List View ───────────────────────────────────────────────────

    /// Entries as the list view shows them: sorted or custom-ordered, then filtered.
    #[must_use]
    pub fn visible_journals(&self, filter: &ListFilter) -> Vec<&JournalEntry> {
        self.list_service.visible(
            &self.state.journals,
            self.state.custom_order.as_deref(),
            &self.state.sort,
            filter,
        )
    }

    /// Ids in current display order, unfiltered.
    #[must_use]
    pub fn display_order(&self) -> Vec<i64> {
        self.visible_journals(&ListFilter::default())
            .into_iter()
            .map(|j| j.id)
            .collect()
    }

    /// Sort by `column`; selecting the active column again flips the direction.
    pub fn toggle_sort(&mut self, column: SortColumn) -> SortState {
        self.state.sort.toggle(column);
        self.state.sort
    }

    pub fn clear_sort(&mut self) {
        self.state.sort.clear();
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.state.sort
    }

    #[must_use]
    pub fn custom_order(&self) -> Option<&[i64]> {
        self.state.custom_order.as_deref()
    }

    /// Trial order after dragging `id` to `new_index` in the current display order.
    pub fn trial_order_after_move(&self, id: i64, new_index: usize) -> Result<Vec<i64>, CoreError> {
        self.list_service.move_id(&self.display_order(), id, new_index)
    }

    /// Persist `trial` as the custom display order.
    ///
    /// The trial must contain exactly the live journal ids; otherwise
    /// `CoreError::ReorderIntegrity` is returned and nothing changes. A
    /// snapshot of the current list is saved first so the reorder can be
    /// undone with `restore_backup`. The active sort is cleared so the new
    /// order is what the list shows.
    pub fn commit_custom_order(&mut self, trial: Vec<i64>) -> Result<(), CoreError> {
        let (root, profile) = self.require_profile()?;
        self.list_service.verify_order(&self.state.journals, &trial)?;

        let backup = ReorderBackup {
            journals: self.state.journals.clone(),
            custom_order: self.state.custom_order.clone(),
            created_at: Utc::now(),
        };
        self.storage.save_reorder_backup(&root, &profile, &backup)?;
        self.storage.save_custom_order(&root, &profile, Some(&trial))?;

        self.state.custom_order = Some(trial);
        self.state.sort.clear();
        tracing::info!(profile = %profile, entries = self.state.journals.len(), "custom order committed");
        Ok(())
    }

    /// Drop the custom order; the list falls back to natural order.
    pub fn clear_custom_order(&mut self) -> Result<(), CoreError> {
        let (root, profile) = self.require_profile()?;
        self.storage.save_custom_order(&root, &profile, None)?;
        self.state.custom_order = None;
        Ok(())
    }

    pub fn has_reorder_backup(&self) -> Result<bool, CoreError> {
        let (root, profile) = self.require_profile()?;
        Ok(self.storage.load_reorder_backup(&root, &profile)?.is_some())
    }

    /// Overwrite the journals and custom order with the snapshot taken
    /// before the last custom order commit.
    pub fn restore_backup(&mut self) -> Result<(), CoreError> {
        let (root, profile) = self.require_profile()?;
        let backup = self
            .storage
            .load_reorder_backup(&root, &profile)?
            .ok_or(CoreError::NoBackup)?;

        self.commit_journals(&root, &profile, backup.journals, backup.custom_order)?;
        tracing::info!(profile = %profile, entries = self.state.journals.len(), "restored from reorder backup");
        Ok(())
    }

    // ── Dashboard ───────────────────────────────────────────────────

    /// Statistics for the active profile, recomputed on every call.
    #[must_use]
    pub fn dashboard(&self) -> DashboardStats {
        self.stats_service.dashboard(&self.state.journals)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the active profile (journals + settings) as a JSON document.
    pub fn export_backup(&self) -> Result<String, CoreError> {
        let (root, profile) = self.require_profile()?;
        self.backup_service.export(
            &root,
            &profile,
            &self.state.journals,
            &self.state.settings,
            Utc::now(),
        )
    }

    /// Suggested file name for `export_backup`.
    pub fn backup_file_name(&self) -> Result<String, CoreError> {
        let (_, profile) = self.require_profile()?;
        Ok(self.backup_service.file_name(&profile, Utc::now()))
    }

    /// Replace the active profile's journals and settings with a backup
    /// document. The caller is responsible for confirming with the user.
    /// The custom order is dropped. Returns the number of entries imported.
    pub fn import_backup(&mut self, json: &str) -> Result<usize, CoreError> {
        let (root, profile) = self.require_profile()?;
        let document = self.backup_service.parse(json)?;
        let settings = document
            .settings
            .unwrap_or_else(|| self.state.settings.clone());

        let written = self
            .storage
            .save_journals(&root, &profile, &document.journals)
            .and_then(|()| self.storage.save_settings(&root, &profile, &settings))
            .and_then(|()| self.storage.save_custom_order(&root, &profile, None));
        if let Err(e) = written {
            // Part of the import may have landed; show what the store holds.
            if let Err(reload) = self.load_profile(&root, &profile) {
                tracing::warn!(profile = %profile, error = %reload, "reload after failed import failed");
            }
            return Err(e);
        }

        let count = document.journals.len();
        tracing::info!(profile = %profile, from = %document.profile, count, "backup imported");
        self.load_profile(&root, &profile)?;
        self.mirror_journals(&profile);
        self.mirror_settings(&profile);
        Ok(count)
    }

    // ── Preferences & Housekeeping ──────────────────────────────────

    pub fn theme(&self) -> Result<Theme, CoreError> {
        self.storage.theme()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.storage.set_theme(theme)
    }

    /// Wipe the primary store and reset the session. The mirror is left alone.
    pub fn clear_all_data(&mut self) -> Result<(), CoreError> {
        self.storage.clear_all()?;
        self.state = AppState::default();
        tracing::warn!("all journal data cleared");
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(storage: StorageManager) -> Self {
        Self {
            state: AppState::default(),
            storage,
            mirror: None,
            mirror_tail: None,
            storage_notice: None,
            profile_service: ProfileService::new(),
            preset_service: PresetService::new(),
            journal_service: JournalService::new(),
            list_service: ListService::new(),
            stats_service: StatsService::new(),
            backup_service: BackupService::new(),
        }
    }

    fn restore_session(&mut self) -> Result<(), CoreError> {
        let Some(root) = self.storage.active_root()? else {
            return Ok(());
        };
        self.state.profiles = self.profile_service.list(&self.storage, &root)?;
        self.state.storage_root = Some(root.clone());

        if let Some(profile) = self.storage.active_profile()? {
            if self.state.profiles.contains(&profile) {
                self.load_profile(&root, &profile)?;
            } else {
                tracing::warn!(profile = %profile, "active profile no longer exists, clearing pointer");
                self.storage.set_active_profile(None)?;
            }
        }
        Ok(())
    }

    /// Load a profile's data into the session, applying load-time corrections
    /// (missing preset defaults, retired stop label). Settings are written
    /// back only when a correction changed them.
    fn load_profile(&mut self, root: &str, profile: &str) -> Result<(), CoreError> {
        let mut settings = self.storage.load_settings(root, profile)?.unwrap_or_default();
        let filled = self.preset_service.ensure_defaults(&mut settings);
        let migrated = self.preset_service.migrate_legacy_stops(&mut settings);
        if filled || migrated {
            self.storage.save_settings(root, profile, &settings)?;
        }

        let journals = self.storage.load_journals(root, profile)?;
        let custom_order = self.storage.load_custom_order(root, profile)?;

        self.state.reset_profile();
        self.state.current_profile = Some(profile.to_string());
        self.state.settings = settings;
        self.state.journals = journals;
        self.state.custom_order = custom_order;

        tracing::info!(root, profile, journals = self.state.journals.len(), filled, migrated, "profile loaded");
        if filled || migrated {
            self.mirror_settings(profile);
        }
        Ok(())
    }

    /// Persist a new journal list and custom order. The journals key is
    /// written first and the session follows each key as it lands, so a
    /// failed order write leaves memory matching the store. A stale order
    /// is harmless: the list overlay skips unknown ids and appends unlisted
    /// ones.
    fn commit_journals(
        &mut self,
        root: &str,
        profile: &str,
        journals: Vec<JournalEntry>,
        order: Option<Vec<i64>>,
    ) -> Result<(), CoreError> {
        self.storage.save_journals(root, profile, &journals)?;
        self.state.journals = journals;
        self.mirror_journals(profile);

        if order != self.state.custom_order {
            self.storage.save_custom_order(root, profile, order.as_deref())?;
            self.state.custom_order = order;
        }
        Ok(())
    }

    fn commit_settings(&mut self, root: &str, profile: &str, settings: ProfileSettings) -> Result<(), CoreError> {
        self.storage.save_settings(root, profile, &settings)?;
        self.state.settings = settings;
        self.mirror_settings(profile);
        Ok(())
    }

    fn require_root(&self) -> Result<String, CoreError> {
        self.state.storage_root.clone().ok_or(CoreError::NoStorageRoot)
    }

    fn require_profile(&self) -> Result<(String, String), CoreError> {
        let root = self.require_root()?;
        let profile = self
            .state
            .current_profile
            .clone()
            .ok_or(CoreError::NoActiveProfile)?;
        Ok((root, profile))
    }

    fn mirror_journals(&mut self, profile: &str) {
        let journals = self.state.journals.clone();
        self.mirror_detached("journals", profile, move |mirror, profile| async move {
            mirror.write_journals(&profile, &journals).await
        });
    }

    fn mirror_settings(&mut self, profile: &str) {
        let document = MirrorSettings {
            profile_name: profile.to_string(),
            settings: self.state.settings.clone(),
            created_at: Utc::now(),
        };
        self.mirror_detached("settings", profile, move |mirror, profile| async move {
            mirror.write_settings(&profile, &document).await
        });
    }

    /// Run a mirror write on the ambient tokio runtime without waiting for it.
    /// Writes run one at a time in the order they were issued. The outcome is
    /// only logged; without a runtime the write is skipped.
    fn mirror_detached<F, Fut>(&mut self, what: &'static str, profile: &str, write: F)
    where
        F: FnOnce(Arc<dyn DirectoryMirror>, String) -> Fut,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(what, profile, "no async runtime, mirror write skipped");
            return;
        };

        let name = mirror.name().to_string();
        let profile = profile.to_string();
        let task = write(mirror, profile.clone());

        let previous = self.mirror_tail.take();
        self.mirror_tail = Some(runtime.spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    tracing::warn!(error = %e, "previous mirror task aborted");
                }
            }
            match task.await {
                Ok(()) => tracing::debug!(mirror = %name, profile = %profile, what, "mirror write done"),
                Err(e) => tracing::warn!(mirror = %name, profile = %profile, what, error = %e, "mirror write failed"),
            }
        }));
    }
}
