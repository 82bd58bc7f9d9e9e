use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::backup::ReorderBackup;
use crate::models::journal::JournalEntry;
use crate::models::settings::{ProfileSettings, Theme};

use super::keys::StorageKey;
use super::kv::KeyValueStore;

/// Typed access to the primary store: every value is a JSON document under
/// a [`StorageKey`].
#[derive(Clone)]
pub struct StorageManager {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager").finish_non_exhaustive()
    }
}

impl StorageManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ── Generic JSON access ─────────────────────────────────────────

    pub fn load<T: DeserializeOwned>(&self, key: StorageKey<'_>) -> Result<Option<T>, CoreError> {
        let key = key.render();
        match self.store.get(&key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| CoreError::Deserialization(format!("Corrupt value under {key}: {e}"))),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey<'_>, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        self.store.set(&key.render(), &raw)
    }

    pub fn remove(&self, key: StorageKey<'_>) -> Result<(), CoreError> {
        self.store.remove(&key.render())
    }

    // ── Profiles ────────────────────────────────────────────────────

    pub fn load_profiles(&self, root: &str) -> Result<Vec<String>, CoreError> {
        Ok(self.load(StorageKey::Profiles { root })?.unwrap_or_default())
    }

    pub fn save_profiles(&self, root: &str, profiles: &[String]) -> Result<(), CoreError> {
        self.save(StorageKey::Profiles { root }, profiles)
    }

    pub fn load_settings(&self, root: &str, profile: &str) -> Result<Option<ProfileSettings>, CoreError> {
        self.load(StorageKey::Settings { root, profile })
    }

    pub fn save_settings(&self, root: &str, profile: &str, settings: &ProfileSettings) -> Result<(), CoreError> {
        self.save(StorageKey::Settings { root, profile }, settings)
    }

    /// Remove every per-profile key.
    pub fn remove_profile_data(&self, root: &str, profile: &str) -> Result<(), CoreError> {
        for key in StorageKey::profile_scoped(root, profile) {
            self.remove(key)?;
        }
        Ok(())
    }

    // ── Journals ────────────────────────────────────────────────────

    pub fn load_journals(&self, root: &str, profile: &str) -> Result<Vec<JournalEntry>, CoreError> {
        Ok(self.load(StorageKey::Journals { root, profile })?.unwrap_or_default())
    }

    pub fn save_journals(&self, root: &str, profile: &str, journals: &[JournalEntry]) -> Result<(), CoreError> {
        self.save(StorageKey::Journals { root, profile }, journals)
    }

    pub fn load_custom_order(&self, root: &str, profile: &str) -> Result<Option<Vec<i64>>, CoreError> {
        self.load(StorageKey::CustomOrder { root, profile })
    }

    pub fn save_custom_order(&self, root: &str, profile: &str, order: Option<&[i64]>) -> Result<(), CoreError> {
        match order {
            Some(order) => self.save(StorageKey::CustomOrder { root, profile }, order),
            None => self.remove(StorageKey::CustomOrder { root, profile }),
        }
    }

    pub fn load_reorder_backup(&self, root: &str, profile: &str) -> Result<Option<ReorderBackup>, CoreError> {
        self.load(StorageKey::ReorderBackup { root, profile })
    }

    pub fn save_reorder_backup(&self, root: &str, profile: &str, backup: &ReorderBackup) -> Result<(), CoreError> {
        self.save(StorageKey::ReorderBackup { root, profile }, backup)
    }

    // ── Pointers & preferences ──────────────────────────────────────

    pub fn active_root(&self) -> Result<Option<String>, CoreError> {
        self.load(StorageKey::ActiveRoot)
    }

    pub fn set_active_root(&self, root: &str) -> Result<(), CoreError> {
        self.save(StorageKey::ActiveRoot, root)
    }

    pub fn active_profile(&self) -> Result<Option<String>, CoreError> {
        self.load(StorageKey::ActiveProfile)
    }

    pub fn set_active_profile(&self, profile: Option<&str>) -> Result<(), CoreError> {
        match profile {
            Some(profile) => self.save(StorageKey::ActiveProfile, profile),
            None => self.remove(StorageKey::ActiveProfile),
        }
    }

    pub fn theme(&self) -> Result<Theme, CoreError> {
        Ok(self.load(StorageKey::Theme)?.unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), CoreError> {
        self.save(StorageKey::Theme, &theme)
    }

    pub fn clear_all(&self) -> Result<(), CoreError> {
        self.store.clear()
    }
}
