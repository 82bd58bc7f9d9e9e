use crate::errors::CoreError;
use crate::models::settings::ProfileSettings;
use crate::storage::manager::StorageManager;

/// Manages the ordered profile registry of a storage root.
pub struct ProfileService;

impl ProfileService {
    pub fn new() -> Self {
        Self
    }

    /// Profile names of `root`, in creation order. Empty if none persisted.
    pub fn list(&self, storage: &StorageManager, root: &str) -> Result<Vec<String>, CoreError> {
        storage.load_profiles(root)
    }

    /// Register a new profile and write its seed settings.
    ///
    /// On a duplicate name nothing is written.
    pub fn create(
        &self,
        storage: &StorageManager,
        root: &str,
        profiles: &mut Vec<String>,
        name: &str,
    ) -> Result<(String, ProfileSettings), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::MissingInput("profile name"));
        }
        if profiles.iter().any(|p| p == name) {
            return Err(CoreError::DuplicateName(name.to_string()));
        }

        // Settings first: an unlisted settings key is never read.
        let settings = ProfileSettings::seeded();
        storage.save_settings(root, name, &settings)?;

        let mut updated = profiles.clone();
        updated.push(name.to_string());
        storage.save_profiles(root, &updated)?;

        *profiles = updated;
        tracing::info!(root, profile = name, "profile created");
        Ok((name.to_string(), settings))
    }

    /// Remove a profile from the registry and discard all of its data.
    ///
    /// Data goes first and the registry last. If the registry write fails the
    /// name stays listed (in `profiles` and in the store) and loads as an
    /// empty profile.
    pub fn delete(
        &self,
        storage: &StorageManager,
        root: &str,
        profiles: &mut Vec<String>,
        name: &str,
    ) -> Result<(), CoreError> {
        if !profiles.iter().any(|p| p == name) {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        }

        storage.remove_profile_data(root, name)?;
        let updated: Vec<String> = profiles.iter().filter(|p| *p != name).cloned().collect();
        storage.save_profiles(root, &updated)?;

        *profiles = updated;
        tracing::info!(root, profile = name, "profile deleted");
        Ok(())
    }
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new()
    }
}
