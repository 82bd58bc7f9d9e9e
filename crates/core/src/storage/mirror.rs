use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::CoreError;
use crate::models::journal::JournalEntry;
use crate::models::settings::MirrorSettings;

pub const SETTINGS_FILE: &str = "settings.json";
pub const JOURNALS_FILE: &str = "journals.json";
pub const README_FILE: &str = "README.txt";

/// Best-effort secondary sink for profile data.
///
/// The mirror is write-behind only: the primary store stays the source of
/// truth and nothing in the main flow reads back from here.
#[async_trait]
pub trait DirectoryMirror: Send + Sync {
    /// Human-readable name of this mirror (for logs).
    fn name(&self) -> &str;

    /// Create the per-profile directory with seed settings, an empty
    /// journal list and a readme.
    async fn provision_profile(&self, profile: &str, settings: &MirrorSettings) -> Result<(), CoreError>;

    async fn write_settings(&self, profile: &str, settings: &MirrorSettings) -> Result<(), CoreError>;

    async fn write_journals(&self, profile: &str, journals: &[JournalEntry]) -> Result<(), CoreError>;

    async fn remove_profile(&self, profile: &str) -> Result<(), CoreError>;

    /// Read back a mirrored journal list, if one exists.
    async fn read_journals(&self, profile: &str) -> Result<Option<Vec<JournalEntry>>, CoreError>;
}

/// Mirror into a user-chosen directory: one subdirectory per profile.
#[derive(Debug, Clone)]
pub struct FsDirectoryMirror {
    root: PathBuf,
}

impl FsDirectoryMirror {
    /// Attach to an existing, writable directory.
    ///
    /// Returns `CoreError::StorageUnavailable` when the directory is missing,
    /// is not a directory, or is read-only.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        let metadata = std::fs::metadata(&root).map_err(|e| {
            CoreError::StorageUnavailable(format!("{}: {e}", root.display()))
        })?;
        if !metadata.is_dir() {
            return Err(CoreError::StorageUnavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(CoreError::StorageUnavailable(format!(
                "{} is read-only",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Directory for a profile. Names that would escape the mirror root are refused.
    pub fn profile_dir(&self, profile: &str) -> Result<PathBuf, CoreError> {
        let mut components = Path::new(profile).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(profile)),
            _ => Err(CoreError::FileIO(format!(
                "Profile name '{profile}' cannot be used as a directory name"
            ))),
        }
    }

    async fn write_json<T: serde::Serialize + ?Sized>(&self, profile: &str, file: &str, value: &T) -> Result<(), CoreError> {
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {file}: {e}")))?;
        self.write_file(profile, file, body).await
    }

    /// Replace `file` in the profile directory through a temp file, so
    /// readers never see a partial write.
    async fn write_file(&self, profile: &str, file: &str, body: String) -> Result<(), CoreError> {
        let dir = self.profile_dir(profile)?;
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(file);
        let tmp = dir.join(format!("{file}.tmp"));
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryMirror for FsDirectoryMirror {
    fn name(&self) -> &str {
        "directory"
    }

    async fn provision_profile(&self, profile: &str, settings: &MirrorSettings) -> Result<(), CoreError> {
        self.write_json(profile, SETTINGS_FILE, settings).await?;
        self.write_json(profile, JOURNALS_FILE, &Vec::<JournalEntry>::new()).await?;

        let readme = format!(
            "Profile: {profile}\nCreated: {}\n\nThis folder holds the trading journal data for this profile.\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        );
        self.write_file(profile, README_FILE, readme).await
    }

    async fn write_settings(&self, profile: &str, settings: &MirrorSettings) -> Result<(), CoreError> {
        self.write_json(profile, SETTINGS_FILE, settings).await
    }

    async fn write_journals(&self, profile: &str, journals: &[JournalEntry]) -> Result<(), CoreError> {
        self.write_json(profile, JOURNALS_FILE, journals).await
    }

    async fn remove_profile(&self, profile: &str) -> Result<(), CoreError> {
        let dir = self.profile_dir(profile)?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_journals(&self, profile: &str) -> Result<Option<Vec<JournalEntry>>, CoreError> {
        let path = self.profile_dir(profile)?.join(JOURNALS_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
