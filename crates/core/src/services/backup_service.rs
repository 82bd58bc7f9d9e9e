use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::backup::BackupDocument;
use crate::models::journal::JournalEntry;
use crate::models::settings::ProfileSettings;

/// Standalone JSON backup export and import.
pub struct BackupService;

impl BackupService {
    pub fn new() -> Self {
        Self
    }

    pub fn export(
        &self,
        root: &str,
        profile: &str,
        journals: &[JournalEntry],
        settings: &ProfileSettings,
        now: DateTime<Utc>,
    ) -> Result<String, CoreError> {
        let document = BackupDocument {
            profile: profile.to_string(),
            storage_root_ref: root.to_string(),
            journals: journals.to_vec(),
            settings: Some(settings.clone()),
            export_date: now,
        };
        serde_json::to_string_pretty(&document)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize backup: {e}")))
    }

    pub fn parse(&self, json: &str) -> Result<BackupDocument, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Not a valid backup file: {e}")))
    }

    /// Download name for an export, e.g. `journal-backup-Alice-1718000000000.json`.
    pub fn file_name(&self, profile: &str, now: DateTime<Utc>) -> String {
        format!("journal-backup-{profile}-{}.json", now.timestamp_millis())
    }
}

impl Default for BackupService {
    fn default() -> Self {
        Self::new()
    }
}
