use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::journal::JournalEntry;
use super::settings::ProfileSettings;

/// Standalone backup export of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub profile: String,

    #[serde(alias = "dbPath")]
    pub storage_root_ref: String,

    #[serde(default)]
    pub journals: Vec<JournalEntry>,

    #[serde(default)]
    pub settings: Option<ProfileSettings>,

    pub export_date: DateTime<Utc>,
}

/// Snapshot taken right before a custom order is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBackup {
    pub journals: Vec<JournalEntry>,

    #[serde(default)]
    pub custom_order: Option<Vec<i64>>,

    pub created_at: DateTime<Utc>,
}
