use thiserror::Error;

use crate::models::journal::JournalField;
use crate::models::settings::PresetKind;

/// Unified error type for the entire trading-journal-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── User input ──────────────────────────────────────────────────
    #[error("Please provide a value for {field}")]
    Validation { field: JournalField },

    #[error("Please provide a {0}")]
    MissingInput(&'static str),

    #[error("A profile named '{0}' already exists")]
    DuplicateName(String),

    #[error("'{value}' is already in the {kind} list")]
    DuplicatePreset { kind: PresetKind, value: String },

    #[error("Custom order does not match the journal list: {0}")]
    ReorderIntegrity(String),

    // ── State ───────────────────────────────────────────────────────
    #[error("No storage root selected")]
    NoStorageRoot,

    #[error("No profile selected")]
    NoActiveProfile,

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Journal entry not found: {0}")]
    JournalNotFound(i64),

    #[error("No reorder backup available for this profile")]
    NoBackup,

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
