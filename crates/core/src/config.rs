use std::path::PathBuf;

/// Environment variable naming the primary store file.
pub const DATA_FILE_VAR: &str = "TRADING_JOURNAL_DATA_FILE";

/// Environment variable naming the optional mirror directory.
pub const MIRROR_DIR_VAR: &str = "TRADING_JOURNAL_MIRROR_DIR";

/// Where the journal keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// File backing the primary key-value store
    pub data_file: PathBuf,

    /// Directory the journal mirrors profile files into, if granted
    pub mirror_dir: Option<PathBuf>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("trading-journal.tjkv"),
            mirror_dir: None,
        }
    }
}

impl JournalConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            data_file: var(DATA_FILE_VAR).map(PathBuf::from).unwrap_or(defaults.data_file),
            mirror_dir: var(MIRROR_DIR_VAR).map(PathBuf::from),
        }
    }
}
