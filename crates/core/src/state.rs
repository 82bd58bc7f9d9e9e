use crate::models::journal::JournalEntry;
use crate::models::settings::ProfileSettings;
use crate::models::view::SortState;

/// Everything the journal holds in memory for the current session.
///
/// Initialised when a storage root is chosen, reset whenever the active
/// profile changes. Only `TradingJournal` mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub storage_root: Option<String>,
    pub profiles: Vec<String>,
    pub current_profile: Option<String>,
    pub settings: ProfileSettings,
    pub journals: Vec<JournalEntry>,
    pub custom_order: Option<Vec<i64>>,
    pub sort: SortState,
}

impl AppState {
    /// Drop everything that belongs to the active profile.
    pub fn reset_profile(&mut self) {
        self.current_profile = None;
        self.settings = ProfileSettings::default();
        self.journals.clear();
        self.custom_order = None;
        self.sort.clear();
    }
}
