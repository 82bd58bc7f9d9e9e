use serde_json::json;

/// Every key the journal writes to the primary store.
///
/// Keys render as JSON arrays (`["journals","db","Alice"]`), which keeps
/// them injective: no root or profile name can make two different keys
/// collide, whatever characters it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey<'a> {
    /// Ordered profile names of a storage root
    Profiles { root: &'a str },
    /// Preset lists of one profile
    Settings { root: &'a str, profile: &'a str },
    /// Full journal list of one profile
    Journals { root: &'a str, profile: &'a str },
    /// Custom display order of one profile
    CustomOrder { root: &'a str, profile: &'a str },
    /// Snapshot taken before the last custom order commit
    ReorderBackup { root: &'a str, profile: &'a str },
    ActiveRoot,
    ActiveProfile,
    Theme,
}

impl StorageKey<'_> {
    pub fn render(&self) -> String {
        match self {
            StorageKey::Profiles { root } => json!(["profiles", root]),
            StorageKey::Settings { root, profile } => json!(["settings", root, profile]),
            StorageKey::Journals { root, profile } => json!(["journals", root, profile]),
            StorageKey::CustomOrder { root, profile } => json!(["customOrder", root, profile]),
            StorageKey::ReorderBackup { root, profile } => {
                json!(["reorderBackup", root, profile])
            }
            StorageKey::ActiveRoot => json!(["activeRoot"]),
            StorageKey::ActiveProfile => json!(["activeProfile"]),
            StorageKey::Theme => json!(["theme"]),
        }
        .to_string()
    }

    /// Per-profile keys, in the order they are removed when a profile is deleted.
    pub fn profile_scoped<'a>(root: &'a str, profile: &'a str) -> [StorageKey<'a>; 4] {
        [
            StorageKey::Settings { root, profile },
            StorageKey::Journals { root, profile },
            StorageKey::CustomOrder { root, profile },
            StorageKey::ReorderBackup { root, profile },
        ]
    }
}

impl std::fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
