use crate::errors::CoreError;
use crate::models::settings::{PresetKind, ProfileSettings, LEGACY_STOP_LABEL};

/// Rules for the per-profile quick-select lists.
///
/// Pure in-memory operations: callers decide when to persist, based on the
/// `bool` each method returns ("something changed").
pub struct PresetService;

impl PresetService {
    pub fn new() -> Self {
        Self
    }

    /// Append a value to a preset list.
    ///
    /// Whitespace-only input is ignored (`Ok(false)`). Symbols are uppercased
    /// before the duplicate check; every other list is case-sensitive.
    pub fn add(
        &self,
        settings: &mut ProfileSettings,
        kind: PresetKind,
        value: &str,
    ) -> Result<bool, CoreError> {
        let value = kind.normalize(value);
        if value.is_empty() {
            return Ok(false);
        }

        let list = settings
            .slot_mut(kind)
            .get_or_insert_with(|| Self::seed(kind));
        if list.contains(&value) {
            return Err(CoreError::DuplicatePreset { kind, value });
        }
        list.push(value);
        Ok(true)
    }

    /// Remove a value from a preset list. Returns whether it was present.
    pub fn remove(&self, settings: &mut ProfileSettings, kind: PresetKind, value: &str) -> bool {
        match settings.slot_mut(kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|v| v != value);
                list.len() != before
            }
            None => false,
        }
    }

    /// Fill every absent list with its default. Returns whether anything was filled.
    pub fn ensure_defaults(&self, settings: &mut ProfileSettings) -> bool {
        let mut changed = false;
        for kind in PresetKind::ALL {
            let slot = settings.slot_mut(kind);
            if slot.is_none() {
                *slot = Some(Self::seed(kind));
                changed = true;
            }
        }
        changed
    }

    /// Purge the retired stop label. Idempotent: returns `false` when the
    /// label was already gone.
    pub fn migrate_legacy_stops(&self, settings: &mut ProfileSettings) -> bool {
        self.remove(settings, PresetKind::Stops, LEGACY_STOP_LABEL)
    }

    fn seed(kind: PresetKind) -> Vec<String> {
        kind.defaults().iter().map(|s| s.to_string()).collect()
    }
}

impl Default for PresetService {
    fn default() -> Self {
        Self::new()
    }
}
