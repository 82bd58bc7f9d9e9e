use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Symbols seeded into a brand new profile.
pub const SEED_SYMBOLS: &[&str] = &["XAUUSD", "EURUSD", "GBPUSD", "USDJPY"];

/// Stop-type labels seeded into a brand new profile.
pub const SEED_STOPS: &[&str] = &["Fake Break", "Break of Structure"];

/// Stop-type label retired from the preset list; purged on every profile load.
pub const LEGACY_STOP_LABEL: &str = "Time Stop";

/// The six quick-select lists a profile carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetKind {
    Symbols,
    Stops,
    Timeframes,
    Risks,
    RiskRewards,
    Notes,
}

impl PresetKind {
    pub const ALL: [PresetKind; 6] = [
        PresetKind::Symbols,
        PresetKind::Stops,
        PresetKind::Timeframes,
        PresetKind::Risks,
        PresetKind::RiskRewards,
        PresetKind::Notes,
    ];

    /// Values filled in when the list is absent at profile load.
    pub fn defaults(&self) -> &'static [&'static str] {
        match self {
            PresetKind::Symbols => &["XAUUSD", "EURUSD"],
            PresetKind::Stops => SEED_STOPS,
            PresetKind::Timeframes => &["15s", "1m", "5m"],
            PresetKind::Risks => &["1", "2"],
            PresetKind::RiskRewards => &["1:2", "1:3"],
            PresetKind::Notes => &["Entered too early", "Moved stop loss"],
        }
    }

    /// Normalize a user-entered value for this list. Only symbols change case.
    pub fn normalize(&self, value: &str) -> String {
        let trimmed = value.trim();
        match self {
            PresetKind::Symbols => trimmed.to_uppercase(),
            _ => trimmed.to_string(),
        }
    }
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PresetKind::Symbols => "symbol",
            PresetKind::Stops => "stop type",
            PresetKind::Timeframes => "timeframe",
            PresetKind::Risks => "risk",
            PresetKind::RiskRewards => "risk:reward",
            PresetKind::Notes => "note",
        };
        f.write_str(label)
    }
}

/// Per-profile preset lists.
///
/// A list that was never stored is `None`; `PresetService::ensure_defaults`
/// fills those in when the profile is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_presets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_presets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rr_presets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_presets: Option<Vec<String>>,
}

impl ProfileSettings {
    /// Settings written when a profile is created.
    pub fn seeded() -> Self {
        Self {
            symbols: Some(SEED_SYMBOLS.iter().map(|s| s.to_string()).collect()),
            stops: Some(SEED_STOPS.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Get a preset list, or an empty slice if it was never stored.
    pub fn list(&self, kind: PresetKind) -> &[String] {
        self.slot(kind).as_deref().unwrap_or(&[])
    }

    pub(crate) fn slot(&self, kind: PresetKind) -> &Option<Vec<String>> {
        match kind {
            PresetKind::Symbols => &self.symbols,
            PresetKind::Stops => &self.stops,
            PresetKind::Timeframes => &self.timeframe_presets,
            PresetKind::Risks => &self.risk_presets,
            PresetKind::RiskRewards => &self.rr_presets,
            PresetKind::Notes => &self.mistake_presets,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: PresetKind) -> &mut Option<Vec<String>> {
        match kind {
            PresetKind::Symbols => &mut self.symbols,
            PresetKind::Stops => &mut self.stops,
            PresetKind::Timeframes => &mut self.timeframe_presets,
            PresetKind::Risks => &mut self.risk_presets,
            PresetKind::RiskRewards => &mut self.rr_presets,
            PresetKind::Notes => &mut self.mistake_presets,
        }
    }
}

/// The `settings.json` document written to the directory mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorSettings {
    pub profile_name: String,

    #[serde(flatten)]
    pub settings: ProfileSettings,

    pub created_at: DateTime<Utc>,
}

/// Global color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}
