use serde::{Deserialize, Serialize};

/// Win/loss counts for one symbol, session or timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub label: String,
    pub total: usize,
    pub wins: usize,
    /// Only tracked for the per-symbol breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub losses: Option<usize>,
    /// Wins as a percentage of total
    pub rate: f64,
}

/// Dashboard figures for the active profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage in `0.0..=100.0`; 0 when there are no entries
    pub win_rate: f64,
    pub by_symbol: Vec<Breakdown>,
    pub by_session: Vec<Breakdown>,
    pub by_timeframe: Vec<Breakdown>,
}
