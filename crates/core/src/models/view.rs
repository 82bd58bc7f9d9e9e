use serde::{Deserialize, Serialize};

use super::journal::{Answer, Direction, Outcome};

/// Active list filters. Every predicate is optional; set ones are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFilter {
    pub outcome: Option<Outcome>,
    pub direction: Option<Direction>,
    pub stop_type: Option<String>,
    pub followed_plan: Option<Answer>,
    /// Case-insensitive substring matched against symbol, comment and mistake
    pub search: Option<String>,
}

impl ListFilter {
    pub fn is_empty(&self) -> bool {
        self.outcome.is_none()
            && self.direction.is_none()
            && self.stop_type.is_none()
            && self.followed_plan.is_none()
            && self.search.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    TradeDate,
    Symbol,
    Direction,
    Outcome,
    Risk,
    RiskReward,
    Timeframe,
    Session,
    StopType,
    Quality,
    Emotion,
}

impl SortColumn {
    /// Risk and quality compare as numbers; everything else as text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, SortColumn::Risk | SortColumn::Quality)
    }
}

/// Current single-column sort, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub ascending: bool,
}

impl SortState {
    /// Same column flips the direction; a new column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
