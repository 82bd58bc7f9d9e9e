use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::errors::CoreError;
use crate::models::journal::JournalEntry;
use crate::models::view::{ListFilter, SortColumn, SortState};

/// Filtering, sorting and custom ordering of the journal list.
pub struct ListService;

impl ListService {
    pub fn new() -> Self {
        Self
    }

    /// Entries in display order with `filter` applied.
    ///
    /// Order precedence: active sort column, then the custom order, then the
    /// natural list order (newest first).
    pub fn visible<'a>(
        &self,
        journals: &'a [JournalEntry],
        custom_order: Option<&[i64]>,
        sort: &SortState,
        filter: &ListFilter,
    ) -> Vec<&'a JournalEntry> {
        let mut entries = match (sort.column, custom_order) {
            (None, Some(order)) => self.apply_custom_order(journals, order),
            _ => journals.iter().collect(),
        };
        if let Some(column) = sort.column {
            self.sort(&mut entries, column, sort.ascending);
        }
        entries.retain(|j| self.matches(j, filter));
        entries
    }

    /// Whether an entry satisfies every active predicate of `filter`.
    pub fn matches(&self, entry: &JournalEntry, filter: &ListFilter) -> bool {
        if filter.outcome.is_some_and(|o| o != entry.outcome) {
            return false;
        }
        if filter.direction.is_some_and(|d| d != entry.direction) {
            return false;
        }
        if filter.followed_plan.is_some_and(|a| a != entry.followed_plan) {
            return false;
        }
        if let Some(stop) = filter.stop_type.as_deref() {
            if stop != entry.stop_type {
                return false;
            }
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&entry.symbol, &entry.comment, &entry.mistake]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Stable single-column sort.
    pub fn sort(&self, entries: &mut [&JournalEntry], column: SortColumn, ascending: bool) {
        entries.sort_by(|a, b| {
            let ordering = Self::compare(a, b, column);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    /// Arrange entries by `order`. Ids missing from `order` follow in natural
    /// order; ids in `order` with no entry are skipped.
    pub fn apply_custom_order<'a>(&self, journals: &'a [JournalEntry], order: &[i64]) -> Vec<&'a JournalEntry> {
        let by_id: HashMap<i64, &JournalEntry> = journals.iter().map(|j| (j.id, j)).collect();
        let mut placed = HashSet::with_capacity(order.len());
        let mut result: Vec<&JournalEntry> = order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .filter(|j| placed.insert(j.id))
            .collect();
        result.extend(journals.iter().filter(|j| !placed.contains(&j.id)));
        result
    }

    /// Check a trial order covers exactly the live journal ids: same length,
    /// no duplicates, nothing missing, nothing foreign.
    pub fn verify_order(&self, journals: &[JournalEntry], trial: &[i64]) -> Result<(), CoreError> {
        if trial.len() != journals.len() {
            return Err(CoreError::ReorderIntegrity(format!(
                "expected {} ids, got {}",
                journals.len(),
                trial.len()
            )));
        }

        let live: HashSet<i64> = journals.iter().map(|j| j.id).collect();
        let mut seen = HashSet::with_capacity(trial.len());
        for id in trial {
            if !live.contains(id) {
                return Err(CoreError::ReorderIntegrity(format!("unknown id {id}")));
            }
            if !seen.insert(*id) {
                return Err(CoreError::ReorderIntegrity(format!("duplicate id {id}")));
            }
        }
        Ok(())
    }

    /// Trial order produced by dragging `id` to `new_index` within `current`.
    /// `new_index` is clamped to the end of the list.
    pub fn move_id(&self, current: &[i64], id: i64, new_index: usize) -> Result<Vec<i64>, CoreError> {
        let from = current
            .iter()
            .position(|&x| x == id)
            .ok_or(CoreError::JournalNotFound(id))?;
        let mut order = current.to_vec();
        let moved = order.remove(from);
        order.insert(new_index.min(order.len()), moved);
        Ok(order)
    }

    fn compare(a: &JournalEntry, b: &JournalEntry, column: SortColumn) -> Ordering {
        if column.is_numeric() {
            return Self::numeric_key(a, column).total_cmp(&Self::numeric_key(b, column));
        }
        match column {
            SortColumn::Risk | SortColumn::Quality => Ordering::Equal,
            // Dates are display strings; lexicographic order is kept as-is.
            SortColumn::TradeDate => (&a.trade_date, &a.trade_time).cmp(&(&b.trade_date, &b.trade_time)),
            SortColumn::Symbol => a.symbol.cmp(&b.symbol),
            SortColumn::Direction => a.direction.to_string().cmp(&b.direction.to_string()),
            SortColumn::Outcome => a.outcome.to_string().cmp(&b.outcome.to_string()),
            SortColumn::RiskReward => a.risk_reward.cmp(&b.risk_reward),
            SortColumn::Timeframe => a.timeframe.cmp(&b.timeframe),
            SortColumn::Session => a.session.cmp(&b.session),
            SortColumn::StopType => a.stop_type.cmp(&b.stop_type),
            SortColumn::Emotion => a.emotion.cmp(&b.emotion),
        }
    }

    /// Unparseable risk values sort as zero.
    fn numeric_key(entry: &JournalEntry, column: SortColumn) -> f64 {
        match column {
            SortColumn::Quality => f64::from(entry.quality),
            _ => entry.risk.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        }
    }
}

impl Default for ListService {
    fn default() -> Self {
        Self::new()
    }
}
