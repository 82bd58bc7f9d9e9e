use std::collections::HashMap;

use crate::models::journal::{JournalEntry, Outcome};
use crate::models::stats::{Breakdown, DashboardStats};

/// Computes dashboard statistics. Nothing is cached: every call is a fresh
/// pass over the journal list.
pub struct StatsService;

impl StatsService {
    pub fn new() -> Self {
        Self
    }

    pub fn dashboard(&self, journals: &[JournalEntry]) -> DashboardStats {
        let total = journals.len();
        let wins = journals.iter().filter(|j| j.outcome == Outcome::TakeProfit).count();
        let losses = journals.iter().filter(|j| j.outcome == Outcome::StopLoss).count();

        DashboardStats {
            total,
            wins,
            losses,
            win_rate: Self::rate(wins, total),
            by_symbol: self.breakdown(journals, |j| &j.symbol, true),
            by_session: self.breakdown(journals, |j| &j.session, false),
            by_timeframe: self.breakdown(journals, |j| &j.timeframe, false),
        }
    }

    /// Group by `label`, keeping groups in order of first appearance.
    pub fn breakdown<F>(&self, journals: &[JournalEntry], label: F, track_losses: bool) -> Vec<Breakdown>
    where
        F: Fn(&JournalEntry) -> &String,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Breakdown> = Vec::new();

        for journal in journals {
            let key = label(journal).as_str();
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Breakdown {
                    label: key.to_string(),
                    total: 0,
                    wins: 0,
                    losses: track_losses.then_some(0),
                    rate: 0.0,
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.total += 1;
            match journal.outcome {
                Outcome::TakeProfit => group.wins += 1,
                Outcome::StopLoss => {
                    if let Some(losses) = group.losses.as_mut() {
                        *losses += 1;
                    }
                }
                Outcome::BreakEven => {}
            }
        }

        for group in &mut groups {
            group.rate = Self::rate(group.wins, group.total);
        }
        groups
    }

    /// Percentage of `part` in `total`; 0 when `total` is 0.
    pub fn rate(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64 * 100.0
        }
    }
}

impl Default for StatsService {
    fn default() -> Self {
        Self::new()
    }
}
