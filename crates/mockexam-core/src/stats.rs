//! Cumulative per-user practice statistics.
//!
//! Stats are merged additively once per submitted session; an exited session
//! never touches them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::PracticeResults;

/// Aggregate counters for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Questions answered correctly, across all sessions.
    #[serde(default)]
    pub solved: u64,
    /// Questions attempted, across all sessions.
    #[serde(default)]
    pub attempts: u64,
    /// Consecutive UTC days with at least one submitted session.
    #[serde(default)]
    pub streak: u32,
    /// Day of the most recent submitted session.
    #[serde(default)]
    pub last_active: Option<NaiveDate>,
    /// Number of submitted sessions.
    #[serde(default)]
    pub sessions: u64,
}

impl UserStats {
    /// Fold one submitted session into the counters.
    pub fn merge(&mut self, results: &PracticeResults, today: NaiveDate) {
        self.solved += u64::from(results.correct);
        self.attempts += u64::from(results.attempted);
        self.sessions += 1;

        self.streak = match self.last_active {
            Some(last) if last == today => self.streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.streak + 1,
            // A clock that moved backwards keeps the streak alive.
            Some(last) if last > today => self.streak.max(1),
            _ => 1,
        };
        match self.last_active {
            Some(last) if last >= today => {}
            _ => self.last_active = Some(today),
        }
    }

    /// Percentage of attempted questions that were solved, 0 if none.
    pub fn accuracy_percent(&self) -> u32 {
        if self.attempts == 0 {
            return 0;
        }
        ((self.solved as f64 / self.attempts as f64) * 100.0).round() as u32
    }
}
