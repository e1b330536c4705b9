//! Collaborator traits for question delivery, stats persistence, and results display.
//!
//! These async traits are implemented by the `mockexam-providers` crate and
//! by hosts such as the CLI. The session engine itself depends only on the
//! traits, never on a concrete store.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Question, Subject};
use crate::palette::QuestionStatus;
use crate::report::SessionReport;
use crate::scoring::PracticeResults;
use crate::session::PendingAction;
use crate::stats::UserStats;

/// Default number of questions drawn for a session.
pub const DEFAULT_QUESTION_COUNT: usize = 30;

// ---------------------------------------------------------------------------
// Question supply
// ---------------------------------------------------------------------------

/// Source of questions for a session.
#[async_trait]
pub trait QuestionSupply: Send + Sync {
    /// Human-readable supply name (e.g. "toml").
    fn name(&self) -> &str;

    /// Draw an ordered question list for a new session.
    ///
    /// Returns fewer than `request.count` questions when the pool is smaller,
    /// and an error when nothing matches.
    async fn fetch(&self, request: &SupplyRequest) -> anyhow::Result<Vec<Question>>;

    /// Subjects this supply has questions for.
    async fn subjects(&self) -> anyhow::Result<Vec<Subject>>;
}

/// What to draw from a [`QuestionSupply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRequest {
    pub subject: Subject,
    #[serde(default = "default_count")]
    pub count: usize,
    /// Only questions from this exam year.
    #[serde(default)]
    pub year: Option<String>,
    /// Randomize selection and order.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Seed for reproducible shuffles.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

fn default_true() -> bool {
    true
}

impl SupplyRequest {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            count: DEFAULT_QUESTION_COUNT,
            year: None,
            shuffle: true,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats store
// ---------------------------------------------------------------------------

/// External store of cumulative [`UserStats`].
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Current stats for `user`, default if none recorded.
    async fn load(&self, user: &str) -> anyhow::Result<UserStats>;

    /// Additively fold one submitted session into the stored record.
    async fn merge(
        &self,
        user: &str,
        results: &PracticeResults,
        today: NaiveDate,
    ) -> anyhow::Result<UserStats>;
}

// ---------------------------------------------------------------------------
// Results display
// ---------------------------------------------------------------------------

/// Receiver of the final report once a session is submitted.
#[async_trait]
pub trait ResultsDisplay: Send + Sync {
    async fn show(&self, report: &SessionReport) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Session observer
// ---------------------------------------------------------------------------

/// What the host needs to redraw after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    pub position: usize,
    pub total: usize,
    pub question: &'a Question,
    pub selected: Option<usize>,
    pub marked: bool,
    pub time_remaining: u64,
    pub pending: Option<PendingAction>,
    pub palette: Vec<QuestionStatus>,
}

/// Receives session events for rendering.
pub trait SessionObserver: Send + Sync {
    /// State changed after an accepted command.
    fn on_update(&self, view: &SessionView<'_>);

    /// One second elapsed.
    fn on_tick(&self, time_remaining: u64);

    /// A command was refused.
    fn on_rejected(&self, reason: &str);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_update(&self, _view: &SessionView<'_>) {}
    fn on_tick(&self, _time_remaining: u64) {}
    fn on_rejected(&self, _reason: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_request_defaults() {
        let req: SupplyRequest = toml::from_str(r#"subject = "botany""#).unwrap();
        assert_eq!(req, SupplyRequest::new(Subject::Botany));
        assert_eq!(req.count, 30);
        assert!(req.shuffle);
    }
}
