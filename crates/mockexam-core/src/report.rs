//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Question, Subject};
use crate::scoring::{PracticeResults, QuestionReview};
use crate::session::{Session, SessionConfig, SessionOutcome, SubmitReason};

/// A complete record of one submitted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Where the questions came from.
    pub source: SourceSummary,
    /// Duration and marking scheme the session ran with.
    pub config: SessionConfig,
    /// Headline results.
    pub results: PracticeResults,
    /// How the session was submitted.
    pub submitted_by: SubmitReason,
    /// Per-position breakdown.
    pub breakdown: Vec<QuestionReview>,
    /// The frozen question list, in session order.
    pub questions: Vec<Question>,
}

/// Summary of the question source (without the questions themselves).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Name of the supply that provided the questions.
    pub supply: String,
    pub subject: Subject,
    #[serde(default)]
    pub year: Option<String>,
}

impl SessionReport {
    /// Build a report from a submitted session. `None` if the session has not been submitted.
    pub fn from_session(
        session: &Session,
        source: SourceSummary,
        created_at: DateTime<Utc>,
    ) -> Option<Self> {
        let (results, reason) = match session.outcome()? {
            SessionOutcome::Submitted { results, reason } => (results.clone(), *reason),
            SessionOutcome::Exited => return None,
        };

        Some(Self {
            id: session.id(),
            created_at,
            source,
            config: *session.config(),
            results,
            submitted_by: reason,
            breakdown: session.review()?,
            questions: session.questions().to_vec(),
        })
    }

    /// Conventional file stem for this report, e.g. `botany-20240501-101500-1a2b3c4d`.
    ///
    /// The trailing session-id prefix keeps reports from the same second apart.
    pub fn file_stem(&self) -> String {
        let id = self.id.simple().to_string();
        format!(
            "{}-{}-{}",
            self.source.subject,
            self.created_at.format("%Y%m%d-%H%M%S"),
            &id[..8]
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionCategory;
    use crate::scoring::AnswerOutcome;
    use crate::time::fixed_now;

    fn session() -> Session {
        let questions: Vec<Question> = (0..3)
            .map(|i| Question {
                id: format!("z{i}"),
                prompt: format!("zoology question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_option: 1,
                year: None,
                category: QuestionCategory::Textual,
                tags: vec![],
            })
            .collect();
        Session::start(
            questions,
            SessionConfig {
                duration_secs: 120,
                ..SessionConfig::default()
            },
        )
        .unwrap()
    }

    fn source() -> SourceSummary {
        SourceSummary {
            supply: "memory".into(),
            subject: Subject::Zoology,
            year: None,
        }
    }

    #[test]
    fn no_report_before_submission() {
        let s = session();
        assert!(SessionReport::from_session(&s, source(), fixed_now()).is_none());
    }

    #[test]
    fn no_report_after_exit() {
        let mut s = session();
        s.request_exit().unwrap();
        s.confirm().unwrap();
        assert!(SessionReport::from_session(&s, source(), fixed_now()).is_none());
    }

    #[test]
    fn report_carries_results_and_breakdown() {
        let mut s = session();
        s.select_option(0, 1).unwrap();
        s.select_option(2, 3).unwrap();
        s.tick();
        s.request_submit().unwrap();
        s.confirm().unwrap();

        let report = SessionReport::from_session(&s, source(), fixed_now()).unwrap();
        assert_eq!(report.id, s.id());
        assert_eq!(report.results.score, 3);
        assert_eq!(report.results.time_taken_secs, 1);
        assert_eq!(report.submitted_by, SubmitReason::Confirmed);
        assert_eq!(report.breakdown[1].outcome, AnswerOutcome::Unattempted);
        assert_eq!(report.breakdown[2].outcome, AnswerOutcome::Wrong);
        let id = s.id().simple().to_string();
        assert_eq!(
            report.file_stem(),
            format!("zoology-20231114-221320-{}", &id[..8])
        );
    }

    #[test]
    fn json_save_and_load() {
        let mut s = session();
        s.request_submit().unwrap();
        s.confirm().unwrap();
        let report = SessionReport::from_session(&s, source(), fixed_now()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("session.json");
        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results, report.results);
        assert_eq!(loaded.questions.len(), 3);
    }
}
