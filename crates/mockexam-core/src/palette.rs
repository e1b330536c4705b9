//! Question palette: the per-position status overview shown next to a question.
//!
//! Status is derived from session state on demand and never stored.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Display status of one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    NotVisited,
    /// Visited but left without an answer.
    VisitedEmpty,
    Answered,
    /// Marked for review, whether or not it is answered.
    Marked,
}

impl QuestionStatus {
    /// Derive the status of `position`. Marked wins over answered.
    pub fn derive(
        position: usize,
        answers: &BTreeMap<usize, usize>,
        marked: &BTreeSet<usize>,
        visited: &BTreeSet<usize>,
    ) -> Self {
        if marked.contains(&position) {
            QuestionStatus::Marked
        } else if answers.contains_key(&position) {
            QuestionStatus::Answered
        } else if visited.contains(&position) {
            QuestionStatus::VisitedEmpty
        } else {
            QuestionStatus::NotVisited
        }
    }

    /// Single-character glyph for compact terminal palettes.
    pub fn glyph(&self) -> char {
        match self {
            QuestionStatus::NotVisited => '.',
            QuestionStatus::VisitedEmpty => 'o',
            QuestionStatus::Answered => '*',
            QuestionStatus::Marked => '?',
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionStatus::NotVisited => write!(f, "not visited"),
            QuestionStatus::VisitedEmpty => write!(f, "not answered"),
            QuestionStatus::Answered => write!(f, "answered"),
            QuestionStatus::Marked => write!(f, "marked for review"),
        }
    }
}

/// Count of positions in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSummary {
    pub not_visited: usize,
    pub visited_empty: usize,
    pub answered: usize,
    pub marked: usize,
}

impl PaletteSummary {
    pub fn from_statuses(statuses: &[QuestionStatus]) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                QuestionStatus::NotVisited => summary.not_visited += 1,
                QuestionStatus::VisitedEmpty => summary.visited_empty += 1,
                QuestionStatus::Answered => summary.answered += 1,
                QuestionStatus::Marked => summary.marked += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.not_visited + self.visited_empty + self.answered + self.marked
    }
}
