//! Core data model types for mockexam.
//!
//! Questions are immutable once a session starts; a session only ever holds a
//! frozen, read-only list of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestionError;

/// Number of options every question in a published bank is expected to carry.
pub const STANDARD_OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable, opaque identifier.
    pub id: String,
    /// The question text shown to the candidate.
    pub prompt: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct_option: usize,
    /// Exam year the question appeared in, if known.
    #[serde(default)]
    pub year: Option<String>,
    /// How the question is presented.
    #[serde(default)]
    pub category: QuestionCategory,
    /// Free-form tags (chapter, concept, ...).
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Question {
    /// Check the structural invariants a session relies on.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt {
                id: self.id.clone(),
            });
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id: self.id.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_option >= self.options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                id: self.id.clone(),
                index: self.correct_option,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

/// Presentation category of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    #[default]
    Textual,
    Numerical,
    Image,
}

/// Exam subjects a question bank can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Physics,
    Chemistry,
    Botany,
    Zoology,
}

impl Subject {
    /// All subjects, in display order.
    pub const ALL: [Subject; 4] = [
        Subject::Physics,
        Subject::Chemistry,
        Subject::Botany,
        Subject::Zoology,
    ];
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Physics => write!(f, "physics"),
            Subject::Chemistry => write!(f, "chemistry"),
            Subject::Botany => write!(f, "botany"),
            Subject::Zoology => write!(f, "zoology"),
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "physics" => Ok(Subject::Physics),
            "chemistry" => Ok(Subject::Chemistry),
            "botany" => Ok(Subject::Botany),
            "zoology" => Ok(Subject::Zoology),
            other => Err(format!("unknown subject: {other}")),
        }
    }
}

/// A named collection of questions for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Subject every question in the bank belongs to.
    pub subject: Subject,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions in this bank.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Distinct years present in the bank, sorted.
    pub fn years(&self) -> Vec<String> {
        let mut years: Vec<String> = self
            .questions
            .iter()
            .filter_map(|q| q.year.clone())
            .collect();
        years.sort();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            id: "q-1".into(),
            prompt: "Which organelle is the powerhouse of the cell?".into(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_option: correct,
            year: None,
            category: QuestionCategory::default(),
            tags: vec![],
        }
    }

    #[test]
    fn subject_display_and_parse() {
        assert_eq!(Subject::Botany.to_string(), "botany");
        assert_eq!("Zoology".parse::<Subject>().unwrap(), Subject::Zoology);
        assert_eq!(" physics ".parse::<Subject>().unwrap(), Subject::Physics);
        assert!("biology".parse::<Subject>().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_question() {
        assert!(question(4, 3).validate().is_ok());
        assert!(question(2, 0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let err = question(4, 4).validate().unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectOptionOutOfRange { index: 4, options: 4, .. }
        ));
    }

    #[test]
    fn validate_rejects_single_option() {
        assert!(matches!(
            question(1, 0).validate(),
            Err(QuestionError::TooFewOptions { count: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_prompt() {
        let mut q = question(4, 0);
        q.prompt = "   ".into();
        assert!(matches!(q.validate(), Err(QuestionError::EmptyPrompt { .. })));
    }

    #[test]
    fn category_defaults_to_textual() {
        let json = r#"{"id":"a","prompt":"p","options":["x","y"],"correct_option":1}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.category, QuestionCategory::Textual);
        assert!(q.year.is_none());
    }
}
