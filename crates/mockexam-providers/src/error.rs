//! Store error types.

use std::path::PathBuf;

use mockexam_core::model::Subject;
use thiserror::Error;

/// Errors that can occur when reading questions or stats.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No question matched the request.
    #[error("no {subject} questions available{}", .year.as_ref().map(|y| format!(" for year {y}")).unwrap_or_default())]
    NoQuestions {
        subject: Subject,
        year: Option<String>,
    },

    /// A stats file could not be read or written.
    #[error("stats file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stats file exists but does not hold valid JSON.
    #[error("stats file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_questions_message_mentions_year() {
        let err = StoreError::NoQuestions {
            subject: Subject::Physics,
            year: Some("2019".into()),
        };
        assert_eq!(err.to_string(), "no physics questions available for year 2019");

        let err = StoreError::NoQuestions {
            subject: Subject::Physics,
            year: None,
        };
        assert_eq!(err.to_string(), "no physics questions available");
    }
}
