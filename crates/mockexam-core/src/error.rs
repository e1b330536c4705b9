//! Session and question error types.
//!
//! Every variant describes a rejected operation; none of them leave a
//! session in a partially mutated state.

use thiserror::Error;

use crate::session::{PendingAction, Phase};

/// A question record that cannot be used in a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// The prompt is empty or whitespace.
    #[error("question {id}: prompt is empty")]
    EmptyPrompt { id: String },

    /// Fewer than two options.
    #[error("question {id}: needs at least 2 options, found {count}")]
    TooFewOptions { id: String, count: usize },

    /// The designated answer does not index into the options.
    #[error("question {id}: correct option {index} is out of range for {options} options")]
    CorrectOptionOutOfRange {
        id: String,
        index: usize,
        options: usize,
    },
}

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A session cannot start without questions.
    #[error("cannot start a session with no questions")]
    EmptyQuestionSet,

    /// A session cannot start with no time on the clock.
    #[error("session duration must be at least one second")]
    ZeroDuration,

    /// One of the supplied questions is malformed.
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),

    /// The session already reached a terminal phase.
    #[error("session is {phase}, no further changes are accepted")]
    NotRunning { phase: Phase },

    /// A position outside `[0, total)`.
    #[error("position {position} is out of range (session has {total} questions)")]
    PositionOutOfRange { position: usize, total: usize },

    /// An option index the question does not have.
    #[error("option {option} is out of range for question {position} ({options} options)")]
    OptionOutOfRange {
        position: usize,
        option: usize,
        options: usize,
    },

    /// A confirmation dialog is open; it must be confirmed or cancelled first.
    #[error("a {0} confirmation is already pending")]
    ConfirmationPending(PendingAction),

    /// `confirm`/`cancel` without an open confirmation.
    #[error("nothing to confirm or cancel")]
    NoPendingConfirmation,
}

impl SessionError {
    /// Returns `true` if the session can never accept this kind of call again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionError::NotRunning { .. })
    }
}
