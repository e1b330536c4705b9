//! mockexam-core: Timed exam session engine, scoring, and question model.
//!
//! This crate defines the question data model, the session state machine
//! that a host UI drives, and the deterministic scoring that turns a finished
//! session into a results summary.

pub mod error;
pub mod model;
pub mod palette;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod time;
pub mod traits;

pub use error::{QuestionError, SessionError};
pub use model::{Question, QuestionBank, Subject};
pub use scoring::{PracticeResults, ScoringScheme};
pub use session::{Command, Phase, Session, SessionConfig, SessionOutcome};
