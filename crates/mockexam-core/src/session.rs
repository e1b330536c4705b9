//! The timed session state machine.
//!
//! A [`Session`] owns all mutable state of one exam attempt: the current
//! position, the answer map, review marks, visited positions, the seconds left
//! on the clock, the phase, and at most one pending confirmation. Every
//! operation is checked here, so hosts cannot corrupt state by calling things
//! in the wrong order.
//!
//! ```text
//!             request_submit / request_exit
//!   RUNNING ─────────────────────────────────▶ RUNNING + pending
//!      ▲                                           │        │
//!      └──────────────── cancel ───────────────────┘        │ confirm
//!                                                           ▼
//!   RUNNING ── tick reaches 0 (pending dropped) ──▶ SUBMITTED / EXITED
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::Question;
use crate::palette::{PaletteSummary, QuestionStatus};
use crate::scoring::{self, PracticeResults, QuestionReview, ScoringScheme};

/// Default session length: 30 minutes.
pub const DEFAULT_DURATION_SECS: u64 = 30 * 60;

/// Below this many seconds the clock is shown as running low.
pub const LOW_TIME_THRESHOLD_SECS: u64 = 60;

/// Fixed parameters of a session, chosen at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub duration_secs: u64,
    #[serde(default)]
    pub scheme: ScoringScheme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            scheme: ScoringScheme::default(),
        }
    }
}

/// Lifecycle phase. `Submitted` and `Exited` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Running,
    Submitted,
    Exited,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Running => write!(f, "running"),
            Phase::Submitted => write!(f, "submitted"),
            Phase::Exited => write!(f, "exited"),
        }
    }
}

/// An action waiting on user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    Submit,
    Exit,
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Submit => write!(f, "submit"),
            PendingAction::Exit => write!(f, "exit"),
        }
    }
}

/// Confirmation sub-machine: nothing open, or exactly one pending action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    #[default]
    None,
    Pending(PendingAction),
}

/// Why a session reached `Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// The candidate confirmed a submit.
    Confirmed,
    /// The clock ran out.
    TimeExpired,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SessionOutcome {
    Submitted {
        results: PracticeResults,
        reason: SubmitReason,
    },
    Exited,
}

impl SessionOutcome {
    pub fn results(&self) -> Option<&PracticeResults> {
        match self {
            SessionOutcome::Submitted { results, .. } => Some(results),
            SessionOutcome::Exited => None,
        }
    }
}

/// A host request, one variant per user-facing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Command {
    Select { position: usize, option: usize },
    /// Select on whatever position is current when the command is applied.
    SelectCurrent { option: usize },
    Clear { position: usize },
    ClearCurrent,
    ToggleMark { position: usize },
    MarkAndNext,
    Goto { position: usize },
    Previous,
    SaveAndNext,
    RequestSubmit,
    RequestExit,
    Confirm,
    Cancel,
}

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    current_index: usize,
    answers: BTreeMap<usize, usize>,
    marked: BTreeSet<usize>,
    visited: BTreeSet<usize>,
    time_remaining: u64,
    phase: Phase,
    confirmation: Confirmation,
}

impl SessionState {
    fn new(duration_secs: u64) -> Self {
        Self {
            current_index: 0,
            answers: BTreeMap::new(),
            marked: BTreeSet::new(),
            visited: BTreeSet::from([0]),
            time_remaining: duration_secs,
            phase: Phase::Running,
            confirmation: Confirmation::None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn marked(&self) -> &BTreeSet<usize> {
        &self.marked
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn confirmation(&self) -> Confirmation {
        self.confirmation
    }
}

/// One timed attempt over a frozen question list.
pub struct Session {
    id: Uuid,
    questions: Arc<[Question]>,
    config: SessionConfig,
    state: SessionState,
    outcome: Option<SessionOutcome>,
}

impl Session {
    /// Start a session at position 0 with the full duration on the clock.
    pub fn start(
        questions: impl Into<Arc<[Question]>>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let questions = questions.into();
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        if config.duration_secs == 0 {
            return Err(SessionError::ZeroDuration);
        }
        for question in questions.iter() {
            question.validate()?;
        }

        let id = Uuid::new_v4();
        tracing::info!(
            session = %id,
            questions = questions.len(),
            duration_secs = config.duration_secs,
            "session started"
        );

        Ok(Self {
            id,
            state: SessionState::new(config.duration_secs),
            questions,
            config,
            outcome: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.state.current_index]
    }

    pub fn time_remaining(&self) -> u64 {
        self.state.time_remaining
    }

    pub fn is_time_low(&self) -> bool {
        self.state.time_remaining < LOW_TIME_THRESHOLD_SECS
    }

    pub fn is_last(&self) -> bool {
        self.state.current_index + 1 == self.questions.len()
    }

    pub fn pending(&self) -> Option<PendingAction> {
        match self.state.confirmation {
            Confirmation::None => None,
            Confirmation::Pending(action) => Some(action),
        }
    }

    /// The terminal outcome, once the session has ended.
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn results(&self) -> Option<&PracticeResults> {
        self.outcome.as_ref().and_then(SessionOutcome::results)
    }

    /// Per-position breakdown. Only available after submission.
    pub fn review(&self) -> Option<Vec<QuestionReview>> {
        self.results().map(|_| {
            scoring::review(&self.questions, &self.state.answers, &self.state.marked)
        })
    }

    /// Display status of `position`, or `None` if out of range.
    pub fn status(&self, position: usize) -> Option<QuestionStatus> {
        (position < self.questions.len()).then(|| {
            QuestionStatus::derive(
                position,
                &self.state.answers,
                &self.state.marked,
                &self.state.visited,
            )
        })
    }

    /// Status of every position, in order.
    pub fn palette(&self) -> Vec<QuestionStatus> {
        (0..self.questions.len())
            .map(|p| {
                QuestionStatus::derive(
                    p,
                    &self.state.answers,
                    &self.state.marked,
                    &self.state.visited,
                )
            })
            .collect()
    }

    pub fn palette_summary(&self) -> PaletteSummary {
        PaletteSummary::from_statuses(&self.palette())
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Route a host command to its operation.
    ///
    /// Returns the outcome when the command ended the session.
    pub fn apply(&mut self, command: Command) -> Result<Option<SessionOutcome>, SessionError> {
        match command {
            Command::Select { position, option } => self.select_option(position, option)?,
            Command::SelectCurrent { option } => {
                self.select_option(self.state.current_index, option)?
            }
            Command::Clear { position } => self.clear_answer(position)?,
            Command::ClearCurrent => self.clear_answer(self.state.current_index)?,
            Command::ToggleMark { position } => self.toggle_mark(position)?,
            Command::MarkAndNext => self.mark_and_next()?,
            Command::Goto { position } => self.navigate_to(position)?,
            Command::Previous => self.previous()?,
            Command::SaveAndNext => self.save_and_next()?,
            Command::RequestSubmit => self.request_submit()?,
            Command::RequestExit => self.request_exit()?,
            Command::Confirm => return self.confirm().map(Some),
            Command::Cancel => self.cancel()?,
        }
        Ok(None)
    }

    /// Record `option` as the answer at `position`, replacing any earlier one.
    pub fn select_option(&mut self, position: usize, option: usize) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let question = self.question_at(position)?;
        if option >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                position,
                option,
                options: question.options.len(),
            });
        }
        self.state.answers.insert(position, option);
        Ok(())
    }

    /// Remove the answer at `position`. Idempotent.
    pub fn clear_answer(&mut self, position: usize) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.question_at(position)?;
        self.state.answers.remove(&position);
        Ok(())
    }

    /// Flip the review mark at `position`.
    pub fn toggle_mark(&mut self, position: usize) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.question_at(position)?;
        if !self.state.marked.remove(&position) {
            self.state.marked.insert(position);
        }
        Ok(())
    }

    /// Toggle the mark on the current position, then move on unless it is the last one.
    pub fn mark_and_next(&mut self) -> Result<(), SessionError> {
        let current = self.state.current_index;
        self.toggle_mark(current)?;
        if !self.is_last() {
            self.move_to(current + 1);
        }
        Ok(())
    }

    /// Jump to `position` and record it as visited.
    pub fn navigate_to(&mut self, position: usize) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.question_at(position)?;
        self.move_to(position);
        Ok(())
    }

    /// Step back one position.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let current = self.state.current_index;
        if current == 0 {
            return Err(SessionError::PositionOutOfRange {
                position: 0,
                total: self.questions.len(),
            });
        }
        self.move_to(current - 1);
        Ok(())
    }

    /// Advance to the next position, or ask to submit when on the last one.
    pub fn save_and_next(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if self.is_last() {
            return self.request_submit();
        }
        self.move_to(self.state.current_index + 1);
        Ok(())
    }

    /// Open the submit confirmation.
    pub fn request_submit(&mut self) -> Result<(), SessionError> {
        self.request(PendingAction::Submit)
    }

    /// Open the exit confirmation.
    pub fn request_exit(&mut self) -> Result<(), SessionError> {
        self.request(PendingAction::Exit)
    }

    /// Carry out the pending action.
    pub fn confirm(&mut self) -> Result<SessionOutcome, SessionError> {
        self.ensure_running()?;
        match self.state.confirmation {
            Confirmation::None => Err(SessionError::NoPendingConfirmation),
            Confirmation::Pending(PendingAction::Submit) => {
                Ok(self.finish_submitted(SubmitReason::Confirmed))
            }
            Confirmation::Pending(PendingAction::Exit) => Ok(self.finish_exited()),
        }
    }

    /// Close the pending confirmation without effect.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.state.confirmation == Confirmation::None {
            return Err(SessionError::NoPendingConfirmation);
        }
        self.state.confirmation = Confirmation::None;
        Ok(())
    }

    /// One elapsed second.
    ///
    /// Ignored outside `Running`. When the clock reaches zero the session is
    /// submitted with whatever answers exist, and any pending confirmation is
    /// dropped.
    pub fn tick(&mut self) -> Option<SessionOutcome> {
        if !self.is_running() {
            return None;
        }
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining > 0 {
            return None;
        }
        if let Confirmation::Pending(action) = self.state.confirmation {
            tracing::debug!(session = %self.id, %action, "time expired, discarding pending confirmation");
        }
        Some(self.finish_submitted(SubmitReason::TimeExpired))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.state.phase {
            Phase::Running => Ok(()),
            phase => Err(SessionError::NotRunning { phase }),
        }
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        self.ensure_running()?;
        match self.state.confirmation {
            Confirmation::None => Ok(()),
            Confirmation::Pending(action) => Err(SessionError::ConfirmationPending(action)),
        }
    }

    fn question_at(&self, position: usize) -> Result<&Question, SessionError> {
        self.questions
            .get(position)
            .ok_or(SessionError::PositionOutOfRange {
                position,
                total: self.questions.len(),
            })
    }

    fn move_to(&mut self, position: usize) {
        self.state.current_index = position;
        self.state.visited.insert(position);
    }

    fn request(&mut self, action: PendingAction) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.state.confirmation = Confirmation::Pending(action);
        Ok(())
    }

    fn finish_submitted(&mut self, reason: SubmitReason) -> SessionOutcome {
        self.state.phase = Phase::Submitted;
        self.state.confirmation = Confirmation::None;

        let results = scoring::score(
            &self.questions,
            &self.state.answers,
            &self.config.scheme,
            self.config.duration_secs,
            self.state.time_remaining,
        );
        tracing::info!(
            session = %self.id,
            ?reason,
            score = results.score,
            correct = results.correct,
            wrong = results.wrong,
            unattempted = results.unattempted,
            "session submitted"
        );

        let outcome = SessionOutcome::Submitted { results, reason };
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn finish_exited(&mut self) -> SessionOutcome {
        self.state.phase = Phase::Exited;
        self.state.confirmation = Confirmation::None;
        tracing::info!(session = %self.id, "session exited without submitting");
        self.outcome = Some(SessionOutcome::Exited);
        SessionOutcome::Exited
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
