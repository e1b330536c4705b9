//! Cooperative event loop that drives one session to completion.
//!
//! The loop owns the [`Session`] and its [`Countdown`]. Host commands and
//! clock ticks are applied one at a time, so the session never sees two
//! mutations at once.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use mockexam_core::report::{SessionReport, SourceSummary};
use mockexam_core::session::{Command, Session, SessionOutcome};
use mockexam_core::stats::UserStats;
use mockexam_core::time::TimeSource;
use mockexam_core::traits::{
    NoopObserver, ResultsDisplay, SessionObserver, SessionView, StatsStore,
};

use crate::clock::Countdown;

/// Capacity of the internal tick channel.
const TICK_BUFFER: usize = 8;

/// How a driven session ended.
#[derive(Debug)]
pub enum DriverOutcome {
    /// Submitted by the candidate or by the clock.
    Submitted {
        report: Box<SessionReport>,
        /// Updated stats, or `None` if the merge failed.
        stats: Option<UserStats>,
    },
    /// Exit confirmed; nothing was scored or recorded.
    Exited,
    /// The host closed the command channel mid-session.
    Abandoned,
}

/// Runs a [`Session`] against a command stream and a countdown clock.
pub struct SessionDriver {
    session: Session,
    source: SourceSummary,
    user: String,
    stats: Arc<dyn StatsStore>,
    display: Arc<dyn ResultsDisplay>,
    observer: Arc<dyn SessionObserver>,
    time: TimeSource,
    tick_period: Duration,
}

impl SessionDriver {
    pub fn new(
        session: Session,
        source: SourceSummary,
        stats: Arc<dyn StatsStore>,
        display: Arc<dyn ResultsDisplay>,
    ) -> Self {
        Self {
            session,
            source,
            user: "default".to_string(),
            stats,
            display,
            observer: Arc::new(NoopObserver),
            time: TimeSource::System,
            tick_period: Duration::from_secs(1),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_time_source(mut self, time: TimeSource) -> Self {
        self.time = time;
        self
    }

    /// Real time per session second. [`run`](Self::run) fails for a zero period.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drive the session until it is submitted, exited, or abandoned.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Result<DriverOutcome> {
        let (tick_tx, mut ticks) = mpsc::channel(TICK_BUFFER);
        let clock = Countdown::spawn(self.session.time_remaining(), self.tick_period, tick_tx)?;
        self.notify_update();

        let outcome = loop {
            tokio::select! {
                biased;

                tick = ticks.recv() => {
                    // The clock sends exactly enough ticks to expire the session.
                    let Some(tick) = tick else {
                        tracing::error!(session = %self.session.id(), "countdown stopped before time expired");
                        anyhow::bail!("countdown stopped with {}s remaining", self.session.time_remaining());
                    };
                    let expired = self.session.tick();
                    self.observer.on_tick(self.session.time_remaining());
                    if let Some(outcome) = expired {
                        tracing::info!(seq = tick.seq, "time expired, auto-submitting");
                        break outcome;
                    }
                }

                command = commands.recv() => {
                    let Some(command) = command else {
                        clock.cancel();
                        tracing::info!(session = %self.session.id(), "command channel closed, abandoning session");
                        return Ok(DriverOutcome::Abandoned);
                    };
                    match self.session.apply(command) {
                        Ok(Some(outcome)) => break outcome,
                        Ok(None) => {
                            tracing::debug!(?command, "command applied");
                            self.notify_update();
                        }
                        Err(e) => {
                            tracing::warn!(?command, "command rejected: {e}");
                            self.observer.on_rejected(&e.to_string());
                        }
                    }
                }
            }
        };

        // Stop the clock before anything else observes the final state.
        clock.cancel();
        self.finish(outcome).await
    }

    async fn finish(self, outcome: SessionOutcome) -> Result<DriverOutcome> {
        if let SessionOutcome::Exited = outcome {
            return Ok(DriverOutcome::Exited);
        }

        let report = SessionReport::from_session(&self.session, self.source, self.time.now())
            .ok_or_else(|| anyhow::anyhow!("submitted session produced no report"))?;
        let today = self.time.today();

        // Display and stats merge run side by side; a stats failure never holds back results.
        let (shown, merged) = tokio::join!(
            self.display.show(&report),
            self.stats.merge(&self.user, &report.results, today),
        );

        if let Err(e) = shown {
            tracing::warn!("failed to display results: {e:#}");
        }
        let stats = match merged {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(user = %self.user, "failed to update stats: {e:#}");
                None
            }
        };

        Ok(DriverOutcome::Submitted {
            report: Box::new(report),
            stats,
        })
    }

    fn notify_update(&self) {
        let state = self.session.state();
        let position = state.current_index();
        let view = SessionView {
            position,
            total: self.session.total(),
            question: self.session.current_question(),
            selected: state.answers().get(&position).copied(),
            marked: state.marked().contains(&position),
            time_remaining: state.time_remaining(),
            pending: self.session.pending(),
            palette: self.session.palette(),
        };
        self.observer.on_update(&view);
    }
}
