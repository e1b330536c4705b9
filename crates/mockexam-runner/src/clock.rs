//! Countdown clock task.

use std::time::Duration;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// One elapsed period, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
}

/// Background task that emits one [`Tick`] per period, up to a fixed count.
///
/// The task stops on its own after the last tick, when the receiver is
/// dropped, on [`cancel`](Countdown::cancel), or when the handle is dropped.
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Start counting down `ticks` periods. The first tick arrives one full period after spawn.
    ///
    /// Fails for a zero `period`.
    pub fn spawn(ticks: u64, period: Duration, sender: mpsc::Sender<Tick>) -> Result<Self> {
        if period.is_zero() {
            bail!("countdown tick period must be non-zero");
        }
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            for seq in 1..=ticks {
                interval.tick().await;
                if sender.send(Tick { seq }).await.is_err() {
                    tracing::debug!(seq, "tick receiver closed, stopping countdown");
                    return;
                }
            }
            tracing::debug!(ticks, "countdown finished");
        });
        Ok(Self { handle })
    }

    /// Stop the clock. No tick is sent after this returns.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
