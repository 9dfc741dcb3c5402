//! Cancellable repeating tick timer
//!
//! A `TickTimer` owns a tokio task that sends one [`Tick`] per period into
//! the controller's channel. Dropping the timer aborts the task, so the only
//! way to keep ticks flowing is to keep the handle.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One elapsed period, tagged with the timer that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timer_id: u64,
}

/// Handle to a running tick task
#[derive(Debug)]
pub struct TickTimer {
    id: u64,
    handle: JoinHandle<()>,
}

impl TickTimer {
    /// Spawn a timer whose first tick arrives one `period` from now.
    pub fn spawn(id: u64, period: Duration, ticks: UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if ticks.send(Tick { timer_id: id }).is_err() {
                    break;
                }
            }
        });
        tracing::trace!(timer_id = id, ?period, "tick timer started");
        Self { id, handle }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the task. Ticks already queued stay queued and must be
    /// recognised as stale by their id.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::trace!(timer_id = self.id, "tick timer cancelled");
    }
}
