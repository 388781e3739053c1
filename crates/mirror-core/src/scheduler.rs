//! Pass scheduling and graceful shutdown
//!
//! The scheduler runs one pass immediately. In scheduled mode it then waits
//! on two sources at once, the interval timer and the shutdown future, and
//! services whichever is ready. Passes run to completion before the next
//! wait, so passes never overlap and a shutdown request is only observed
//! between passes. When both are ready, shutdown wins.

use std::future::Future;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::{Schedule, SyncPass};

/// Why the scheduler returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Run-once mode finished its single pass
    Completed,
    /// A shutdown request arrived while waiting; carries its description
    Shutdown(&'static str),
}

/// What the scheduler did before returning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: usize,
    pub stop: StopReason,
}

/// Drives passes according to a [`Schedule`].
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    schedule: Schedule,
}

impl Scheduler {
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule }
    }

    /// Run passes until run-once completes or `shutdown` resolves.
    ///
    /// `shutdown` is only polled while waiting between passes. It is never
    /// polled in run-once mode.
    pub async fn run<P, F>(&self, pass: &P, shutdown: F) -> RunSummary
    where
        P: SyncPass + ?Sized,
        F: Future<Output = &'static str>,
    {
        info!(schedule = ?self.schedule, "Starting scheduled download check");
        pass.run_pass().await;
        let mut passes = 1;

        let period = match self.schedule {
            Schedule::RunOnce => {
                info!("Run once mode enabled; exiting after initial check");
                return RunSummary {
                    passes,
                    stop: StopReason::Completed,
                };
            }
            Schedule::Every(period) => period,
        };

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                reason = &mut shutdown => {
                    info!(signal = reason, passes, "Received shutdown request, shutting down gracefully");
                    return RunSummary {
                        passes,
                        stop: StopReason::Shutdown(reason),
                    };
                }
                _ = ticker.tick() => {
                    pass.run_pass().await;
                    passes += 1;
                }
            }
        }
    }
}
