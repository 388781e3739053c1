//! Scheduler timing and shutdown behavior, on a paused Tokio clock.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mirror_core::{PassReport, RunSummary, Schedule, Scheduler, StopReason, SyncPass};
use tokio::time::{Instant, sleep};

/// Counts passes; optionally takes time to finish each one.
#[derive(Default)]
struct CountingPass {
    started: AtomicUsize,
    finished: AtomicUsize,
    duration: Duration,
}

impl CountingPass {
    fn taking(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SyncPass for CountingPass {
    async fn run_pass(&self) -> PassReport {
        self.started.fetch_add(1, Ordering::SeqCst);
        if !self.duration.is_zero() {
            sleep(self.duration).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        PassReport::default()
    }
}

/// Shutdown request timed from the moment of the call, not of the first poll.
fn shutdown_after(delay: Duration) -> impl Future<Output = &'static str> {
    let timer = sleep(delay);
    async move {
        timer.await;
        "SIGTERM"
    }
}

#[tokio::test(start_paused = true)]
async fn run_once_executes_one_pass_without_waiting() {
    let pass = CountingPass::default();

    let summary = Scheduler::new(Schedule::RunOnce)
        .run(&pass, std::future::pending())
        .await;

    assert_eq!(
        summary,
        RunSummary {
            passes: 1,
            stop: StopReason::Completed
        }
    );
    assert_eq!(pass.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_mode_repeats_until_shutdown() {
    let pass = CountingPass::default();

    let summary = Scheduler::new(Schedule::Every(Duration::from_millis(10)))
        .run(&pass, shutdown_after(Duration::from_millis(35)))
        .await;

    // Passes at 0, 10, 20 and 30 ms; shutdown at 35 ms.
    assert!(summary.passes >= 2, "expected repeated passes, got {summary:?}");
    assert_eq!(summary.passes, 4);
    assert_eq!(summary.stop, StopReason::Shutdown("SIGTERM"));
    assert_eq!(pass.started.load(Ordering::SeqCst), summary.passes);
}

#[tokio::test(start_paused = true)]
async fn shutdown_between_ticks_prevents_next_pass() {
    let pass = CountingPass::default();
    let start = Instant::now();

    let summary = Scheduler::new(Schedule::Every(Duration::from_millis(100)))
        .run(&pass, shutdown_after(Duration::from_millis(150)))
        .await;

    assert_eq!(summary.passes, 2);
    assert!(start.elapsed() < Duration::from_millis(200));
    assert_eq!(pass.started.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_pass_lets_the_pass_finish() {
    let pass = CountingPass::taking(Duration::from_millis(50));

    let summary = Scheduler::new(Schedule::Every(Duration::from_millis(10)))
        .run(&pass, shutdown_after(Duration::from_millis(5)))
        .await;

    assert_eq!(summary.passes, 1);
    assert_eq!(pass.started.load(Ordering::SeqCst), 1);
    assert_eq!(pass.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_passes_never_overlap() {
    let pass = Arc::new(CountingPass::taking(Duration::from_millis(25)));

    let summary = Scheduler::new(Schedule::Every(Duration::from_millis(10)))
        .run(pass.as_ref(), shutdown_after(Duration::from_millis(100)))
        .await;

    assert_eq!(
        pass.started.load(Ordering::SeqCst),
        pass.finished.load(Ordering::SeqCst)
    );
    assert_eq!(summary.passes, pass.finished.load(Ordering::SeqCst));
}
