// Scan Scheduler - drives the monitoring cycle
//
// Fixed-delay, not fixed-rate:
// - Cycle N+1 starts only after cycle N has settled and the interval elapsed
// - A slow ledger stretches the period instead of stacking cycles
// - No backoff: a failed cycle waits the normal interval
// - Stop is cooperative and never interrupts a running cycle

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::info;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    /// Stop requested, waiting for the in-flight cycle to settle
    Stopping,
    Idle,
}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // Leaves a permit behind if the loop is mid-cycle
        self.notify.notify_one();
    }
}

pub struct ScanScheduler {
    interval: Duration,
}

impl ScanScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Start the scan loop in the background
    pub fn start<F, Fut>(&self, mut cycle: F) -> ScanHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let interval = self.interval;
        let signal = Arc::new(StopSignal::default());
        let loop_signal = signal.clone();

        let task = tokio::spawn(async move {
            let mut cycles: u64 = 0;
            info!("⏰ Polling every {}ms", interval.as_millis());

            while !loop_signal.is_stopped() {
                cycle().await;
                cycles += 1;

                if loop_signal.is_stopped() {
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = loop_signal.notify.notified() => {}
                }
            }

            info!("🛑 Scan loop stopped after {} cycle(s)", cycles);
            cycles
        });

        ScanHandle { signal, task }
    }
}

/// Handle to a running scan loop
pub struct ScanHandle {
    signal: Arc<StopSignal>,
    task: JoinHandle<u64>,
}

impl ScanHandle {
    /// No new cycle starts after this; a cycle already running finishes.
    pub fn stop(&self) {
        if !self.signal.is_stopped() {
            info!("Stop requested, finishing current cycle");
        }
        self.signal.stop();
    }

    pub fn state(&self) -> SchedulerState {
        if self.task.is_finished() {
            SchedulerState::Idle
        } else if self.signal.is_stopped() {
            SchedulerState::Stopping
        } else {
            SchedulerState::Running
        }
    }

    /// Wait for the loop to wind down. Returns the number of cycles run.
    pub async fn join(self) -> AppResult<u64> {
        Ok(self.task.await?)
    }
}
