//! Tokio-backed scheduler.

use super::{Scheduler, TaskHandle, TickFn, UiTask};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// [`Scheduler`] backed by a tokio runtime.
///
/// UI tasks are queued on an unbounded channel and drained by a single
/// spawned task, so they run in FIFO order on every runtime flavor.
/// Repeating ticks use [`tokio::time::interval`] with missed ticks
/// skipped, and cancel by aborting the spawned loop.
///
/// Hosts with a real UI thread (a platform main loop) should implement
/// [`Scheduler`] against it directly; this implementation treats the
/// drain task as the UI thread, which is the right shape for headless
/// and TUI hosts.
pub struct TokioScheduler {
    handle: Handle,
    ui_tx: mpsc::UnboundedSender<UiTask>,
}

impl TokioScheduler {
    /// Create a scheduler that spawns onto the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiTask>();
        handle.spawn(async move {
            while let Some(task) = ui_rx.recv().await {
                task();
            }
        });
        Self { handle, ui_tx }
    }

    /// Create a scheduler on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn post_to_ui(&self, task: UiTask) {
        // The receiver only goes away when the runtime shuts down, at
        // which point dropping the task is the right outcome.
        let _ = self.ui_tx.send(task);
    }

    fn repeating(&self, every: Duration, mut tick: TickFn) -> TaskHandle {
        let join = self.handle.spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it
            // so ticks start one interval after scheduling.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !tick() {
                    break;
                }
            }
        });
        TaskHandle::new(move || join.abort())
    }
}
