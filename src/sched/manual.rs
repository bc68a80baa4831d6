//! Deterministic scheduler and clock.
//!
//! Test doubles that are also usable by frame-driven hosts: UI tasks
//! queue until [`ManualScheduler::drain_ui`] runs them, repeating ticks
//! fire only on [`ManualScheduler::fire_tick`], and [`ManualClock`]
//! advances only when told to.

use super::{Clock, Scheduler, TaskHandle, TickFn, UiTask};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct RepeatingTask {
    every: Duration,
    tick: TickFn,
    cancelled: Arc<AtomicBool>,
}

#[derive(Default)]
struct SchedulerInner {
    ui: Mutex<VecDeque<UiTask>>,
    ticks: Mutex<Vec<RepeatingTask>>,
}

/// [`Scheduler`] that does nothing until explicitly driven.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<SchedulerInner>,
}

impl ManualScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every queued UI task in submission order, including tasks
    /// queued by the tasks themselves. Returns how many ran.
    pub fn drain_ui(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = {
                let mut ui = self.inner.ui.lock().unwrap_or_else(|e| e.into_inner());
                ui.pop_front()
            };
            let Some(task) = task else { break };
            task();
            ran += 1;
        }
        ran
    }

    /// Fire one tick on every live repeating task. Tasks whose tick
    /// returns `false`, and tasks cancelled meanwhile, are dropped.
    pub fn fire_tick(&self) {
        // Ticks run outside the list lock so they can schedule or
        // cancel without deadlocking.
        let tasks: Vec<RepeatingTask> = {
            let mut ticks = self.inner.ticks.lock().unwrap_or_else(|e| e.into_inner());
            ticks.drain(..).collect()
        };
        let mut kept = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            if task.cancelled.load(Ordering::SeqCst) {
                continue;
            }
            let alive = (task.tick)();
            if alive && !task.cancelled.load(Ordering::SeqCst) {
                kept.push(task);
            }
        }
        let mut ticks = self.inner.ticks.lock().unwrap_or_else(|e| e.into_inner());
        ticks.extend(kept);
    }

    /// Fire `n` ticks.
    pub fn fire_ticks(&self, n: usize) {
        for _ in 0..n {
            self.fire_tick();
        }
    }

    /// Number of repeating tasks that are still live.
    pub fn live_tasks(&self) -> usize {
        let ticks = self.inner.ticks.lock().unwrap_or_else(|e| e.into_inner());
        ticks
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Number of UI tasks waiting for [`drain_ui`](Self::drain_ui).
    pub fn queued_ui(&self) -> usize {
        let ui = self.inner.ui.lock().unwrap_or_else(|e| e.into_inner());
        ui.len()
    }

    /// The intervals of live repeating tasks, in scheduling order.
    pub fn tick_intervals(&self) -> Vec<Duration> {
        let ticks = self.inner.ticks.lock().unwrap_or_else(|e| e.into_inner());
        ticks
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .map(|t| t.every)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn post_to_ui(&self, task: UiTask) {
        let mut ui = self.inner.ui.lock().unwrap_or_else(|e| e.into_inner());
        ui.push_back(task);
    }

    fn repeating(&self, every: Duration, tick: TickFn) -> TaskHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut ticks = self.inner.ticks.lock().unwrap_or_else(|e| e.into_inner());
            ticks.push(RepeatingTask {
                every,
                tick,
                cancelled: cancelled.clone(),
            });
        }
        TaskHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

/// [`Clock`] that advances only when told to.
#[derive(Clone, Default)]
pub struct ManualClock {
    ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}
