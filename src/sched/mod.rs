//! Host collaborator traits: time and scheduling.
//!
//! The engine never owns a thread pool or sleeps. It asks the host for
//! three primitives: monotonic milliseconds, a repeating tick, and a
//! way to run a callback on the UI thread. [`TokioScheduler`] is the
//! shipped production implementation; [`manual`] holds deterministic
//! counterparts for tests and frame-driven hosts.

mod tokio;

pub mod manual;

pub use self::tokio::TokioScheduler;

use std::time::{Duration, Instant};

/// A callback to run once on the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// A repeating tick callback. Returning `false` ends the loop.
pub type TickFn = Box<dyn FnMut() -> bool + Send + 'static>;

/// Source of monotonic time in milliseconds.
///
/// The engine only ever subtracts these values; the origin is
/// arbitrary.
pub trait Clock: Send + Sync + 'static {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`Instant`], with its origin at construction.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Scheduling primitives supplied by the host environment.
///
/// Contract for implementations:
///
/// - `post_to_ui` must run tasks on one thread, in submission order
///   (FIFO), and never inline on the calling thread. The engine
///   enqueues listener notifications while holding its internal lock;
///   an inline implementation would hand that lock to listener code.
/// - `repeating` must call `tick` roughly every `every` until the tick
///   returns `false` or the returned handle is cancelled. A missed or
///   skipped tick is fine; the engine re-synchronizes from the clock.
pub trait Scheduler: Send + Sync + 'static {
    /// Queue a task for the UI thread.
    fn post_to_ui(&self, task: UiTask);

    /// Start a repeating tick. The loop ends when `tick` returns
    /// `false` or the handle is cancelled.
    fn repeating(&self, every: Duration, tick: TickFn) -> TaskHandle;
}

/// Cancellation handle for a repeating tick.
///
/// Cancels on [`cancel`](TaskHandle::cancel) or on drop, so replacing a
/// stored handle always stops the task it replaced.
pub struct TaskHandle {
    canceller: Option<Box<dyn FnOnce() + Send>>,
}

impl TaskHandle {
    /// Wrap a cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            canceller: Some(Box::new(cancel)),
        }
    }

    /// Stop the task now.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("live", &self.canceller.is_some())
            .finish()
    }
}

/// Tick interval for a display refresh rate, floored at one
/// millisecond. Non-positive rates fall back to 60 Hz.
pub fn interval_for_refresh_rate(hz: f32) -> Duration {
    let hz = if hz > 0.0 { hz } else { 60.0 };
    Duration::from_millis(((1000.0 / hz) as u64).max(1))
}
