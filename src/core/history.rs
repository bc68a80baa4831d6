//! Transition journal.
//!
//! A bounded, diagnostic-only record of the transitions an engine has
//! completed. The engine appends to it; hosts read it when debugging
//! why a surface ended up where it did.

use super::mode::TransitionMode;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Record of a single completed transition.
///
/// `mode` is the mode the transition ran under: `None` for an instant
/// switch, `Timed` or `Incremental` otherwise. An aborted incremental
/// transition records the rollback itself, so `to` is the state the
/// surface returned to.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state left behind.
    pub from: S,
    /// The state arrived at.
    pub to: S,
    /// The mode the transition ran under.
    pub mode: TransitionMode,
    /// When the transition completed.
    pub at: DateTime<Utc>,
}

/// Bounded journal of completed transitions, oldest first.
///
/// Once the capacity is reached, recording drops the oldest entry.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use veer::core::{TransitionLog, TransitionMode, TransitionRecord};
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///     }
/// }
///
/// let mut log = TransitionLog::new();
/// log.record(TransitionRecord {
///     from: Home::Default,
///     to: Home::Drawer,
///     mode: TransitionMode::Timed,
///     at: Utc::now(),
/// });
///
/// assert_eq!(log.len(), 1);
/// assert_eq!(log.path(), vec![Home::Default, Home::Drawer]);
/// ```
#[derive(Clone, Debug, Serialize)]
#[serde(bound = "")]
pub struct TransitionLog<S: State> {
    records: VecDeque<TransitionRecord<S>>,
    capacity: usize,
}

const DEFAULT_CAPACITY: usize = 64;

impl<S: State> Default for TransitionLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> TransitionLog<S> {
    /// Create an empty log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty log that keeps at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a record, evicting the oldest if the log is full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// The recorded transitions, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.records.iter()
    }

    /// The path of states traversed: the first record's origin, then
    /// each record's destination.
    pub fn path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|record| record.to));
        path
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
