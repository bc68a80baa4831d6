//! Transition plans.
//!
//! A plan is an ordered list of (predicate, request) entries. When
//! submitted, the first entry whose predicate matches the engine's
//! current condition executes; every other entry is ignored for that
//! call. Building a plan never touches engine state.

use super::predicate::Predicate;
use super::request::Request;
use super::state::State;
use std::time::Duration;

/// An ordered, first-match-wins transition plan.
///
/// The four factories cover the common single-entry shapes; the
/// [`builder`](StateChange::builder) composes speculative multi-entry
/// plans.
///
/// # Example
///
/// ```rust
/// use veer::core::{Predicate, Request, StateChange};
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///         Swiping,
///     }
/// }
///
/// // Wherever the drawer gesture finds the surface, close it.
/// let close = StateChange::builder()
///     .maybe(Predicate::during_incremental(Home::Drawer), Request::fitted_abort())
///     .maybe(Predicate::at(Home::Drawer), Request::immediate(Home::Default))
///     .build();
/// assert_eq!(close.len(), 2);
///
/// let open = StateChange::incremental(Home::Default, Home::Drawer);
/// assert_eq!(open.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct StateChange<S: State> {
    entries: Vec<(Predicate<S>, Request<S>)>,
}

impl<S: State> StateChange<S> {
    /// Start composing a multi-entry plan.
    pub fn builder() -> StateChangeBuilder<S> {
        StateChangeBuilder::new()
    }

    /// Instantly switch `from` → `to` when settled in `from`.
    pub fn immediate(from: S, to: S) -> Self {
        Self::builder()
            .maybe(Predicate::at(from), Request::immediate(to))
            .build()
    }

    /// Animate `from` → `to` over `duration` when settled in `from`.
    pub fn timed(from: S, to: S, duration: Duration) -> Self {
        Self::builder().maybe_timed(from, to, duration).build()
    }

    /// Begin dragging `from` → `to` when settled in `from`.
    pub fn incremental(from: S, to: S) -> Self {
        Self::builder()
            .maybe(Predicate::at(from), Request::incremental(to))
            .build()
    }

    /// Report drag progress for an incremental transition toward
    /// `state`.
    pub fn increment(state: S, percent: f32) -> Self {
        Self::builder()
            .maybe(Predicate::during_incremental(state), Request::increment(percent))
            .build()
    }

    /// Number of entries in the plan.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no entries (it would always no-op).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(Predicate<S>, Request<S>)] {
        &self.entries
    }
}

/// Fluent builder for [`StateChange`] plans.
///
/// Entry order is significant: earlier `maybe` calls are tried first.
#[derive(Clone, Debug)]
pub struct StateChangeBuilder<S: State> {
    entries: Vec<(Predicate<S>, Request<S>)>,
}

impl<S: State> Default for StateChangeBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateChangeBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one (predicate, request) entry.
    pub fn maybe(mut self, predicate: Predicate<S>, request: Request<S>) -> Self {
        self.entries.push((predicate, request));
        self
    }

    /// Append the same request under each of several predicates, in
    /// order. Pairs with [`Predicate::any`].
    pub fn maybe_any(mut self, predicates: Vec<Predicate<S>>, request: Request<S>) -> Self {
        for predicate in predicates {
            self.entries.push((predicate, request.clone()));
        }
        self
    }

    /// Append a settled `from` → timed `to` entry.
    pub fn maybe_timed(self, from: S, to: S, duration: Duration) -> Self {
        self.maybe(Predicate::at(from), Request::timed(to, duration))
    }

    /// Finish the plan.
    pub fn build(self) -> StateChange<S> {
        StateChange {
            entries: self.entries,
        }
    }
}
