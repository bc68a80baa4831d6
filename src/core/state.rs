//! Core State trait for surface states.
//!
//! Every state machine governs a fixed, machine-specific set of states.
//! States are small copyable identifiers with an explicit name mapping
//! used for logging and diagnostics.

use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for surface states.
///
/// States are cheap value identifiers describing which configuration a
/// UI surface is in (drawer open, swiping, idle, ...). The engine never
/// interprets them; it only compares them and hands them to listeners.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: states are identifiers, compared and kept in
///   the machine's valid-state set
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize`: states appear in serializable snapshots and transition
///   records
///
/// The [`surface_states!`](crate::surface_states) macro generates the
/// derive list and this impl for plain enums.
///
/// # Example
///
/// ```rust
/// use veer::core::State;
/// use serde::Serialize;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
/// enum Home {
///     Default,
///     Drawer,
///     Swiping,
/// }
///
/// impl State for Home {
///     fn name(&self) -> &str {
///         match self {
///             Self::Default => "Default",
///             Self::Drawer => "Drawer",
///             Self::Swiping => "Swiping",
///         }
///     }
/// }
///
/// assert_eq!(Home::Drawer.name(), "Drawer");
/// ```
pub trait State: Copy + Eq + Hash + Debug + Serialize + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    ///
    /// An explicit mapping, so log lines never fall back to runtime
    /// type inspection.
    fn name(&self) -> &str;
}
