//! Listener registration and fan-out.

use crate::core::State;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Observer of a machine's transitions.
///
/// Every method defaults to a no-op so listeners implement only the
/// hooks they care about. All calls arrive on the UI thread, so
/// listener code needs no synchronization of its own.
pub trait StateListener<S: State>: Send + Sync {
    /// A timed or incremental transition toward `to` began.
    fn on_start(&self, _from: S, _to: S) {}

    /// The in-flight transition's progress changed.
    fn on_incremental(&self, _from: S, _to: S, _percent: f32) {}

    /// A transition finished; the machine now rests in `to`.
    fn on_end(&self, _from: S, _to: S) {}
}

/// Opaque handle identifying one listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(Uuid);

/// Registered listeners, iterated by snapshot.
///
/// Fan-out clones the current list, so a listener registered or removed
/// mid-notification neither crashes the iteration nor drops another
/// listener's callback.
pub(crate) struct ListenerSet<S: State> {
    entries: Mutex<Vec<(ListenerToken, Arc<dyn StateListener<S>>)>>,
}

impl<S: State> ListenerSet<S> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, listener: Arc<dyn StateListener<S>>) -> ListenerToken {
        let token = ListenerToken(Uuid::new_v4());
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push((token, listener));
        token
    }

    /// # Panics
    ///
    /// Panics when the token was never registered or was already
    /// removed; that is a lifecycle bug in the caller.
    pub fn unregister(&self, token: ListenerToken) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|(registered, _)| *registered != token);
        assert!(
            entries.len() < before,
            "tried to unregister an unknown listener"
        );
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn StateListener<S>>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().map(|(_, listener)| listener.clone()).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }
}
