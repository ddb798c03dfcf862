//! Single-slot hub for the "session invalidated" event.

use std::sync::{Arc, Mutex};

type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// Publishes exactly one event type: the session has become invalid and
/// cannot be recovered.
///
/// Only one UI owns session state at a time, so this is deliberately a
/// single slot rather than a multi-subscriber bus: registering a handler
/// replaces the previous one. Firing with no handler registered drops the
/// event silently.
pub struct SessionEvents {
    on_unauthorized: Mutex<Option<UnauthorizedHandler>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self {
            on_unauthorized: Mutex::new(None),
        }
    }

    /// Register the handler, replacing any previous registration.
    pub fn set_on_unauthorized<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_unauthorized.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Fire the event. The handler runs synchronously on the calling stack,
    /// outside the slot lock so it may re-register without deadlocking.
    pub(crate) fn notify_unauthorized(&self) {
        let handler = self.on_unauthorized.lock().unwrap().clone();
        match handler {
            Some(handler) => handler(),
            None => tracing::debug!("session invalidated with no handler registered"),
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
