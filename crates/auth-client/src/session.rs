//! Application-startup session reconciliation and login/logout state.

use crate::api_client::CredentialBundle;
use crate::events::SessionEvents;
use client_storage::{CredentialStore, StorageResult, UserIdentity};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Whole-session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn(UserIdentity),
}

/// Snapshot of the session for callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub user: Option<UserIdentity>,
}

/// Owns the in-memory "current user" state and keeps it consistent with the
/// persisted credential bundle.
///
/// `bootstrap` runs once at application start; afterwards the state changes
/// only through `complete_login`, `logout`, or the unauthorized event fired
/// by the request client.
pub struct SessionManager {
    store: Arc<CredentialStore>,
    events: Arc<SessionEvents>,
    state: Arc<Mutex<SessionState>>,
}

impl SessionManager {
    pub fn new(store: Arc<CredentialStore>, events: Arc<SessionEvents>) -> Self {
        Self {
            store,
            events,
            state: Arc::new(Mutex::new(SessionState::LoggedOut)),
        }
    }

    /// Reconcile persisted state and wire the unauthorized handler.
    ///
    /// A stored access token and user together mean the application starts
    /// logged in. Anything less is a half-written bundle and is cleared
    /// outright, so storage is never left with exactly one of the two.
    pub fn bootstrap(&self) -> StorageResult<()> {
        let token = self.store.get_access_token()?;
        let user = self.store.get_user()?;

        match (token, user) {
            (Some(_), Some(user)) => {
                tracing::info!("restored persisted session");
                *self.state.lock().unwrap() = SessionState::LoggedIn(user);
            }
            (None, None) => {
                *self.state.lock().unwrap() = SessionState::LoggedOut;
            }
            _ => {
                tracing::warn!("partial credential bundle found, clearing session");
                self.store.clear_session()?;
                *self.state.lock().unwrap() = SessionState::LoggedOut;
            }
        }

        // The request client clears storage before notifying, so the handler
        // only has to drop the in-memory user.
        let state = Arc::clone(&self.state);
        self.events.set_on_unauthorized(move || {
            tracing::info!("session invalidated, logging out");
            *state.lock().unwrap() = SessionState::LoggedOut;
        });

        Ok(())
    }

    /// Persist a successful login exchange and enter `LoggedIn`.
    pub fn complete_login(&self, bundle: &CredentialBundle) -> StorageResult<()> {
        self.store
            .set_session(&bundle.access_token, &bundle.refresh_token, &bundle.user)?;
        *self.state.lock().unwrap() = SessionState::LoggedIn(bundle.user.clone());
        tracing::info!("session established");
        Ok(())
    }

    /// Explicit logout: drops the in-memory user and clears storage.
    pub fn logout(&self) -> StorageResult<()> {
        *self.state.lock().unwrap() = SessionState::LoggedOut;
        self.store.clear_session()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The current user, when logged in.
    pub fn current_user(&self) -> Option<UserIdentity> {
        match &*self.state.lock().unwrap() {
            SessionState::LoggedIn(user) => Some(user.clone()),
            SessionState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), SessionState::LoggedIn(_))
    }

    /// Snapshot for status displays.
    pub fn status(&self) -> SessionStatus {
        let user = self.current_user();
        SessionStatus {
            logged_in: user.is_some(),
            user,
        }
    }
}
