//! Session-aware HTTP client for the GRAAVITONS dashboard.
//!
//! This crate provides:
//! - `ApiClient`: wraps outbound HTTP calls, attaches the bearer token, and
//!   transparently performs a one-shot refresh-and-retry cycle on 401
//! - `SessionEvents`: a single-slot hub that decouples "the session is gone"
//!   from whatever UI owns session state
//! - `SessionManager`: application-startup reconciliation of persisted
//!   credentials plus login/logout state
//!
//! # Core Invariants
//!
//! 1. **Bearer-Wins**: the stored access token always populates the
//!    `Authorization` header; caller-supplied values never survive
//! 2. **One-Shot Refresh**: at most one refresh call and one retried request
//!    per `fetch` invocation
//! 3. **401 Returns, Transport Throws**: an exhausted 401 is returned as a
//!    response; network-level failures propagate as errors
//! 4. **Both-or-Neither**: after bootstrap, either the full credential bundle
//!    is present or storage is cleared

mod api_client;
mod error;
mod events;
mod session;

#[cfg(test)]
mod tests;

pub use api_client::{ApiClient, CredentialBundle, RequestOptions, REFRESH_PATH};
pub use error::{AuthError, AuthResult};
pub use events::SessionEvents;
pub use session::{SessionManager, SessionState, SessionStatus};
