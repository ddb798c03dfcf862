//! Integration tests for the session-aware request client.
//!
//! Test organization:
//!
//! - `harness.rs`   - MockApi: scripted HTTP server that records requests
//! - `headers.rs`   - bearer header injection rules
//! - `refresh.rs`   - 401 refresh-and-retry cycle
//! - `login.rs`     - login/register exchange
//! - `session.rs`   - bootstrap, logout, and event hub wiring
//! - `transport.rs` - transport failure handling


mod refresh;
