//! Shared runtime plumbing for the GRAAVITONS dashboard client.
//!
//! This crate provides:
//! - Configuration with environment overrides (`Config`)
//! - File system paths under `~/.graavitons` (`Paths`)
//! - Logging initialization (`init_logging`)
//! - The core error type (`CoreError`)

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_API_BASE, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
