//! Persisted credential storage for the GRAAVITONS dashboard client.
//!
//! This crate provides:
//! - A string-keyed storage trait (`KeyValueStorage`) so callers can inject
//!   a file-backed store, an in-memory store, or a test fake
//! - A file-backed backend that survives application restarts
//! - `CredentialStore`, the high-level API for the access token, refresh
//!   token, and persisted user identity

mod credentials;
mod file;
mod keys;
mod memory;
mod traits;

pub use credentials::{CredentialStore, UserIdentity};
pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::KeyValueStorage;

use client_core::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage under the standard paths.
pub fn create_storage(paths: &Paths) -> StorageResult<Box<dyn KeyValueStorage>> {
    paths
        .ensure_dirs()
        .map_err(|e| StorageError::Backend(e.to_string()))?;
    let storage = FileStorage::open(paths.storage_file())?;
    Ok(Box::new(storage))
}

/// Create a CredentialStore with the default file-backed storage.
pub fn create_credential_store(paths: &Paths) -> StorageResult<CredentialStore> {
    let storage = create_storage(paths)?;
    Ok(CredentialStore::new(storage))
}
