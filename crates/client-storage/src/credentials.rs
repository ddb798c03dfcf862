//! High-level API for the persisted credential bundle.

use crate::{KeyValueStorage, StorageError, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};

/// Opaque user identity blob.
///
/// The identity is owned by the application layer; this crate persists and
/// returns it without ever reading fields out of it. Different deployments
/// key accounts by email or by username, so no field is assumed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(pub serde_json::Value);

/// High-level API for storing and retrieving the session credentials:
/// access token, refresh token, and the persisted user identity.
pub struct CredentialStore {
    storage: Box<dyn KeyValueStorage>,
}

impl CredentialStore {
    /// Create a new credential store with the given storage backend
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store the access token
    pub fn set_access_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, token)
    }

    /// Retrieve the access token
    pub fn get_access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    /// Store the refresh token
    pub fn set_refresh_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::REFRESH_TOKEN, token)
    }

    /// Retrieve the refresh token
    pub fn get_refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::REFRESH_TOKEN)
    }

    /// Store the user identity (serialized as JSON)
    pub fn set_user(&self, user: &UserIdentity) -> StorageResult<()> {
        let json =
            serde_json::to_string(user).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::USER, &json)
    }

    /// Retrieve the user identity.
    ///
    /// A stored value that does not parse as JSON is treated as absent;
    /// callers never see a deserialization error from here.
    pub fn get_user(&self) -> StorageResult<Option<UserIdentity>> {
        match self.storage.get(StorageKeys::USER)? {
            Some(json) => match serde_json::from_str::<UserIdentity>(&json) {
                Ok(user) => Ok(Some(user)),
                Err(error) => {
                    tracing::warn!(%error, "stored user identity is malformed, treating as absent");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Store a complete credential bundle (tokens + user identity)
    pub fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        user: &UserIdentity,
    ) -> StorageResult<()> {
        self.set_access_token(access_token)?;
        self.set_refresh_token(refresh_token)?;
        self.set_user(user)?;
        Ok(())
    }

    /// Check whether a full session is present (access token AND user)
    pub fn has_session(&self) -> StorageResult<bool> {
        let has_token = self.storage.has(StorageKeys::ACCESS_TOKEN)?;
        let has_user = self.storage.has(StorageKeys::USER)?;
        Ok(has_token && has_user)
    }

    /// Clear the session: removes the access token, refresh token, and user.
    /// Individual delete failures do not abort the clear.
    pub fn clear_session(&self) -> StorageResult<()> {
        let _ = self.storage.delete(StorageKeys::ACCESS_TOKEN);
        let _ = self.storage.delete(StorageKeys::REFRESH_TOKEN);
        let _ = self.storage.delete(StorageKeys::USER);
        Ok(())
    }
}
