//! Storage key constants.

/// Storage keys used by the client.
///
/// All keys carry the `graavitons_` prefix so they can share a storage
/// namespace with other applications without collisions.
pub struct StorageKeys;

impl StorageKeys {
    /// Access token (short-lived bearer credential)
    pub const ACCESS_TOKEN: &'static str = "graavitons_token";

    /// Refresh token (exchanged for a new access token on expiry)
    pub const REFRESH_TOKEN: &'static str = "graavitons_refresh_token";

    /// Serialized user identity (JSON)
    pub const USER: &'static str = "graavitons_user";
}
