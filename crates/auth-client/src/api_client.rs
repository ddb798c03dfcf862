//! Authenticated request client with one-shot refresh-and-retry.

use crate::error::{AuthError, AuthResult};
use crate::events::SessionEvents;
use client_storage::{CredentialStore, UserIdentity};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Refresh endpoint, relative to the API base.
pub const REFRESH_PATH: &str = "/api/auth/refresh";
/// Login endpoint, relative to the API base.
const LOGIN_PATH: &str = "/api/auth/login";
/// Registration endpoint, relative to the API base.
const REGISTER_PATH: &str = "/api/auth/register";

/// Credential bundle returned by a successful login exchange.
///
/// Field names are the canonical wire contract; responses in any other shape
/// are rejected rather than silently producing empty tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Longer-lived credential exchanged for a new access token on expiry
    pub refresh_token: String,
    /// Opaque user identity, persisted alongside the tokens
    pub user: UserIdentity,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Caller-controlled parts of an outbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    json: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. The client's own `Authorization` value still wins.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }
}

/// Session-aware HTTP client.
///
/// Wraps outbound calls to the dashboard API: attaches the stored bearer
/// token, detects 401 responses, performs exactly one refresh-and-retry
/// cycle, and reports unrecoverable session failure through [`SessionEvents`].
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    api_base: String,
    store: Arc<CredentialStore>,
    events: Arc<SessionEvents>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_base` - Absolute base URL relative paths resolve against
    ///   (e.g. `http://localhost:8000`); trailing slashes are trimmed
    /// * `store` - Credential store shared with the session manager
    /// * `events` - Hub notified when the session cannot be recovered
    pub fn new(
        api_base: impl Into<String>,
        store: Arc<CredentialStore>,
        events: Arc<SessionEvents>,
    ) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            http_client: reqwest::Client::new(),
            api_base,
            store,
            events,
        }
    }

    /// Create a new client from the runtime configuration.
    pub fn from_config(
        config: &client_core::Config,
        store: Arc<CredentialStore>,
        events: Arc<SessionEvents>,
    ) -> Self {
        Self::new(config.api_base.clone(), store, events)
    }

    /// Resolve a path against the API base. Paths that already carry a
    /// scheme are used as-is.
    fn resolve_url(&self, path: &str) -> AuthResult<Url> {
        match Url::parse(path) {
            Ok(url) => Ok(url),
            Err(_) => Ok(Url::parse(&format!("{}{}", self.api_base, path))?),
        }
    }

    fn build_request(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> AuthResult<reqwest::RequestBuilder> {
        let mut headers = options.headers.clone();
        if let Some(token) = token {
            // insert() replaces any caller-supplied Authorization header
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }

        let mut builder = self
            .http_client
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &options.json {
            builder = builder.json(body);
        }
        Ok(builder)
    }

    /// Issue an authenticated request.
    ///
    /// Attaches `Authorization: Bearer <token>` when an access token is
    /// stored. A 401 triggers exactly one refresh cycle; on refresh success
    /// the original request is re-issued once and that response is returned
    /// whatever its status. On refresh failure the credential store is
    /// cleared, the session hub is notified, and the original 401 response
    /// is returned — callers must treat any 401 as "session ended".
    ///
    /// Transport-level failures (DNS, connection refused) propagate as
    /// errors and never enter the refresh flow.
    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> AuthResult<Response> {
        let url = self.resolve_url(path)?;
        let token = self.store.get_access_token()?;
        let response = self
            .build_request(&method, &url, &options, token.as_deref())?
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(url = %url, "request returned 401, attempting token refresh");

        if !self.try_refresh().await? {
            self.store.clear_session()?;
            self.events.notify_unauthorized();
            return Ok(response);
        }

        let token = self.store.get_access_token()?;
        let retried = self
            .build_request(&method, &url, &options, token.as_deref())?
            .send()
            .await?;
        Ok(retried)
    }

    /// Attempt to obtain a new access token using the stored refresh token.
    ///
    /// Returns `Ok(true)` only when the refresh endpoint answered 2xx with a
    /// well-formed body and the new token was stored. Transport failures and
    /// unexpected bodies are refresh failures, not errors: the caller falls
    /// through to the session-ended path. A 401 from the refresh endpoint
    /// itself lands here too, so refresh never recurses.
    async fn try_refresh(&self) -> AuthResult<bool> {
        let Some(refresh_token) = self.store.get_refresh_token()? else {
            tracing::debug!("no refresh token stored, refresh skipped");
            return Ok(false);
        };

        let url = self.resolve_url(REFRESH_PATH)?;
        let response = match self
            .http_client
            .post(url)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "token refresh request failed");
                return Ok(false);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "token refresh rejected");
            return Ok(false);
        }

        let data: RefreshResponse = match response.json().await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(%error, "token refresh returned an unexpected body");
                return Ok(false);
            }
        };

        self.store.set_access_token(&data.access_token)?;
        tracing::debug!("access token refreshed");
        Ok(true)
    }

    /// GET a path with default options.
    pub async fn get(&self, path: &str) -> AuthResult<Response> {
        self.fetch(Method::GET, path, RequestOptions::new()).await
    }

    /// POST a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> AuthResult<Response> {
        let body = serde_json::to_value(body)?;
        self.fetch(Method::POST, path, RequestOptions::new().json(body))
            .await
    }

    /// PUT a JSON body.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> AuthResult<Response> {
        let body = serde_json::to_value(body)?;
        self.fetch(Method::PUT, path, RequestOptions::new().json(body))
            .await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> AuthResult<Response> {
        self.fetch(Method::DELETE, path, RequestOptions::new())
            .await
    }

    /// Exchange credentials for a token bundle.
    ///
    /// Issued outside the bearer/refresh machinery: a 401 here means bad
    /// credentials, not an expired session, and must not fire the session
    /// hub or touch the store. Persisting the bundle is the session
    /// manager's job ([`crate::SessionManager::complete_login`]).
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<CredentialBundle> {
        let url = self.resolve_url(LOGIN_PATH)?;
        let response = self
            .http_client
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bundle: CredentialBundle = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        tracing::info!("login exchange succeeded");
        Ok(bundle)
    }

    /// Register a new account. The success body is ignored; the caller
    /// prompts the user to log in afterwards.
    pub async fn register(&self, payload: &serde_json::Value) -> AuthResult<()> {
        let url = self.resolve_url(REGISTER_PATH)?;
        let response = self.http_client.post(url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        tracing::info!("registration succeeded");
        Ok(())
    }
}

/// Map a failed auth exchange to an error carrying the server's `detail`
/// message when one is present.
async fn api_error(response: Response) -> AuthError {
    let status = response.status();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body
            .detail
            .unwrap_or_else(|| "Authentication failed".to_string()),
        Err(_) => "Authentication failed".to_string(),
    };
    AuthError::Api { status, message }
}
