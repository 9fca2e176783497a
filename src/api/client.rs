//! API client for the Bissoy login endpoint.
//!
//! This module provides the `AuthClient` struct for posting credentials to
//! the remote login API and classifying the result as an `AuthOutcome`.

use anyhow::Result;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::{debug, info};

use super::error::{truncate_body, AuthError};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the Bissoy API (the login endpoint lives under it)
const DEFAULT_BASE_URL: &str = "https://www.bissoy.com/api";

/// Content type sent with the login body.
/// The server expects the charset spelled out, so this is set explicitly
/// rather than relying on reqwest's bare `application/json`.
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Display name used when a successful response names no user
const FALLBACK_DISPLAY_NAME: &str = "User";

// ============================================================================
// Types
// ============================================================================

/// Credentials for one login attempt.
///
/// Transient by design: held only for the duration of the request and never
/// written to disk. Serializes to the wire body `{"email": ..., "password": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Classified result of a login attempt.
///
/// Produced once per attempt and consumed immediately by the caller; session
/// state is only ever written in response to `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success { username: String },
    Failure { message: String },
}

/// Client for the Bissoy login API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client against the production endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a specific base URL.
    /// Tests point this at a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // No client-side timeout override; the transport defaults apply.
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Post credentials to the login endpoint and classify the response.
    ///
    /// Exactly one outbound request per call, no retries. Every failure mode
    /// collapses into `AuthOutcome::Failure` with the user-facing message,
    /// so callers never see a transport error type.
    pub async fn login(&self, credentials: &Credentials) -> AuthOutcome {
        match self.send_login(credentials).await {
            Ok(username) => {
                info!(username = %username, "Login accepted");
                AuthOutcome::Success { username }
            }
            Err(err) => {
                info!(error = %err, "Login failed");
                AuthOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn send_login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let url = format!("{}/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, body = %truncate_body(&body), "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let body = response.text().await.unwrap_or_default();
        Ok(display_name(&body))
    }
}

/// Extract the display name from a successful login body.
///
/// Prefers the `username` field, then `name`. A missing field, a non-string
/// value, or a body that does not parse as JSON all fall back to a
/// placeholder: a malformed body on a success status still counts as a
/// login.
fn display_name(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return FALLBACK_DISPLAY_NAME.to_string(),
    };

    value
        .get("username")
        .and_then(serde_json::Value::as_str)
        .or_else(|| value.get("name").and_then(serde_json::Value::as_str))
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_string()
}
