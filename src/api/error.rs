use thiserror::Error;

/// Failure modes of a single login attempt.
///
/// The display strings are the exact messages shown inline under the login
/// form, so changing them changes user-visible behavior.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Transport-level failure: no connectivity, DNS, TLS, timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any non-success HTTP status. The server does not distinguish bad
    /// credentials from other rejections, so neither do we.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Maximum length for response bodies quoted in log lines
const MAX_LOGGED_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_LOGGED_BODY_LENGTH {
        body.to_string()
    } else {
        let truncated: String = body.chars().take(MAX_LOGGED_BODY_LENGTH).collect();
        format!("{}... (truncated, {} total bytes)", truncated, body.len())
    }
}
