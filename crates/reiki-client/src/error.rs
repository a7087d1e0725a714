//! Error types for the Reiki Agenda backend client.

use reiki_types::BackendError;
use thiserror::Error;

/// Postgres unique violation, raised when a slot is already taken.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres insufficient privilege, raised by row-level security.
const INSUFFICIENT_PRIVILEGE: &str = "42501";
/// PostgREST "no rows" for single-object requests.
const NO_ROWS: &str = "PGRST116";

/// Errors that can occur when using the backend client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Project URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Server returned an invalid or unparseable response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server returned 429 Too Many Requests.
    #[error("Rate limited (429): retry after {retry_after:?}s")]
    RateLimited {
        /// Seconds to wait before retrying, if provided by server.
        retry_after: Option<u64>,
    },

    /// Server returned a 5xx error.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Server refused the request with a 4xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Postgres / PostgREST / auth error code, if any.
        code: Option<String>,
        /// Error message from server.
        message: String,
    },

    /// Request kept failing after maximum retry attempts.
    #[error("Timeout after {0} attempts")]
    Timeout(u32),

    /// Operation needs a signed-in user.
    #[error("No active session")]
    NoSession,
}

impl From<ClientError> for BackendError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, code, message } => match (status, code.as_deref()) {
                (401, _) => Self::Unauthorized,
                (_, Some(INSUFFICIENT_PRIVILEGE)) | (403, _) => Self::Forbidden,
                (_, Some(NO_ROWS)) | (404, _) => Self::NotFound { what: message },
                (_, Some(UNIQUE_VIOLATION)) | (409, _) => Self::Conflict { message },
                _ => Self::Rejected { status, message },
            },
            ClientError::NoSession => Self::NoSession,
            other => Self::Transport { message: other.to_string() },
        }
    }
}

/// Pull `(code, message)` out of an auth or PostgREST error body.
///
/// Auth errors use `msg`/`error_description`, PostgREST uses `message`; `code`
/// is a string for Postgres errors and a number for auth errors.
pub(crate) fn parse_error_body(body: &str, fallback: &str) -> (Option<String>, String) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        let text = body.trim();
        return (None, if text.is_empty() { fallback.to_string() } else { text.to_string() });
    };
    let code = match value.get("code") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => value.get("error_code").and_then(|c| c.as_str()).map(str::to_string),
    };
    let message = ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .unwrap_or(fallback)
        .to_string();
    (code, message)
}
