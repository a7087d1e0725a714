//! Errors returned by the hosted backend (auth, tables, remote procedures).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a remote call, already classified by HTTP status / Postgres code.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum BackendError {
    /// Missing or expired credentials (HTTP 401)
    #[error("Not authenticated")]
    Unauthorized,

    /// Row-level security or a remote procedure refused the caller (HTTP 403)
    #[error("Forbidden")]
    Forbidden,

    /// Requested row does not exist or is not visible
    #[error("Not found: {what}")]
    NotFound {
        /// What was being looked up
        what: String,
    },

    /// Write collided with an existing row, e.g. the slot is already booked
    #[error("Conflict: {message}")]
    Conflict {
        /// Message reported by the backend
        message: String,
    },

    /// Any other non-success response
    #[error("Backend rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message reported by the backend
        message: String,
    },

    /// Network failure or undecodable response
    #[error("Transport error: {message}")]
    Transport {
        /// Underlying error description
        message: String,
    },

    /// Operation needs a signed-in user but there is no session
    #[error("No active session")]
    NoSession,
}

impl BackendError {
    /// Check if this is a temporary error that may resolve on retry.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the caller lacks permission (either unauthenticated or refused).
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden | Self::NoSession)
    }
}
