//! Auth session model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by the auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for table and RPC requests
    pub access_token: String,
    /// Token used to obtain a new access token
    pub refresh_token: String,
    /// Token type (usually "bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token validity duration in seconds
    pub expires_in: i64,
    /// Absolute unix timestamp when the access token expires
    #[serde(default)]
    pub expires_at: i64,
    pub user: AuthUser,
}

impl Session {
    /// Fill `expires_at` from `expires_in` when the server omitted it.
    pub fn with_computed_expiry(mut self) -> Self {
        if self.expires_at == 0 {
            self.expires_at = chrono::Utc::now().timestamp().saturating_add(self.expires_in);
        }
        self
    }

    /// Check if the access token is expired.
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.expires_at
    }

    /// Check if the access token will expire within the given seconds.
    pub fn expires_within(&self, seconds: i64) -> bool {
        chrono::Utc::now().timestamp().saturating_add(seconds) >= self.expires_at
    }

    /// Get remaining validity in seconds (0 if already expired).
    pub fn remaining_seconds(&self) -> i64 {
        self.expires_at.saturating_sub(chrono::Utc::now().timestamp()).max(0)
    }
}

/// Session change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
