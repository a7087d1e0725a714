//! Hosted backend connection settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Project URL and public key of the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Public anon key sent as `apikey`
    #[serde(default)]
    pub anon_key: String,
    /// Request timeout in seconds
    #[validate(range(min = 1_u64, max = 600_u64))]
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { url: String::new(), anon_key: String::new(), timeout_secs: default_timeout() }
    }
}

const fn default_timeout() -> u64 {
    30
}
