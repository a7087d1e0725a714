use reiki_types::models::BackendConfig;
use reiki_types::{AuthEvent, Session};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, base_delay_ms: 500, max_delay_ms: 30_000 }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project base URL without trailing slash
    pub base_url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    pub fn from_backend(backend: &BackendConfig) -> Self {
        Self { timeout_secs: backend.timeout_secs, ..Self::new(&backend.url, &backend.anon_key) }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            anon_key: String::new(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Broadcast to subscribers whenever the session is set, refreshed or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}
