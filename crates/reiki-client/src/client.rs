use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, Mutex, RwLock};
use url::Url;

use reiki_types::models::BackendConfig;
use reiki_types::{AuthEvent, Session};

use crate::error::{parse_error_body, ClientError};
use crate::types::{ClientConfig, SessionChange};

/// Refresh the access token when it expires within this many seconds.
const REFRESH_MARGIN_SECS: i64 = 60;
const EVENT_CAPACITY: usize = 16;

/// Which token goes into `Authorization: Bearer ...`.
#[derive(Debug, Clone)]
pub(crate) enum Credential {
    /// Session access token (refreshed when close to expiry), anon key when signed out
    Current,
    Anon,
}

/// One HTTP call, rebuilt for every retry attempt.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(&'static str, &'static str)>,
    pub credential: Credential,
    /// Safe to resend after a 5xx; writes are not, the server may have committed them
    pub idempotent: bool,
}

impl Call {
    pub fn new(method: Method, url: Url) -> Self {
        let idempotent = method == Method::GET;
        Self { method, url, body: None, headers: Vec::new(), credential: Credential::Current, idempotent }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.credential = Credential::Anon;
        self
    }

    /// Mark a POST that only reads (lookup procedures) as safe to resend.
    pub fn read_only(mut self) -> Self {
        self.idempotent = true;
        self
    }
}

/// Client for the hosted auth / REST / RPC platform.
///
/// Holds the current session; every request carries the project anon key as
/// `apikey` and the session access token (or the anon key) as bearer.
pub struct SupabaseClient {
    http: Client,
    config: ClientConfig,
    session: RwLock<Option<Session>>,
    refresh_lock: Mutex<()>,
    events: broadcast::Sender<SessionChange>,
}

impl SupabaseClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Url::parse(&config.base_url)?;
        let http = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            events,
        })
    }

    pub fn from_backend_config(backend: &BackendConfig) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_backend(backend))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Receive every session change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.events.subscribe()
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Adopt a session persisted by a previous run; no event is emitted.
    pub async fn restore_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub(crate) async fn set_session(&self, session: Option<Session>, event: AuthEvent) {
        *self.session.write().await = session.clone();
        // No receivers is fine.
        let _ = self.events.send(SessionChange { event, session });
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.config.base_url, path))?)
    }

    /// Access token for the next request, refreshing it first when close to expiry.
    pub(crate) async fn access_token(&self) -> Result<Option<String>, ClientError> {
        match self.session().await {
            None => Ok(None),
            Some(s) if !s.expires_within(REFRESH_MARGIN_SECS) => Ok(Some(s.access_token)),
            Some(_) => {
                let _guard = self.refresh_lock.lock().await;
                // Another task may have refreshed while we waited.
                if let Some(s) = self.session().await.filter(|s| !s.expires_within(REFRESH_MARGIN_SECS)) {
                    return Ok(Some(s.access_token));
                }
                match self.refresh_session().await {
                    Ok(s) => Ok(Some(s.access_token)),
                    Err(ClientError::Api { status, message, .. }) => {
                        tracing::warn!("Session refresh rejected ({}): {}, signing out", status, message);
                        self.set_session(None, AuthEvent::SignedOut).await;
                        Err(ClientError::NoSession)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    async fn bearer(&self, credential: &Credential) -> Result<String, ClientError> {
        let token = match credential {
            Credential::Current => self.access_token().await?,
            Credential::Anon => None,
        };
        Ok(token.unwrap_or_else(|| self.config.anon_key.clone()))
    }

    /// Send `call`, retrying 429 responses, and 5xx responses of idempotent calls,
    /// with exponential backoff.
    pub(crate) async fn execute(&self, call: &Call) -> Result<Response, ClientError> {
        let mut attempts = 0;
        let mut delay = self.config.retry.base_delay_ms;

        loop {
            attempts += 1;
            match self.execute_once(call).await {
                Ok(response) => return Ok(response),
                Err(ClientError::RateLimited { retry_after }) => {
                    if attempts > self.config.retry.max_retries {
                        return Err(ClientError::Timeout(attempts));
                    }
                    let wait = retry_after
                        .map_or(delay, |s| s.saturating_mul(1000))
                        .min(self.config.retry.max_delay_ms);
                    tracing::debug!("Rate limited, waiting {}ms (attempt {})", wait, attempts);
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    delay = (delay * 2).min(self.config.retry.max_delay_ms);
                }
                Err(ClientError::ServerError { status, .. }) if status >= 500 && call.idempotent => {
                    if attempts > self.config.retry.max_retries {
                        return Err(ClientError::Timeout(attempts));
                    }
                    tracing::debug!("Server error {}, retrying (attempt {})", status, attempts);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.config.retry.max_delay_ms);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_once(&self, call: &Call) -> Result<Response, ClientError> {
        let token = self.bearer(&call.credential).await?;
        let mut request = self
            .http
            .request(call.method.clone(), call.url.clone())
            .header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", token));
        for (name, value) in &call.headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        tracing::trace!("{} {}", call.method, call.url.path());
        check_status(request.send().await?).await
    }

    /// Exchange the stored refresh token for a new session.
    ///
    /// Talks to the auth endpoint directly, without the retry loop.
    pub async fn refresh_session(&self) -> Result<Session, ClientError> {
        let refresh_token = self
            .session()
            .await
            .map(|s| s.refresh_token)
            .ok_or(ClientError::NoSession)?;
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.anon_key))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let session: Session = decode(check_status(response).await?).await?;
        let session = session.with_computed_expiry();
        tracing::debug!("Session refreshed, valid for {}s", session.remaining_seconds());
        self.set_session(Some(session.clone()), AuthEvent::TokenRefreshed).await;
        Ok(session)
    }
}

/// Classify a response by status: 429, 5xx, other 4xx, or success.
pub(crate) async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        return Err(ClientError::RateLimited { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        return Err(ClientError::ServerError { status: status.as_u16(), message: body });
    }

    let (code, message) = parse_error_body(&body, status.canonical_reason().unwrap_or("error"));
    Err(ClientError::Api { status: status.as_u16(), code, message })
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        let snippet: String = text.chars().take(200).collect();
        ClientError::InvalidResponse(format!("{}: {}", e, snippet))
    })
}
