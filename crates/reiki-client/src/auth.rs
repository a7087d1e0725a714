//! Password auth: sign-up, sign-in, current user, sign-out.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use reiki_types::{AuthEvent, AuthUser, Session};

use crate::client::{decode, Call, SupabaseClient};
use crate::error::ClientError;

/// Sign-up answers with a session when e-mail confirmation is off, with the bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(AuthUser),
}

impl SupabaseClient {
    /// Register a new account. Returns `None` when the address still has to be confirmed.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Option<Session>, ClientError> {
        let call = Call::new(Method::POST, self.endpoint("/auth/v1/signup")?)
            .anonymous()
            .json(json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }));
        match decode(self.execute(&call).await?).await? {
            SignUpResponse::Session(session) => {
                let session = session.with_computed_expiry();
                tracing::info!("Signed up and signed in as {}", session.user.id);
                self.set_session(Some(session.clone()), AuthEvent::SignedIn).await;
                Ok(Some(session))
            }
            SignUpResponse::User(user) => {
                tracing::info!("Signed up {}, confirmation pending", user.id);
                Ok(None)
            }
        }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let call = Call::new(Method::POST, url)
            .anonymous()
            .json(json!({ "email": email, "password": password }));

        let session: Session = decode(self.execute(&call).await?).await?;
        let session = session.with_computed_expiry();
        tracing::info!("Signed in as {}", session.user.id);
        self.set_session(Some(session.clone()), AuthEvent::SignedIn).await;
        Ok(session)
    }

    /// Current session, refreshed first when it is about to expire.
    ///
    /// A refresh the server rejects ends the session and yields `None`.
    pub async fn get_session(&self) -> Result<Option<Session>, ClientError> {
        match self.access_token().await {
            Ok(_) | Err(ClientError::NoSession) => Ok(self.session().await),
            Err(e) => Err(e),
        }
    }

    /// Ask the auth server who the current token belongs to.
    pub async fn get_user(&self) -> Result<AuthUser, ClientError> {
        if self.session().await.is_none() {
            return Err(ClientError::NoSession);
        }
        let call = Call::new(Method::GET, self.endpoint("/auth/v1/user")?);
        decode(self.execute(&call).await?).await
    }

    /// Revoke the session remotely (best effort) and forget it locally.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        if self.session().await.is_none() {
            return Ok(());
        }
        let call = Call::new(Method::POST, self.endpoint("/auth/v1/logout")?);
        if let Err(e) = self.execute(&call).await {
            tracing::warn!("Remote logout failed: {}", e);
        }
        self.set_session(None, AuthEvent::SignedOut).await;
        Ok(())
    }
}
