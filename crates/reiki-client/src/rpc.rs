//! Remote procedure calls (`POST /rest/v1/rpc/<name>`).
//!
//! Procedures may write, so a 5xx is not resent unless the call is a lookup.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{decode, Call, SupabaseClient};
use crate::error::ClientError;

impl SupabaseClient {
    fn rpc_call<A>(&self, name: &str, args: &A) -> Result<Call, ClientError>
    where
        A: Serialize + ?Sized,
    {
        tracing::debug!("rpc {}", name);
        Ok(Call::new(Method::POST, self.endpoint(&format!("/rest/v1/rpc/{name}"))?)
            .json(serde_json::to_value(args)?))
    }

    pub async fn rpc<A, T>(&self, name: &str, args: &A) -> Result<T, ClientError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let call = self.rpc_call(name, args)?;
        decode(self.execute(&call).await?).await
    }

    /// Like [`rpc`](Self::rpc) for procedures without side effects; server errors are retried.
    pub async fn rpc_lookup<A, T>(&self, name: &str, args: &A) -> Result<T, ClientError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let call = self.rpc_call(name, args)?.read_only();
        decode(self.execute(&call).await?).await
    }

    /// Call a procedure whose result is ignored (`void` functions answer 204 or `null`).
    pub async fn rpc_void<A>(&self, name: &str, args: &A) -> Result<(), ClientError>
    where
        A: Serialize + ?Sized,
    {
        let call = self.rpc_call(name, args)?;
        self.execute(&call).await?;
        Ok(())
    }
}
