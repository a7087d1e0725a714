//! Table access through the PostgREST endpoint (`/rest/v1/<table>`).

use std::fmt::Display;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{decode, Call, SupabaseClient};
use crate::error::ClientError;

const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");
const SINGLE_OBJECT: (&str, &str) = ("Accept", "application/vnd.pgrst.object+json");

/// Horizontal filters, ordering and column selection for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn table(table: &'static str) -> Self {
        Self { table, params: Vec::new() }
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns.to_string())
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("gte.{value}"))
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("lt.{value}"))
    }

    /// Case-insensitive match; `pattern` is taken literally.
    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        let escaped = pattern.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        self.param(column, format!("ilike.{escaped}"))
    }

    pub fn order(self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.param("order", format!("{column}.{dir}"))
    }

    pub fn limit(self, n: usize) -> Self {
        self.param("limit", n.to_string())
    }

    pub const fn table_name(&self) -> &'static str {
        self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}

impl SupabaseClient {
    fn table_url(&self, query: &Query) -> Result<url::Url, ClientError> {
        let mut url = self.endpoint(&format!("/rest/v1/{}", query.table))?;
        if !query.params.is_empty() {
            url.query_pairs_mut().extend_pairs(query.params.iter());
        }
        Ok(url)
    }

    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, ClientError> {
        let call = Call::new(Method::GET, self.table_url(query)?);
        decode(self.execute(&call).await?).await
    }

    /// Exactly one row; zero rows surface as a `PGRST116` API error.
    pub async fn select_one<T: DeserializeOwned>(&self, query: &Query) -> Result<T, ClientError> {
        let (name, value) = SINGLE_OBJECT;
        let call = Call::new(Method::GET, self.table_url(query)?).header(name, value);
        decode(self.execute(&call).await?).await
    }

    /// Insert one row and return it as stored.
    pub async fn insert<B, T>(&self, table: &'static str, row: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (prefer, representation) = RETURN_REPRESENTATION;
        let (accept, object) = SINGLE_OBJECT;
        let call = Call::new(Method::POST, self.table_url(&Query::table(table))?)
            .header(prefer, representation)
            .header(accept, object)
            .json(serde_json::to_value(row)?);
        decode(self.execute(&call).await?).await
    }

    /// Patch the rows matched by `query`; returns the rows the caller could see and change.
    pub async fn update<B, T>(&self, query: &Query, patch: &B) -> Result<Vec<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (prefer, representation) = RETURN_REPRESENTATION;
        let call = Call::new(Method::PATCH, self.table_url(query)?)
            .header(prefer, representation)
            .json(serde_json::to_value(patch)?);
        decode(self.execute(&call).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let q = Query::table("appointments")
            .select("*")
            .eq("therapist_id", "abc")
            .gte("start_at", "2024-05-02T11:00:00Z")
            .order("start_at", true)
            .limit(5);

        assert_eq!(q.table_name(), "appointments");
        assert_eq!(
            q.params(),
            &[
                ("select".to_string(), "*".to_string()),
                ("therapist_id".to_string(), "eq.abc".to_string()),
                ("start_at".to_string(), "gte.2024-05-02T11:00:00Z".to_string()),
                ("order".to_string(), "start_at.asc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_ilike_escapes_wildcards() {
        let q = Query::table("patients").ilike("full_name", "50%_off");
        assert_eq!(q.params()[0].1, "ilike.50\\%\\_off");
    }
}
