//! # Reiki Client
//!
//! HTTP SDK for the hosted platform behind Reiki Agenda: password auth with
//! token refresh, PostgREST table access, and remote procedure calls, with
//! retry on 429/5xx. [`SupabaseClient`] implements
//! [`reiki_core::AgendaBackend`], so the view services run on it directly.
//!
//! ```no_run
//! # async fn demo() -> Result<(), reiki_client::ClientError> {
//! use reiki_client::{ClientConfig, SupabaseClient};
//!
//! let client = SupabaseClient::new(ClientConfig::new("https://xyz.supabase.co", "anon-key"))?;
//! let therapists: Vec<reiki_types::TherapistSummary> =
//!     client.rpc("list_therapists", &serde_json::json!({})).await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod backend;
mod client;
mod error;
mod rest;
mod rpc;
mod types;

pub use client::SupabaseClient;
pub use error::ClientError;
pub use rest::Query;
pub use types::*;
