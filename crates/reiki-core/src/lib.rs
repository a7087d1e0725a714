//! # Reiki Core
//!
//! Client-side logic for Reiki Agenda.
//!
//! ```text
//! reiki-core/src/
//! ├── availability/   # day window, slot grid, occupancy, buffer policy
//! ├── calendar.rs     # month grid for the date picker
//! ├── body_map.rs     # byosen point editor
//! ├── backend.rs      # AgendaBackend trait (implemented by reiki-client)
//! ├── services/       # public booking, therapist panel, patients, admin
//! ├── config.rs       # data dir + config.json
//! └── session_store.rs
//! ```
//!
//! Double-booking prevention and role checks are enforced by the hosted
//! backend; the checks here only keep the UI honest.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Mutex guards in test backends are held for the whole statement"
)]
#![allow(
    clippy::derive_partial_eq_without_eq,
    reason = "Some types intentionally don't implement Eq"
)]
// Test-only lints: allow panic!, println!, etc. in test code
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::float_cmp, clippy::unwrap_used)
)]

pub mod availability;
pub mod backend;
pub mod body_map;
pub mod calendar;
pub mod config;
pub mod error;
pub mod logger;
pub mod services;
pub mod session_store;

#[cfg(test)]
mod test_helpers;

pub use backend::{AgendaBackend, BackendResult};
pub use error::{AppError, AppResult};
