//! Typed error definitions for Reiki Agenda.
//!
//! Each domain gets its own enum. All of them are:
//!
//! - **Serializable** so they can be printed as JSON by the CLI
//! - **Displayable** for logging and inline messages
//! - **Matchable** so callers can degrade (e.g. a failed role check becomes "forbidden")

mod backend;
mod booking;
mod config;

pub use backend::BackendError;
pub use booking::BookingError;
pub use config::ConfigError;
