//! # Reiki Types
//!
//! Records, configuration models, and error definitions for Reiki Agenda.
//!
//! - **`error`** - Typed errors for backend calls, booking rules, and configuration
//! - **`models`** - Rows mirrored from the hosted backend (profiles, patients,
//!   appointments, busy slots), auth sessions, and the application config
//!
//! ## Architecture Role
//!
//! `reiki-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                 reiki-types (this crate)
//!                        │
//!            ┌───────────┴───────────┐
//!            ▼                       ▼
//!       reiki-core  ◄──────────  reiki-client
//!            │                       │
//!            └───────────┬───────────┘
//!                        ▼
//!                    reiki-cli
//! ```
//!
//! Field names match the remote column names so rows deserialize as-is.

pub mod error;
pub mod models;

pub use error::{BackendError, BookingError, ConfigError};

pub use models::{
    AgendaConfig, Appointment, AppointmentStatus, AuthEvent, AuthUser, BodyView, BookingRequest,
    BusySlot, ByosenPoint, MedicalHistory, NewAppointment, Patient, PatientDraft, Profile, Role,
    Session, TherapistSummary, VisitRecord,
};
