//! Domain models for Reiki Agenda.
//!
//! Records mirror remote table rows one-to-one; integrity rules live on the backend.

mod appointment;
mod booking;
mod busy;
mod byosen;
pub mod config;
mod patient;
mod profile;
mod session;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment, VisitRecord};
pub use booking::BookingRequest;
pub use busy::BusySlot;
pub use byosen::{BodyView, ByosenPoint};
pub use config::{AgendaConfig, BackendConfig, BookingConfig, ScheduleConfig};
pub use patient::{MedicalHistory, Patient, PatientDraft};
pub use profile::{Profile, Role, TherapistSummary};
pub use session::{AuthEvent, AuthUser, Session};
