//! View services: the state and actions behind each screen, independent of how they are shown.

pub mod access;
pub mod admin;
pub mod overview;
pub mod patients;
pub mod public_booking;
pub mod therapist;

pub use access::{require_admin, require_therapist, Access};
pub use admin::AdminPanel;
pub use overview::{day_overview, TherapistDay};
pub use patients::{filter_patients, PatientFile, PatientsBook, VisitDraft};
pub use public_booking::{BookingForm, PublicBooking};
pub use therapist::{AppointmentDialog, TherapistAgenda};
