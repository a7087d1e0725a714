//! Backend trait for the hosted auth/table/RPC platform.
//!
//! Services in this crate only talk to the backend through [`AgendaBackend`];
//! `reiki-client` provides the HTTP implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use reiki_types::{
    Appointment, AuthUser, BackendError, BookingRequest, BusySlot, NewAppointment, Patient,
    PatientDraft, Profile, Role, TherapistSummary, VisitRecord,
};

pub type BackendResult<T> = Result<T, BackendError>;

#[async_trait]
pub trait AgendaBackend: Send + Sync {
    // --- auth ---
    /// The signed-in user, `None` when there is no session.
    async fn current_user(&self) -> BackendResult<Option<AuthUser>>;

    // --- remote procedures ---
    async fn list_therapists(&self) -> BackendResult<Vec<TherapistSummary>>;
    async fn get_busy_slots(&self, therapist_id: Uuid, day: NaiveDate)
        -> BackendResult<Vec<BusySlot>>;
    async fn get_all_busy_slots(&self, day: NaiveDate) -> BackendResult<Vec<BusySlot>>;
    async fn book_appointment(&self, request: &BookingRequest) -> BackendResult<()>;
    async fn book_appointment_with_phone_check(&self, request: &BookingRequest)
        -> BackendResult<()>;
    async fn is_admin(&self, uid: Uuid) -> BackendResult<bool>;
    async fn is_therapist(&self) -> BackendResult<bool>;
    async fn admin_set_role(&self, target_user: Uuid, new_role: Role) -> BackendResult<()>;
    async fn delete_patient(&self, patient_id: Uuid) -> BackendResult<()>;

    // --- profiles ---
    /// All visible profiles ordered by name.
    async fn list_profiles(&self) -> BackendResult<Vec<Profile>>;
    async fn get_profile(&self, id: Uuid) -> BackendResult<Profile>;
    async fn set_profile_active(&self, id: Uuid, active: bool) -> BackendResult<()>;

    // --- patients ---
    /// Patients owned by a therapist ordered by name.
    async fn list_patients(&self, therapist_id: Uuid) -> BackendResult<Vec<Patient>>;
    /// Case-insensitive exact name match, first row only.
    async fn find_patient_by_name(
        &self,
        therapist_id: Uuid,
        full_name: &str,
    ) -> BackendResult<Option<Patient>>;
    async fn insert_patient(&self, draft: &PatientDraft) -> BackendResult<Patient>;
    async fn update_patient(&self, id: Uuid, draft: &PatientDraft) -> BackendResult<Patient>;

    // --- appointments ---
    /// A therapist's appointments with `from <= start_at < to`, ordered by start.
    async fn list_appointments_between(
        &self,
        therapist_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BackendResult<Vec<Appointment>>;
    async fn get_appointment(&self, id: Uuid) -> BackendResult<Appointment>;
    /// A patient's appointments, newest first.
    async fn list_patient_appointments(&self, patient_id: Uuid)
        -> BackendResult<Vec<Appointment>>;
    async fn insert_appointment(&self, appointment: &NewAppointment)
        -> BackendResult<Appointment>;
    async fn update_visit_record(
        &self,
        appointment_id: Uuid,
        record: &VisitRecord,
    ) -> BackendResult<()>;
}
