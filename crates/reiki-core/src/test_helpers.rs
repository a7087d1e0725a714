//! In-memory [`AgendaBackend`] for service unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

use reiki_types::{
    Appointment, AuthUser, BackendError, BookingRequest, BusySlot, NewAppointment, Patient,
    PatientDraft, Profile, Role, TherapistSummary, VisitRecord,
};

use crate::backend::{AgendaBackend, BackendResult};

#[derive(Default)]
pub struct State {
    pub user: Option<AuthUser>,
    pub profiles: Vec<Profile>,
    pub busy: Vec<BusySlot>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub bookings: Vec<(BookingRequest, bool)>,
    pub admins: Vec<Uuid>,
    pub fail_is_admin: bool,
    pub fail_profiles: bool,
    pub reject_bookings: bool,
    /// Offset the busy procedures use to decide which local day a row falls on.
    pub utc_offset_minutes: i32,
}

impl State {
    fn local_day(&self, t: DateTime<Utc>) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).expect("valid offset");
        t.with_timezone(&offset).date_naive()
    }
}

/// Backend keeping rows in memory; every field is public for assertions.
#[derive(Default)]
pub struct MemoryBackend {
    pub state: Mutex<State>,
}

impl MemoryBackend {
    pub fn with_user(profile: Profile) -> Self {
        let backend = Self::default();
        {
            let mut s = backend.state.lock().unwrap();
            s.user = Some(AuthUser { id: profile.id, email: None });
            if profile.role == Role::Admin {
                s.admins.push(profile.id);
            }
            s.profiles.push(profile);
        }
        backend
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

pub fn profile(name: &str, role: Role) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        full_name: Some(name.to_string()),
        role,
        is_active: true,
        color: None,
        phone: None,
    }
}

fn book(state: &mut State, request: &BookingRequest, phone_check: bool) -> BackendResult<()> {
    if state.reject_bookings {
        return Err(BackendError::Conflict { message: "slot taken".to_string() });
    }
    state.busy.push(BusySlot {
        therapist_id: Some(request.therapist_id),
        start_at: request.start_at,
        end_at: request.start_at + Duration::minutes(30),
        status: "scheduled".to_string(),
    });
    state.bookings.push((request.clone(), phone_check));
    Ok(())
}

#[async_trait]
impl AgendaBackend for MemoryBackend {
    async fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        Ok(self.state().user.clone())
    }

    async fn list_therapists(&self) -> BackendResult<Vec<TherapistSummary>> {
        Ok(self
            .state()
            .profiles
            .iter()
            .filter(|p| p.is_active)
            .map(TherapistSummary::from)
            .collect())
    }

    async fn get_busy_slots(
        &self,
        therapist_id: Uuid,
        day: NaiveDate,
    ) -> BackendResult<Vec<BusySlot>> {
        let s = self.state();
        Ok(s.busy
            .iter()
            .filter(|b| b.therapist_id == Some(therapist_id) && s.local_day(b.start_at) == day)
            .map(|b| BusySlot { therapist_id: None, ..b.clone() })
            .collect())
    }

    async fn get_all_busy_slots(&self, day: NaiveDate) -> BackendResult<Vec<BusySlot>> {
        let s = self.state();
        Ok(s.busy.iter().filter(|b| s.local_day(b.start_at) == day).cloned().collect())
    }

    async fn book_appointment(&self, request: &BookingRequest) -> BackendResult<()> {
        book(&mut self.state(), request, false)
    }

    async fn book_appointment_with_phone_check(
        &self,
        request: &BookingRequest,
    ) -> BackendResult<()> {
        book(&mut self.state(), request, true)
    }

    async fn is_admin(&self, uid: Uuid) -> BackendResult<bool> {
        let s = self.state();
        if s.fail_is_admin {
            return Err(BackendError::Transport { message: "boom".to_string() });
        }
        Ok(s.admins.contains(&uid))
    }

    async fn is_therapist(&self) -> BackendResult<bool> {
        let s = self.state();
        let uid = s.user.as_ref().map(|u| u.id);
        Ok(s.profiles.iter().any(|p| Some(p.id) == uid && p.role == Role::Therapist))
    }

    async fn admin_set_role(&self, target_user: Uuid, new_role: Role) -> BackendResult<()> {
        let mut s = self.state();
        let p = s
            .profiles
            .iter_mut()
            .find(|p| p.id == target_user)
            .ok_or(BackendError::NotFound { what: target_user.to_string() })?;
        p.role = new_role;
        Ok(())
    }

    async fn delete_patient(&self, patient_id: Uuid) -> BackendResult<()> {
        let mut s = self.state();
        s.patients.retain(|p| p.id != patient_id);
        s.appointments.retain(|a| a.patient_id != Some(patient_id));
        Ok(())
    }

    async fn list_profiles(&self) -> BackendResult<Vec<Profile>> {
        let s = self.state();
        if s.fail_profiles {
            return Err(BackendError::Forbidden);
        }
        let mut rows = s.profiles.clone();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    async fn get_profile(&self, id: Uuid) -> BackendResult<Profile> {
        let s = self.state();
        if s.fail_profiles {
            return Err(BackendError::Forbidden);
        }
        s.profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(BackendError::NotFound { what: id.to_string() })
    }

    async fn set_profile_active(&self, id: Uuid, active: bool) -> BackendResult<()> {
        let mut s = self.state();
        let p = s
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BackendError::NotFound { what: id.to_string() })?;
        p.is_active = active;
        Ok(())
    }

    async fn list_patients(&self, therapist_id: Uuid) -> BackendResult<Vec<Patient>> {
        let mut rows: Vec<Patient> = self
            .state()
            .patients
            .iter()
            .filter(|p| p.therapist_id == Some(therapist_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    async fn find_patient_by_name(
        &self,
        therapist_id: Uuid,
        full_name: &str,
    ) -> BackendResult<Option<Patient>> {
        Ok(self
            .state()
            .patients
            .iter()
            .find(|p| {
                p.therapist_id == Some(therapist_id)
                    && p.full_name.to_lowercase() == full_name.to_lowercase()
            })
            .cloned())
    }

    async fn insert_patient(&self, draft: &PatientDraft) -> BackendResult<Patient> {
        let patient = Patient {
            id: Uuid::new_v4(),
            therapist_id: draft.therapist_id,
            full_name: draft.full_name.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            birth_date: draft.birth_date,
            consultation_reason: draft.consultation_reason.clone(),
            medical_history: Some(draft.medical_history.clone()),
            created_at: Some(Utc::now()),
        };
        self.state().patients.push(patient.clone());
        Ok(patient)
    }

    async fn update_patient(&self, id: Uuid, draft: &PatientDraft) -> BackendResult<Patient> {
        let mut s = self.state();
        let p = s
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BackendError::NotFound { what: id.to_string() })?;
        p.full_name = draft.full_name.clone();
        p.phone = draft.phone.clone();
        p.email = draft.email.clone();
        p.birth_date = draft.birth_date;
        p.consultation_reason = draft.consultation_reason.clone();
        p.medical_history = Some(draft.medical_history.clone());
        Ok(p.clone())
    }

    async fn list_appointments_between(
        &self,
        therapist_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BackendResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .state()
            .appointments
            .iter()
            .filter(|a| a.therapist_id == Some(therapist_id) && a.start_at >= from && a.start_at < to)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.start_at);
        Ok(rows)
    }

    async fn get_appointment(&self, id: Uuid) -> BackendResult<Appointment> {
        self.state()
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(BackendError::NotFound { what: id.to_string() })
    }

    async fn list_patient_appointments(
        &self,
        patient_id: Uuid,
    ) -> BackendResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .state()
            .appointments
            .iter()
            .filter(|a| a.patient_id == Some(patient_id))
            .cloned()
            .collect();
        rows.sort_by_key(|a| std::cmp::Reverse(a.start_at));
        Ok(rows)
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> BackendResult<Appointment> {
        let mut s = self.state();
        let clash = s.busy.iter().any(|b| {
            b.therapist_id == Some(appointment.therapist_id) && b.start_at == appointment.start_at
        });
        if clash {
            return Err(BackendError::Conflict { message: "duplicate key".to_string() });
        }
        let row = Appointment {
            id: Uuid::new_v4(),
            therapist_id: Some(appointment.therapist_id),
            patient_id: appointment.patient_id,
            start_at: appointment.start_at,
            end_at: Some(appointment.end_at),
            status: appointment.status,
            service: Some(appointment.service.clone()),
            note: appointment.note.clone(),
            visit_observations: None,
            byosen_points: None,
        };
        s.busy.push(BusySlot {
            therapist_id: Some(appointment.therapist_id),
            start_at: appointment.start_at,
            end_at: appointment.end_at,
            status: appointment.status.to_string(),
        });
        s.appointments.push(row.clone());
        Ok(row)
    }

    async fn update_visit_record(
        &self,
        appointment_id: Uuid,
        record: &VisitRecord,
    ) -> BackendResult<()> {
        let mut s = self.state();
        let a = s
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .ok_or(BackendError::NotFound { what: appointment_id.to_string() })?;
        a.visit_observations = Some(record.visit_observations.clone());
        a.byosen_points = Some(record.byosen_points.clone());
        Ok(())
    }
}
