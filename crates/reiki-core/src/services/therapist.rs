//! Therapist panel: day agendas of every therapist and appointment creation on one's own.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use reiki_types::models::{BookingConfig, ScheduleConfig};
use reiki_types::{
    AgendaConfig, Appointment, AppointmentStatus, AuthUser, BackendError, BookingError,
    NewAppointment, PatientDraft, Profile,
};

use crate::availability::{is_occupied, BufferPolicy, DayAgenda, DayWindow, Viewer};
use crate::backend::AgendaBackend;
use crate::error::{AppError, AppResult};
use crate::services::access::{header_name, signed_in_profile, NO_PERMISSION};

pub const SAVE_FAILED: &str = "Error guardando turno. Verifica que no esté ocupado.";

/// Fields of the "new appointment" dialog opened from a free cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDialog {
    pub patient_name: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub note: Option<String>,
}

pub struct TherapistAgenda {
    backend: Arc<dyn AgendaBackend>,
    schedule: ScheduleConfig,
    booking: BookingConfig,
    user: AuthUser,
    me: Profile,
}

impl TherapistAgenda {
    /// Open the panel for the signed-in user.
    pub async fn open(backend: Arc<dyn AgendaBackend>, config: &AgendaConfig) -> AppResult<Self> {
        let Some((user, me)) = signed_in_profile(backend.as_ref()).await else {
            return Err(AppError::Forbidden(NO_PERMISSION.to_string()));
        };
        if !me.can_use_panel() {
            return Err(AppError::Forbidden(NO_PERMISSION.to_string()));
        }
        Ok(Self { backend, schedule: config.schedule, booking: config.booking.clone(), user, me })
    }

    pub const fn me(&self) -> &Profile {
        &self.me
    }

    pub fn header_name(&self) -> String {
        header_name(&self.user, Some(&self.me))
    }

    /// Profiles shown in the therapist selector.
    pub async fn profiles(&self) -> AppResult<Vec<Profile>> {
        Ok(self.backend.list_profiles().await?)
    }

    /// Agenda of `therapist_id` for `date`; own agendas carry appointment details.
    pub async fn day(&self, therapist_id: Uuid, date: NaiveDate) -> AppResult<DayAgenda> {
        let window = DayWindow::resolve(date, &self.schedule);
        let busy = self.backend.get_busy_slots(therapist_id, date).await?;

        let (viewer, own) = if therapist_id == self.me.id {
            let (from, to) = window.utc_range();
            let own = self.backend.list_appointments_between(self.me.id, from, to).await?;
            (Viewer::Owner, own)
        } else {
            (Viewer::Colleague, Vec::new())
        };

        Ok(DayAgenda::build(window, &busy, &own, BufferPolicy::from_schedule(&self.schedule), viewer))
    }

    /// Create a scheduled appointment of one slot on the caller's own agenda.
    ///
    /// The patient is matched by name (case-insensitive) or created; a blank
    /// name books the slot without a patient.
    pub async fn create_appointment(
        &self,
        start: DateTime<Utc>,
        dialog: AppointmentDialog,
    ) -> AppResult<Appointment> {
        let name = dialog.patient_name.trim();

        let date = crate::availability::local_date(&self.schedule, start);
        let window = DayWindow::resolve(date, &self.schedule);
        if !window.has_slot(start) {
            return Err(BookingError::OutsideSchedule { start }.into());
        }
        let busy = self.backend.get_busy_slots(self.me.id, date).await?;
        if is_occupied(start, &busy, BufferPolicy::from_schedule(&self.schedule)) {
            return Err(BookingError::SlotOccupied { start }.into());
        }

        let patient_id = if name.is_empty() {
            None
        } else {
            Some(self.find_or_create_patient(name, dialog.phone.clone()).await?)
        };

        let service = dialog
            .service
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.booking.default_service.clone());
        let appointment = NewAppointment {
            therapist_id: self.me.id,
            patient_id,
            start_at: start,
            end_at: start + window.slot_length(),
            status: AppointmentStatus::Scheduled,
            service,
            note: dialog.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_by: self.me.id,
        };

        self.backend.insert_appointment(&appointment).await.map_err(|e| {
            tracing::warn!("Saving appointment at {} failed: {}", start, e);
            AppError::from(e)
        })
    }

    async fn find_or_create_patient(&self, name: &str, phone: Option<String>) -> AppResult<Uuid> {
        if let Some(existing) = self.backend.find_patient_by_name(self.me.id, name).await? {
            return Ok(existing.id);
        }
        let draft = PatientDraft {
            therapist_id: Some(self.me.id),
            phone,
            ..PatientDraft::named(name)
        }
        .normalized();
        tracing::info!("Creating patient '{}'", draft.full_name);
        Ok(self.backend.insert_patient(&draft).await?.id)
    }
}

/// Inline message for a failed save; conflicts read as an occupied slot.
pub fn save_error_message(err: &AppError) -> String {
    match err {
        AppError::Backend(BackendError::Conflict { .. })
        | AppError::Booking(BookingError::SlotOccupied { .. }) => SAVE_FAILED.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::availability::SlotState;
    use crate::test_helpers::{profile, MemoryBackend};
    use chrono::{Duration, FixedOffset, TimeZone};
    use reiki_types::{BusySlot, Role};

    fn config() -> AgendaConfig {
        let mut config = AgendaConfig::default();
        config.schedule.utc_offset_minutes = Some(-180);
        config
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 2, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn dialog(name: &str) -> AppointmentDialog {
        AppointmentDialog { patient_name: name.to_string(), ..AppointmentDialog::default() }
    }

    async fn open(backend: &Arc<MemoryBackend>) -> TherapistAgenda {
        TherapistAgenda::open(backend.clone(), &config()).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_requires_profile() {
        let err = TherapistAgenda::open(Arc::new(MemoryBackend::default()), &config()).await;
        assert!(matches!(err, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_appointment_creates_patient_once() {
        let me = profile("Tom", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        let panel = open(&backend).await;

        let first = panel.create_appointment(at(10, 0), dialog("  Ana Pérez ")).await.unwrap();
        let second = panel.create_appointment(at(15, 0), dialog("ana pérez")).await.unwrap();

        assert_eq!(backend.state().patients.len(), 1);
        assert_eq!(first.patient_id, second.patient_id);
        assert_eq!(first.status, AppointmentStatus::Scheduled);
        assert_eq!(first.duration(), Duration::minutes(30));
        assert_eq!(first.service.as_deref(), Some("Reiki"));
        assert_eq!(backend.state().patients[0].full_name, "Ana Pérez");
    }

    #[tokio::test]
    async fn test_own_day_shows_details_colleague_does_not() {
        let me = profile("Tom", Role::Therapist);
        let colleague = profile("Eva", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        backend.state().profiles.push(colleague.clone());
        backend.state().busy.push(BusySlot {
            therapist_id: Some(colleague.id),
            ..BusySlot::scheduled(at(9, 0), 30)
        });
        let panel = open(&backend).await;
        panel.create_appointment(at(10, 0), dialog("Ana")).await.unwrap();

        let mine = panel.day(me.id, day()).await.unwrap();
        assert_eq!(mine.viewer, Viewer::Owner);
        assert!(matches!(mine.slot_at(at(10, 0)).unwrap().state, SlotState::Booked(_)));

        let theirs = panel.day(colleague.id, day()).await.unwrap();
        assert_eq!(theirs.viewer, Viewer::Colleague);
        assert_eq!(theirs.slot_at(at(9, 0)).unwrap().state, SlotState::Occupied);
        assert!(!theirs.slots.iter().any(|s| s.is_selectable(Viewer::Colleague)));
    }

    #[tokio::test]
    async fn test_day_includes_rows_before_utc_midnight() {
        let me = profile("Tom", Role::Therapist);
        let colleague = profile("Eva", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        backend.state().profiles.push(colleague.clone());
        backend.state().utc_offset_minutes = 600;
        // 08:00 at UTC+10 is 22:00 UTC of the day before.
        let early = FixedOffset::east_opt(10 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 2, 8, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        backend.state().busy.push(BusySlot {
            therapist_id: Some(colleague.id),
            ..BusySlot::scheduled(early, 30)
        });

        let mut config = config();
        config.schedule.utc_offset_minutes = Some(600);
        let panel = TherapistAgenda::open(backend.clone(), &config).await.unwrap();

        let theirs = panel.day(colleague.id, day()).await.unwrap();
        assert_eq!(theirs.slot_at(early).unwrap().state, SlotState::Occupied);
    }

    #[tokio::test]
    async fn test_blank_name_books_without_patient() {
        let me = profile("Tom", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        let panel = open(&backend).await;

        let blocked = panel.create_appointment(at(10, 0), dialog("  ")).await.unwrap();
        assert_eq!(blocked.patient_id, None);
        assert_eq!(blocked.therapist_id, Some(me.id));
        assert!(backend.state().patients.is_empty());

        let unnamed = panel.create_appointment(at(11, 0), AppointmentDialog::default()).await.unwrap();
        assert_eq!(unnamed.patient_id, None);
        assert_eq!(backend.state().appointments.len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_occupied_and_off_grid() {
        let me = profile("Tom", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        let panel = open(&backend).await;

        panel.create_appointment(at(10, 0), dialog("Ana")).await.unwrap();
        let taken = panel.create_appointment(at(10, 0), dialog("Luis")).await.unwrap_err();
        assert_eq!(save_error_message(&taken), SAVE_FAILED);

        let off_grid = panel.create_appointment(at(10, 15), dialog("Luis")).await.unwrap_err();
        assert!(matches!(off_grid, AppError::Booking(BookingError::OutsideSchedule { .. })));
    }

    #[tokio::test]
    async fn test_header_name() {
        let backend = Arc::new(MemoryBackend::with_user(profile("Tom", Role::Admin)));
        assert_eq!(open(&backend).await.header_name(), "Tom");
    }
}
