//! Anonymous booking page: pick a therapist and a day, book a free slot.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use reiki_types::models::{BookingConfig, ScheduleConfig};
use reiki_types::{AgendaConfig, BookingError, BookingRequest, BusySlot, TherapistSummary};

use crate::availability::{is_occupied, BufferPolicy, DayAgenda, DayWindow, Viewer};
use crate::backend::AgendaBackend;
use crate::error::{AppError, AppResult};

pub const BOOKED: &str = "¡Turno reservado!";
pub const BOOKING_FAILED: &str = "No se pudo reservar (¿horario ocupado?). Probá otro horario.";

/// Fields of the public booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub patient_name: Option<String>,
    pub phone: String,
    pub service: Option<String>,
    pub note: Option<String>,
}

impl BookingForm {
    /// Remote procedure arguments; blank optionals become null, a blank service the default.
    pub fn into_request(
        self,
        therapist_id: Uuid,
        start_at: DateTime<Utc>,
        default_service: &str,
    ) -> Result<BookingRequest, BookingError> {
        let phone = self.phone.trim().to_string();
        if phone.is_empty() {
            return Err(BookingError::PhoneRequired);
        }
        Ok(BookingRequest {
            therapist_id,
            start_at,
            patient_name: non_blank(self.patient_name),
            phone,
            service: non_blank(self.service).unwrap_or_else(|| default_service.to_string()),
            note: non_blank(self.note),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Message shown under the form after a booking attempt.
pub fn outcome_message(result: &AppResult<()>) -> &'static str {
    match result {
        Ok(()) => BOOKED,
        Err(AppError::Booking(BookingError::PhoneRequired)) => "El teléfono es obligatorio.",
        Err(_) => BOOKING_FAILED,
    }
}

pub struct PublicBooking {
    backend: Arc<dyn AgendaBackend>,
    schedule: ScheduleConfig,
    booking: BookingConfig,
    therapists: Vec<TherapistSummary>,
    selected: Option<Uuid>,
    day: NaiveDate,
    busy: Vec<BusySlot>,
}

impl PublicBooking {
    pub fn new(backend: Arc<dyn AgendaBackend>, config: &AgendaConfig, day: NaiveDate) -> Self {
        Self {
            backend,
            schedule: config.schedule,
            booking: config.booking.clone(),
            therapists: Vec::new(),
            selected: None,
            day,
            busy: Vec::new(),
        }
    }

    /// Fetch the therapist list; the first one is preselected when nothing is.
    pub async fn load_therapists(&mut self) -> AppResult<&[TherapistSummary]> {
        self.therapists = self.backend.list_therapists().await?;
        if self.selected.is_none() {
            self.selected = self.therapists.first().map(|t| t.id);
        }
        Ok(&self.therapists)
    }

    pub fn therapists(&self) -> &[TherapistSummary] {
        &self.therapists
    }

    pub const fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select_therapist(&mut self, therapist_id: Uuid) {
        if self.selected != Some(therapist_id) {
            self.selected = Some(therapist_id);
            self.busy.clear();
        }
    }

    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn set_day(&mut self, day: NaiveDate) {
        if self.day != day {
            self.day = day;
            self.busy.clear();
        }
    }

    /// Re-fetch busy intervals of the selected therapist for the current day.
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.busy = match self.selected {
            Some(id) => self.backend.get_busy_slots(id, self.day).await?,
            None => Vec::new(),
        };
        Ok(())
    }

    pub fn busy(&self) -> &[BusySlot] {
        &self.busy
    }

    pub fn window(&self) -> DayWindow {
        DayWindow::resolve(self.day, &self.schedule)
    }

    pub fn agenda(&self) -> DayAgenda {
        DayAgenda::build(
            self.window(),
            &self.busy,
            &[],
            BufferPolicy::from_schedule(&self.schedule),
            Viewer::Public,
        )
    }

    /// Book `start` for the selected therapist, then refresh the busy list.
    pub async fn book(&mut self, start: DateTime<Utc>, form: BookingForm) -> AppResult<()> {
        let therapist_id = self.selected.ok_or(BookingError::NoTherapistSelected)?;
        let request = form.into_request(therapist_id, start, &self.booking.default_service)?;

        if !self.window().has_slot(start) {
            return Err(BookingError::OutsideSchedule { start }.into());
        }
        if is_occupied(start, &self.busy, BufferPolicy::from_schedule(&self.schedule)) {
            return Err(BookingError::SlotOccupied { start }.into());
        }

        let result = if self.booking.phone_check {
            self.backend.book_appointment_with_phone_check(&request).await
        } else {
            self.backend.book_appointment(&request).await
        };
        if let Err(e) = result {
            tracing::warn!("Booking {} for {} failed: {}", start, therapist_id, e);
            return Err(e.into());
        }
        tracing::info!("Booked {} for therapist {}", start, therapist_id);

        self.refresh().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::{profile, MemoryBackend};
    use chrono::{FixedOffset, TimeZone};
    use reiki_types::{BackendError, Role};

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

    fn form(phone: &str) -> BookingForm {
        BookingForm {
            patient_name: Some("  ".to_string()),
            phone: phone.to_string(),
            service: None,
            note: Some(" primera vez ".to_string()),
        }
    }

    async fn open_page(backend: Arc<MemoryBackend>) -> PublicBooking {
        let mut page = PublicBooking::new(backend, &config(), day());
        page.load_therapists().await.unwrap();
        page.refresh().await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_first_therapist_preselected() {
        let backend = Arc::new(MemoryBackend::default());
        let t = profile("Ana", Role::Therapist);
        backend.state().profiles.push(t.clone());

        let page = open_page(backend).await;
        assert_eq!(page.selected(), Some(t.id));
        assert_eq!(page.agenda().free_slots().count(), 24);
    }

    #[tokio::test]
    async fn test_book_normalizes_form_and_refreshes() {
        let backend = Arc::new(MemoryBackend::default());
        backend.state().profiles.push(profile("Ana", Role::Therapist));
        let mut page = open_page(backend.clone()).await;

        let result = page.book(at(10, 0), form(" 1155550000 ")).await;
        assert_eq!(outcome_message(&result), BOOKED);

        let (request, phone_check) = backend.state().bookings[0].clone();
        assert!(!phone_check);
        assert_eq!(request.phone, "1155550000");
        assert_eq!(request.patient_name, None);
        assert_eq!(request.service, "Reiki");
        assert_eq!(request.note.as_deref(), Some("primera vez"));

        assert!(!page.agenda().slot_at(at(10, 0)).unwrap().is_free());
    }

    #[tokio::test]
    async fn test_phone_required() {
        let backend = Arc::new(MemoryBackend::default());
        backend.state().profiles.push(profile("Ana", Role::Therapist));
        let mut page = open_page(backend.clone()).await;

        let result = page.book(at(10, 0), form("   ")).await;
        assert!(matches!(result, Err(AppError::Booking(BookingError::PhoneRequired))));
        assert_eq!(outcome_message(&result), "El teléfono es obligatorio.");
        assert!(backend.state().bookings.is_empty());
    }

    #[tokio::test]
    async fn test_occupied_and_out_of_window_refused_locally() {
        let backend = Arc::new(MemoryBackend::default());
        let t = profile("Ana", Role::Therapist);
        backend.state().profiles.push(t.clone());
        backend.state().busy.push(BusySlot {
            therapist_id: Some(t.id),
            ..BusySlot::scheduled(at(11, 0), 60)
        });
        let mut page = open_page(backend.clone()).await;

        let occupied = page.book(at(11, 30), form("1")).await;
        assert!(matches!(occupied, Err(AppError::Booking(BookingError::SlotOccupied { .. }))));

        let late = page.book(at(20, 0), form("1")).await;
        assert!(matches!(late, Err(AppError::Booking(BookingError::OutsideSchedule { .. }))));
        assert_eq!(outcome_message(&late), BOOKING_FAILED);
        assert!(backend.state().bookings.is_empty());
    }

    #[tokio::test]
    async fn test_phone_check_variant_and_remote_conflict() {
        let backend = Arc::new(MemoryBackend::default());
        backend.state().profiles.push(profile("Ana", Role::Therapist));
        let mut config = config();
        config.booking.phone_check = true;
        let mut page = PublicBooking::new(backend.clone(), &config, day());
        page.load_therapists().await.unwrap();

        page.book(at(9, 0), form("1")).await.unwrap();
        assert!(backend.state().bookings[0].1);

        backend.state().reject_bookings = true;
        let err = page.book(at(15, 0), form("1")).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(BackendError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_no_therapist() {
        let mut page = PublicBooking::new(Arc::new(MemoryBackend::default()), &config(), day());
        page.load_therapists().await.unwrap();
        let err = page.book(at(9, 0), form("1")).await.unwrap_err();
        assert!(matches!(err, AppError::Booking(BookingError::NoTherapistSelected)));
    }
}
