//! Patient files of the signed-in therapist.

use std::sync::Arc;

use uuid::Uuid;

use reiki_types::{Appointment, BackendError, Patient, PatientDraft, VisitRecord};

use crate::backend::AgendaBackend;
use crate::body_map::BodyMap;
use crate::error::{AppError, AppResult};

/// Case-insensitive substring match on the full name; a blank query keeps everything.
pub fn filter_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let q = query.trim().to_lowercase();
    patients.iter().filter(|p| q.is_empty() || p.full_name.to_lowercase().contains(&q)).collect()
}

/// A patient with their appointment history, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFile {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
}

/// The editable part of an appointment: session notes and body-map marks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitDraft {
    pub observations: String,
    pub body_map: BodyMap,
}

pub struct PatientsBook {
    backend: Arc<dyn AgendaBackend>,
    therapist_id: Uuid,
}

impl PatientsBook {
    pub fn new(backend: Arc<dyn AgendaBackend>, therapist_id: Uuid) -> Self {
        Self { backend, therapist_id }
    }

    pub async fn list(&self) -> AppResult<Vec<Patient>> {
        Ok(self.backend.list_patients(self.therapist_id).await?)
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<Patient>> {
        let all = self.list().await?;
        Ok(filter_patients(&all, query).into_iter().cloned().collect())
    }

    pub async fn open(&self, patient_id: Uuid) -> AppResult<PatientFile> {
        let patient = self
            .list()
            .await?
            .into_iter()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| BackendError::NotFound { what: format!("patient {patient_id}") })?;
        let appointments = self.backend.list_patient_appointments(patient_id).await?;
        Ok(PatientFile { patient, appointments })
    }

    /// Insert when `patient_id` is `None`, otherwise update that row.
    pub async fn save(&self, patient_id: Option<Uuid>, draft: PatientDraft) -> AppResult<Patient> {
        let mut draft = draft.normalized();
        if draft.full_name.is_empty() {
            return Err(AppError::Invalid("patient name is required".to_string()));
        }
        let saved = match patient_id {
            Some(id) => {
                draft.therapist_id = None;
                self.backend.update_patient(id, &draft).await?
            }
            None => {
                draft.therapist_id = Some(self.therapist_id);
                self.backend.insert_patient(&draft).await?
            }
        };
        tracing::info!("Saved patient {} ({})", saved.id, saved.full_name);
        Ok(saved)
    }

    /// Delete a patient and their appointments through the remote procedure.
    pub async fn delete(&self, patient_id: Uuid) -> AppResult<()> {
        self.backend.delete_patient(patient_id).await?;
        tracing::info!("Deleted patient {}", patient_id);
        Ok(())
    }

    /// Load what is already stored on an appointment so edits start from it.
    pub async fn open_visit(&self, appointment_id: Uuid) -> AppResult<VisitDraft> {
        let appointment = self.backend.get_appointment(appointment_id).await?;
        Ok(VisitDraft {
            observations: appointment.visit_observations.clone().unwrap_or_default(),
            body_map: BodyMap::new(appointment.points().to_vec()),
        })
    }

    /// Store session notes and body-map marks on an appointment.
    pub async fn record_visit(
        &self,
        appointment_id: Uuid,
        observations: &str,
        body_map: BodyMap,
    ) -> AppResult<()> {
        let record = VisitRecord {
            visit_observations: observations.trim().to_string(),
            byosen_points: body_map.into_points(),
        };
        self.backend.update_visit_record(appointment_id, &record).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::{profile, MemoryBackend};
    use chrono::{TimeZone, Utc};
    use reiki_types::{AppointmentStatus, BodyView, NewAppointment, Role};

    fn fixture() -> (Arc<MemoryBackend>, PatientsBook) {
        let me = profile("Tom", Role::Therapist);
        let backend = Arc::new(MemoryBackend::with_user(me.clone()));
        let book = PatientsBook::new(backend.clone(), me.id);
        (backend, book)
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let patients: Vec<Patient> = ["Ana Pérez", "Luis Gómez", "Mariana"]
            .iter()
            .map(|n| Patient {
                id: Uuid::new_v4(),
                therapist_id: None,
                full_name: n.to_string(),
                phone: None,
                email: None,
                birth_date: None,
                consultation_reason: None,
                medical_history: None,
                created_at: None,
            })
            .collect();

        let names: Vec<&str> =
            filter_patients(&patients, "ANA").iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Ana Pérez", "Mariana"]);
        assert_eq!(filter_patients(&patients, "  ").len(), 3);
    }

    #[tokio::test]
    async fn test_save_creates_then_updates() {
        let (backend, book) = fixture();
        let created = book.save(None, PatientDraft::named(" Ana ")).await.unwrap();
        assert_eq!(created.full_name, "Ana");
        assert!(created.therapist_id.is_some());

        let mut draft = created.to_draft();
        draft.medical_history.set("allergies", Some("polen".to_string()));
        let updated = book.save(Some(created.id), draft).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(backend.state().patients.len(), 1);
        assert_eq!(book.search("an").await.unwrap().len(), 1);

        let blank = book.save(None, PatientDraft::named("   ")).await.unwrap_err();
        assert!(matches!(blank, AppError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_file_history_visit_and_delete() {
        let (backend, book) = fixture();
        let patient = book.save(None, PatientDraft::named("Ana")).await.unwrap();
        let therapist_id = patient.therapist_id.unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 13, 0, 0).unwrap();
        let appt = backend
            .insert_appointment(&NewAppointment {
                therapist_id,
                patient_id: Some(patient.id),
                start_at: start,
                end_at: start + chrono::Duration::minutes(30),
                status: AppointmentStatus::Scheduled,
                service: "Reiki".to_string(),
                note: None,
                created_by: therapist_id,
            })
            .await
            .unwrap();

        let mut map = BodyMap::default();
        map.toggle(0.5, 0.2, Some(BodyView::Front));
        book.record_visit(appt.id, " calor en el pecho ", map).await.unwrap();

        let file = book.open(patient.id).await.unwrap();
        assert_eq!(file.appointments.len(), 1);
        assert_eq!(file.appointments[0].visit_observations.as_deref(), Some("calor en el pecho"));
        assert_eq!(file.appointments[0].points().len(), 1);

        let mut visit = book.open_visit(appt.id).await.unwrap();
        assert_eq!(visit.observations, "calor en el pecho");
        assert_eq!(visit.body_map.len(), 1);
        visit.body_map.toggle(0.8, 0.8, Some(BodyView::Back));
        book.record_visit(appt.id, &visit.observations, visit.body_map).await.unwrap();
        let file = book.open(patient.id).await.unwrap();
        assert_eq!(file.appointments[0].points().len(), 2);
        assert_eq!(file.appointments[0].visit_observations.as_deref(), Some("calor en el pecho"));

        book.delete(patient.id).await.unwrap();
        assert!(matches!(
            book.open(patient.id).await,
            Err(AppError::Backend(BackendError::NotFound { .. }))
        ));
    }
}
