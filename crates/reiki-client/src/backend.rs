//! [`AgendaBackend`] over the hosted tables and remote procedures.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::json;
use uuid::Uuid;

use reiki_core::backend::{AgendaBackend, BackendResult};
use reiki_types::{
    Appointment, AuthUser, BackendError, BookingRequest, BusySlot, NewAppointment, Patient,
    PatientDraft, Profile, Role, TherapistSummary, VisitRecord,
};

use crate::client::SupabaseClient;
use crate::rest::Query;

const PROFILE_COLUMNS: &str = "id,full_name,role,is_active,color,phone";

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// First row of an update, or `NotFound` when row-level security hid every row.
fn first_or_missing<T>(rows: Vec<T>, what: String) -> BackendResult<T> {
    rows.into_iter().next().ok_or(BackendError::NotFound { what })
}

#[async_trait]
impl AgendaBackend for SupabaseClient {
    async fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        // Refreshes a stale token and drops a dead session.
        match self.access_token().await {
            Ok(_) | Err(crate::ClientError::NoSession) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(self.session().await.map(|s| s.user))
    }

    async fn list_therapists(&self) -> BackendResult<Vec<TherapistSummary>> {
        Ok(self.rpc_lookup("list_therapists", &json!({})).await?)
    }

    async fn get_busy_slots(
        &self,
        therapist_id: Uuid,
        day: NaiveDate,
    ) -> BackendResult<Vec<BusySlot>> {
        Ok(self.rpc_lookup("get_busy_slots", &json!({ "t_id": therapist_id, "day": day })).await?)
    }

    async fn get_all_busy_slots(&self, day: NaiveDate) -> BackendResult<Vec<BusySlot>> {
        Ok(self.rpc_lookup("get_all_busy_slots", &json!({ "day": day })).await?)
    }

    async fn book_appointment(&self, request: &BookingRequest) -> BackendResult<()> {
        Ok(self.rpc_void("book_appointment", request).await?)
    }

    async fn book_appointment_with_phone_check(
        &self,
        request: &BookingRequest,
    ) -> BackendResult<()> {
        Ok(self.rpc_void("book_appointment_with_phone_check", request).await?)
    }

    async fn is_admin(&self, uid: Uuid) -> BackendResult<bool> {
        Ok(self.rpc_lookup("is_admin", &json!({ "uid": uid })).await?)
    }

    async fn is_therapist(&self) -> BackendResult<bool> {
        Ok(self.rpc_lookup("is_therapist", &json!({})).await?)
    }

    async fn admin_set_role(&self, target_user: Uuid, new_role: Role) -> BackendResult<()> {
        let args = json!({ "target_user": target_user, "new_role": new_role.as_str() });
        Ok(self.rpc_void("admin_set_role", &args).await?)
    }

    async fn delete_patient(&self, patient_id: Uuid) -> BackendResult<()> {
        Ok(self.rpc_void("delete_patient", &json!({ "patient_id_to_delete": patient_id })).await?)
    }

    async fn list_profiles(&self) -> BackendResult<Vec<Profile>> {
        let query = Query::table("profiles").select(PROFILE_COLUMNS).order("full_name", true);
        Ok(self.select(&query).await?)
    }

    async fn get_profile(&self, id: Uuid) -> BackendResult<Profile> {
        let query = Query::table("profiles").select(PROFILE_COLUMNS).eq("id", id);
        Ok(self.select_one(&query).await?)
    }

    async fn set_profile_active(&self, id: Uuid, active: bool) -> BackendResult<()> {
        let query = Query::table("profiles").eq("id", id);
        let rows: Vec<serde_json::Value> =
            self.update(&query, &json!({ "is_active": active })).await?;
        first_or_missing(rows, format!("profile {id}")).map(drop)
    }

    async fn list_patients(&self, therapist_id: Uuid) -> BackendResult<Vec<Patient>> {
        let query = Query::table("patients")
            .select("*")
            .eq("therapist_id", therapist_id)
            .order("full_name", true);
        Ok(self.select(&query).await?)
    }

    async fn find_patient_by_name(
        &self,
        therapist_id: Uuid,
        full_name: &str,
    ) -> BackendResult<Option<Patient>> {
        let query = Query::table("patients")
            .select("*")
            .eq("therapist_id", therapist_id)
            .ilike("full_name", full_name)
            .limit(1);
        let rows: Vec<Patient> = self.select(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_patient(&self, draft: &PatientDraft) -> BackendResult<Patient> {
        Ok(self.insert("patients", draft).await?)
    }

    async fn update_patient(&self, id: Uuid, draft: &PatientDraft) -> BackendResult<Patient> {
        let rows = self.update(&Query::table("patients").eq("id", id), draft).await?;
        first_or_missing(rows, format!("patient {id}"))
    }

    async fn list_appointments_between(
        &self,
        therapist_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BackendResult<Vec<Appointment>> {
        let query = Query::table("appointments")
            .select("*")
            .eq("therapist_id", therapist_id)
            .gte("start_at", timestamp(from))
            .lt("start_at", timestamp(to))
            .order("start_at", true);
        Ok(self.select(&query).await?)
    }

    async fn get_appointment(&self, id: Uuid) -> BackendResult<Appointment> {
        let query = Query::table("appointments").select("*").eq("id", id);
        Ok(self.select_one(&query).await?)
    }

    async fn list_patient_appointments(
        &self,
        patient_id: Uuid,
    ) -> BackendResult<Vec<Appointment>> {
        let query = Query::table("appointments")
            .select("*")
            .eq("patient_id", patient_id)
            .order("start_at", false);
        Ok(self.select(&query).await?)
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> BackendResult<Appointment> {
        Ok(self.insert("appointments", appointment).await?)
    }

    async fn update_visit_record(
        &self,
        appointment_id: Uuid,
        record: &VisitRecord,
    ) -> BackendResult<()> {
        let query = Query::table("appointments").eq("id", appointment_id);
        let rows: Vec<serde_json::Value> = self.update(&query, record).await?;
        first_or_missing(rows, format!("appointment {appointment_id}")).map(drop)
    }
}
