//! Appointment rows and write payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ByosenPoint;

/// Lifecycle status of an appointment row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Cancelled,
    NoShow,
    /// Time the therapist blocked without a patient
    Blocked,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoShow => write!(f, "no_show"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// A row of the `appointments` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    #[serde(default)]
    pub therapist_id: Option<Uuid>,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Free-text notes written after the session
    #[serde(default)]
    pub visit_observations: Option<String>,
    #[serde(default)]
    pub byosen_points: Option<Vec<ByosenPoint>>,
}

impl Appointment {
    /// Length of the appointment, zero when the end is unknown.
    pub fn duration(&self) -> Duration {
        self.end_at.map_or_else(Duration::zero, |end| end - self.start_at)
    }

    /// Service name shown in agenda cells.
    pub fn service_label(&self) -> &str {
        match self.service.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => "Turno",
        }
    }

    /// Body-map points, empty when none were recorded.
    pub fn points(&self) -> &[ByosenPoint] {
        self.byosen_points.as_deref().unwrap_or_default()
    }
}

/// Insert payload for the `appointments` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAppointment {
    pub therapist_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub service: String,
    pub note: Option<String>,
    pub created_by: Uuid,
}

/// Update payload written from the patient file after a session.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VisitRecord {
    pub visit_observations: String,
    pub byosen_points: Vec<ByosenPoint>,
}
