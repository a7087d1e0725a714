//! Arguments of the public booking remote procedures.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Arguments for `book_appointment` / `book_appointment_with_phone_check`.
///
/// Serialized with the remote parameter names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookingRequest {
    #[serde(rename = "t_id")]
    pub therapist_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub patient_name: Option<String>,
    pub phone: String,
    pub service: String,
    pub note: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_parameter_names() {
        let req = BookingRequest {
            therapist_id: Uuid::nil(),
            start_at: "2024-05-02T13:00:00Z".parse().unwrap(),
            patient_name: None,
            phone: "1155550000".to_string(),
            service: "Reiki".to_string(),
            note: None,
        };
        let v = serde_json::to_value(&req).unwrap();

        assert!(v.get("t_id").is_some());
        assert!(v.get("therapist_id").is_none());
        assert!(v["patient_name"].is_null());
        assert_eq!(v["service"], "Reiki");
    }
}
