//! Patient rows and their medical history field group.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text medical history stored as a nested JSON object on the patient row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicalHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgeries: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosed_illnesses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_problems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_mental_problems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl MedicalHistory {
    /// Non-empty fields as `(label, value)` pairs, in form order.
    ///
    /// Labels are the column names with underscores replaced by spaces.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("allergies", &self.allergies),
            ("surgeries", &self.surgeries),
            ("diagnosed illnesses", &self.diagnosed_illnesses),
            ("physical problems", &self.physical_problems),
            ("emotional mental problems", &self.emotional_mental_problems),
            ("children", &self.children),
            ("partner", &self.partner),
            ("other", &self.other),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(|v| (label, v))
        })
        .collect()
    }

    /// True when no field carries text.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Set a field by its column name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: Option<String>) -> bool {
        let slot = match field {
            "allergies" => &mut self.allergies,
            "surgeries" => &mut self.surgeries,
            "diagnosed_illnesses" => &mut self.diagnosed_illnesses,
            "physical_problems" => &mut self.physical_problems,
            "emotional_mental_problems" => &mut self.emotional_mental_problems,
            "children" => &mut self.children,
            "partner" => &mut self.partner,
            "other" => &mut self.other,
            _ => return false,
        };
        *slot = value.filter(|v| !v.trim().is_empty());
        true
    }
}

/// A row of the `patients` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    #[serde(default)]
    pub therapist_id: Option<Uuid>,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub consultation_reason: Option<String>,
    #[serde(default)]
    pub medical_history: Option<MedicalHistory>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Start an edit of this patient's file.
    pub fn to_draft(&self) -> PatientDraft {
        PatientDraft {
            therapist_id: self.therapist_id,
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date,
            consultation_reason: self.consultation_reason.clone(),
            medical_history: self.medical_history.clone().unwrap_or_default(),
        }
    }
}

/// Insert/update payload for the `patients` table.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PatientDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub therapist_id: Option<Uuid>,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub consultation_reason: Option<String>,
    pub medical_history: MedicalHistory,
}

impl PatientDraft {
    /// New draft with just a name.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self { full_name: full_name.into(), ..Self::default() }
    }

    /// Trim text fields and turn blank optional ones into `None`.
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.phone = blank_to_none(self.phone);
        self.email = blank_to_none(self.email);
        self.consultation_reason = blank_to_none(self.consultation_reason);
        self
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entries_skip_blank_fields() {
        let history = MedicalHistory {
            allergies: Some("polen".to_string()),
            surgeries: Some("   ".to_string()),
            emotional_mental_problems: Some("ansiedad".to_string()),
            ..MedicalHistory::default()
        };

        let entries = history.entries();
        assert_eq!(entries, vec![("allergies", "polen"), ("emotional mental problems", "ansiedad")]);
        assert!(!history.is_empty());
        assert!(MedicalHistory::default().is_empty());
    }

    #[test]
    fn test_history_set_by_column() {
        let mut history = MedicalHistory::default();
        assert!(history.set("partner", Some("casada".to_string())));
        assert!(history.set("other", Some(" ".to_string())));
        assert!(!history.set("blood_type", Some("0+".to_string())));

        assert_eq!(history.partner.as_deref(), Some("casada"));
        assert_eq!(history.other, None);
    }

    #[test]
    fn test_patient_row_with_nulls() {
        let json = r#"{
            "id": "0b9a4d56-08a1-4d49-a0cf-96c4f7a33e51",
            "therapist_id": null,
            "full_name": "Ana Pérez",
            "phone": null,
            "email": null,
            "birth_date": "1988-03-14",
            "consultation_reason": null,
            "medical_history": {"allergies": "nuez"},
            "created_at": "2024-05-01T12:00:00+00:00"
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();

        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1988, 3, 14));
        assert_eq!(patient.medical_history.unwrap().allergies.as_deref(), Some("nuez"));
    }

    #[test]
    fn test_draft_normalization() {
        let draft = PatientDraft {
            full_name: "  Luis  ".to_string(),
            phone: Some(" ".to_string()),
            email: Some(" luis@example.com ".to_string()),
            ..PatientDraft::default()
        }
        .normalized();

        assert_eq!(draft.full_name, "Luis");
        assert_eq!(draft.phone, None);
        assert_eq!(draft.email.as_deref(), Some("luis@example.com"));
    }
}
