//! Profile rows and roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role stored on a profile row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages roles and activation of other profiles
    Admin,
    /// Runs an agenda and owns patients
    Therapist,
}

impl Role {
    /// The other role, used by the admin panel's single toggle button.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::Therapist,
            Self::Therapist => Self::Admin,
        }
    }

    /// Wire name of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Therapist => "therapist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Same id as the auth user
    pub id: Uuid,
    /// Display name, may be unset right after sign-up
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role of the user
    pub role: Role,
    /// Inactive therapists are hidden from public booking
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Agenda color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Profile {
    /// Name shown in listings.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "(sin nombre)",
        }
    }

    /// Whether this profile may use the therapist panel.
    pub const fn can_use_panel(&self) -> bool {
        matches!(self.role, Role::Therapist | Role::Admin)
    }
}

/// Row returned by the `list_therapists` remote procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TherapistSummary {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl TherapistSummary {
    /// Name shown in the therapist selector.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Terapeuta",
        }
    }
}

impl From<&Profile> for TherapistSummary {
    fn from(profile: &Profile) -> Self {
        Self { id: profile.id, full_name: profile.full_name.clone() }
    }
}

const fn default_true() -> bool {
    true
}
