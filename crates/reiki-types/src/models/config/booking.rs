//! Public booking settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct BookingConfig {
    /// Service used when the form leaves it blank
    #[validate(length(min = 1_u64))]
    #[serde(default = "default_service")]
    pub default_service: String,
    /// Book through `book_appointment_with_phone_check` instead of `book_appointment`
    #[serde(default)]
    pub phone_check: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { default_service: default_service(), phone_check: false }
    }
}

fn default_service() -> String {
    "Reiki".to_string()
}
