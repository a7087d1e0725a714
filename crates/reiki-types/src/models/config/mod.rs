//! Application configuration models.

mod backend;
mod booking;
mod schedule;

pub use backend::BackendConfig;
pub use booking::BookingConfig;
pub use schedule::ScheduleConfig;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// Full application configuration (`config.json` in the data directory).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, Validate)]
pub struct AgendaConfig {
    /// Hosted backend connection
    #[serde(default)]
    #[validate(nested)]
    pub backend: BackendConfig,
    /// Working-day window and slot grid
    #[serde(default)]
    #[validate(nested)]
    pub schedule: ScheduleConfig,
    /// Public booking behaviour
    #[serde(default)]
    #[validate(nested)]
    pub booking: BookingConfig,
}

impl AgendaConfig {
    /// Run field validation and map failures to [`ConfigError::Invalid`].
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::Invalid {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Fail unless the backend URL and anon key are both set.
    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Missing { key: "backend.url".to_string() });
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing { key: "backend.anon_key".to_string() });
        }
        Ok(&self.backend)
    }
}
