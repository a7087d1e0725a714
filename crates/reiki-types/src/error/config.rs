//! Configuration errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading, validating or saving configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// A required setting is empty
    #[error("Missing configuration value: {key}")]
    Missing {
        /// Dotted key of the missing setting
        key: String,
    },

    /// A setting failed validation
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Reading or writing the config file failed
    #[error("Config storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },
}
