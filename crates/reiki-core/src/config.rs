//! Data directory and `config.json` persistence.

use std::fs;
use std::path::{Path, PathBuf};

use reiki_types::{AgendaConfig, ConfigError};

use crate::error::AppResult;

const DATA_DIR: &str = ".reiki-agenda";
const CONFIG_FILE: &str = "config.json";

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "REIKI_AGENDA_DATA_DIR";
pub const URL_ENV: &str = "REIKI_SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "REIKI_SUPABASE_ANON_KEY";

/// Get the data directory path, creating it if needed.
pub fn get_data_dir() -> AppResult<PathBuf> {
    let data_dir = if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::Storage {
            message: "Cannot get home directory".to_string(),
        })?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load `config.json` from `data_dir` (defaults when absent) and validate it.
pub fn load_config_from(data_dir: &Path) -> AppResult<AgendaConfig> {
    let path = config_path(data_dir);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            field: CONFIG_FILE.to_string(),
            message: e.to_string(),
        })?
    } else {
        AgendaConfig::default()
    };
    config.check()?;
    Ok(config)
}

/// Load the config from the default data directory with environment overrides applied.
pub fn load_config() -> AppResult<AgendaConfig> {
    let data_dir = get_data_dir()?;
    let mut config = load_config_from(&data_dir)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Override backend settings from the environment (non-empty values only).
pub fn apply_env_overrides<F>(config: &mut AgendaConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.backend.url = url;
    }
    if let Some(key) = lookup(ANON_KEY_ENV).filter(|v| !v.trim().is_empty()) {
        config.backend.anon_key = key;
    }
}

/// Save `config.json` atomically.
pub fn save_config_to(data_dir: &Path, config: &AgendaConfig) -> AppResult<()> {
    config.check()?;
    let path = config_path(data_dir);
    let temp_path = data_dir.join(format!("{}.tmp", CONFIG_FILE));

    let content = serde_json::to_string_pretty(config)?;
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, &path)?;
    Ok(())
}

/// Update specific fields in the config.
pub fn update_config_in<F>(data_dir: &Path, updater: F) -> AppResult<AgendaConfig>
where
    F: FnOnce(&mut AgendaConfig),
{
    let mut config = load_config_from(data_dir)?;
    updater(&mut config);
    save_config_to(data_dir, &config)?;
    Ok(config)
}

/// Set one setting by dotted key, e.g. `schedule.buffer_minutes`.
///
/// An empty value clears optional settings.
pub fn set_value(config: &mut AgendaConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::Invalid { field: key.to_string(), message };
    let value = value.trim();
    match key {
        "backend.url" => config.backend.url = value.to_string(),
        "backend.anon_key" => config.backend.anon_key = value.to_string(),
        "backend.timeout_secs" => {
            config.backend.timeout_secs = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "schedule.day_start_hour" => {
            config.schedule.day_start_hour = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "schedule.day_end_hour" => {
            config.schedule.day_end_hour = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "schedule.slot_minutes" => {
            config.schedule.slot_minutes = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        "schedule.buffer_minutes" => {
            config.schedule.buffer_minutes = parse_optional(value).map_err(invalid)?;
        }
        "schedule.utc_offset_minutes" => {
            config.schedule.utc_offset_minutes = parse_optional(value).map_err(invalid)?;
        }
        "booking.default_service" => config.booking.default_service = value.to_string(),
        "booking.phone_check" => {
            config.booking.phone_check = value.parse().map_err(|e| invalid(format!("{e}")))?;
        }
        _ => return Err(invalid("unknown key".to_string())),
    }
    config.check()
}

fn parse_optional<T: std::str::FromStr>(value: &str) -> Result<Option<T>, String>
where
    T::Err: std::fmt::Display,
{
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e| format!("{e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path()).unwrap();
        assert_eq!(config, AgendaConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let updated = update_config_in(dir.path(), |c| {
            c.backend.url = "https://abc.supabase.co".to_string();
            c.schedule.buffer_minutes = Some(90);
        })
        .unwrap();

        let reloaded = load_config_from(dir.path()).unwrap();
        assert_eq!(reloaded, updated);
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(config_path(dir.path()), "{ not json").unwrap();
        let err = load_config_from(dir.path()).unwrap_err();
        assert!(matches!(err, crate::AppError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_env_overrides_skip_blank_values() {
        let mut config = AgendaConfig::default();
        config.backend.anon_key = "from-file".to_string();
        apply_env_overrides(&mut config, |key| match key {
            URL_ENV => Some("https://env.supabase.co".to_string()),
            ANON_KEY_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.url, "https://env.supabase.co");
        assert_eq!(config.backend.anon_key, "from-file");
    }

    #[test]
    fn test_set_value_by_key() {
        let mut config = AgendaConfig::default();
        set_value(&mut config, "schedule.buffer_minutes", "90").unwrap();
        set_value(&mut config, "booking.phone_check", "true").unwrap();
        assert_eq!(config.schedule.buffer_minutes, Some(90));
        assert!(config.booking.phone_check);

        set_value(&mut config, "schedule.buffer_minutes", "").unwrap();
        assert_eq!(config.schedule.buffer_minutes, None);

        assert!(set_value(&mut config, "schedule.slot_minutes", "abc").is_err());
        assert!(set_value(&mut config, "nope", "1").is_err());
    }
}
