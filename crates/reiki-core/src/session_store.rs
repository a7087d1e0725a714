//! Persisted auth session (`session.json` in the data directory).

use std::fs;
use std::path::{Path, PathBuf};

use reiki_types::Session;

use crate::error::AppResult;

const SESSION_FILE: &str = "session.json";

pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

/// Read the stored session, `None` when nobody is signed in.
pub fn load_session(data_dir: &Path) -> AppResult<Option<Session>> {
    let path = session_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    match serde_json::from_str(&content) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!("Discarding unreadable session file: {}", e);
            clear_session(data_dir)?;
            Ok(None)
        }
    }
}

/// Write the session atomically; owner-only permissions on unix.
pub fn save_session(data_dir: &Path, session: &Session) -> AppResult<()> {
    let path = session_path(data_dir);
    let temp_path = data_dir.join(format!("{}.tmp", SESSION_FILE));

    fs::write(&temp_path, serde_json::to_string_pretty(session)?)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
    }
    fs::rename(&temp_path, &path)?;
    Ok(())
}

pub fn clear_session(data_dir: &Path) -> AppResult<()> {
    let path = session_path(data_dir);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
