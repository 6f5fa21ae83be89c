//! Saved login state on disk.
//!
//! One TOML file holds the server, who logged in, and the Bearer token.
//! Commands load it to resume the session; `login` writes it; `logout`
//! removes it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nubo_core::error::AppError;
use nubo_core::result::AppResult;

/// The saved session written by `login` and `register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Server the token belongs to.
    pub server: String,
    /// Email of the logged-in account.
    pub email: String,
    /// Bearer token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// Where the session file lives unless overridden: `NUBO_SESSION_FILE`,
/// then `$HOME/.nubo/session.toml`, then `./.nubo-session.toml`.
pub fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var("NUBO_SESSION_FILE") {
        return PathBuf::from(path);
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".nubo").join("session.toml"),
        Err(_) => PathBuf::from(".nubo-session.toml"),
    }
}

/// Load the saved session, if one exists.
pub fn load(path: &Path) -> AppResult<Option<StoredSession>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::configuration(format!(
                "Failed to read session file {}: {e}",
                path.display()
            )));
        }
    };
    let session = toml::from_str(&raw).map_err(|e| {
        AppError::configuration(format!(
            "Session file {} is not valid; delete it and log in again: {e}",
            path.display()
        ))
    })?;
    Ok(Some(session))
}

/// Write the session file, creating parent directories as needed.
pub fn save(path: &Path, session: &StoredSession) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::internal(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
    }
    let raw = toml::to_string_pretty(session)
        .map_err(|e| AppError::internal(format!("Failed to encode session: {e}")))?;
    std::fs::write(path, raw).map_err(|e| {
        AppError::internal(format!(
            "Failed to write session file {}: {e}",
            path.display()
        ))
    })
}

/// Remove the session file. Removing a missing file succeeds.
pub fn clear(path: &Path) -> AppResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::internal(format!(
            "Failed to remove session file {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubo_core::error::ErrorKind;

    fn sample() -> StoredSession {
        StoredSession {
            server: "http://127.0.0.1:8080".to_string(),
            email: "ada@example.com".to_string(),
            token: "token-123".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        save(&path, &sample()).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.email, "ada@example.com");
        assert_eq!(loaded.token, "token-123");
    }

    #[test]
    fn missing_file_loads_as_none_and_clears_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load(&path).unwrap().is_none());
        clear(&path).unwrap();
    }

    #[test]
    fn corrupt_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let err = load(&path).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
