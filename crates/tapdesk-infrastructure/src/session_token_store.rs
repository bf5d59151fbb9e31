//! Persistence of the session token between CLI invocations.
//!
//! Only the token is stored; the user record is always re-fetched from the
//! backend when the session is restored.

use crate::paths::DeskPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tapdesk_core::Result;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    session_token: String,
}

/// Reads and writes `session.json`.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    path: PathBuf,
}

impl SessionTokenStore {
    pub fn new(paths: &DeskPaths) -> Result<Self> {
        Ok(Self {
            path: paths.session_file()?,
        })
    }

    /// Returns the stored token, if any.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&content)?;
        Ok(Some(stored.session_token).filter(|token| !token.is_empty()))
    }

    /// Stores `session_token`, readable by the current user only.
    pub fn save(&self, session_token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            session_token: session_token.to_string(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!("[SessionTokenStore] Saved session token to {:?}", self.path);
        Ok(())
    }

    /// Removes the stored token. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
