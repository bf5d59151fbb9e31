//! Unified path management for tapdesk configuration files.
//!
//! ```text
//! ~/.config/tapdesk/           # Config directory (platform config dir)
//! ├── config.toml              # Backend credentials, permission baseline
//! └── session.json             # Persisted session token (mode 600)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for tapdesk_core::DeskError {
    fn from(err: PathError) -> Self {
        tapdesk_core::DeskError::config(err.to_string())
    }
}

/// Path resolution rooted at an optional override directory.
///
/// Tests and the CLI's `--config-dir` flag pass an explicit root; otherwise
/// the platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct DeskPaths {
    root: Option<PathBuf>,
}

impl DeskPaths {
    const APP_DIR: &'static str = "tapdesk";

    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the tapdesk configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(Self::APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session token.
    ///
    /// # Security Note
    ///
    /// The token grants full access to the user's account; the file is
    /// written with mode 600 on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}
