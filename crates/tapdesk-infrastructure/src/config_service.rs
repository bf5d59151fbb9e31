//! Configuration service implementation.
//!
//! Loads `DeskConfig` from `config.toml` and layers environment overrides
//! on top:
//!
//! | Variable | Field |
//! |---|---|
//! | `TAPDESK_APP_ID` | `backend.app_id` |
//! | `TAPDESK_APP_KEY` | `backend.app_key` |
//! | `TAPDESK_SERVER_URL` | `backend.server_url` |
//! | `TAPDESK_ENABLE_LEANCLOUD_INTEGRATION` | `enable_leancloud_integration` |

use crate::paths::DeskPaths;
use std::fs;
use std::sync::{Arc, PoisonError, RwLock};
use tapdesk_core::Result;
use tapdesk_core::config::DeskConfig;

pub const ENV_APP_ID: &str = "TAPDESK_APP_ID";
pub const ENV_APP_KEY: &str = "TAPDESK_APP_KEY";
pub const ENV_SERVER_URL: &str = "TAPDESK_SERVER_URL";
pub const ENV_ENABLE_LEANCLOUD_INTEGRATION: &str = "TAPDESK_ENABLE_LEANCLOUD_INTEGRATION";

/// Configuration service that loads and caches the desk configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: DeskPaths,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<DeskConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new(paths: DeskPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<DeskConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.stored_config()?;
        apply_overrides(&mut loaded, |key| std::env::var(key).ok());

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Writes `config` to `config.toml` and drops the cached copy.
    pub fn save(&self, config: &DeskConfig) -> Result<()> {
        let path = self.paths.config_file()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(config)?)?;
        tracing::debug!("[ConfigService] Saved config to {:?}", path);
        self.invalidate_cache();
        Ok(())
    }

    /// Reads `config.toml` without environment overrides.
    ///
    /// A missing or empty file yields the defaults.
    pub fn stored_config(&self) -> Result<DeskConfig> {
        let path = self.paths.config_file()?;
        if !path.exists() {
            tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
            return Ok(DeskConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(DeskConfig::default());
        }
        Ok(toml::from_str(&content)?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(DeskPaths::default())
    }
}

/// Applies environment-style overrides; empty values are ignored.
pub fn apply_overrides(config: &mut DeskConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(app_id) = lookup(ENV_APP_ID) {
        config.backend.app_id = app_id;
    }
    if let Some(app_key) = lookup(ENV_APP_KEY) {
        config.backend.app_key = app_key;
    }
    if let Some(server_url) = lookup(ENV_SERVER_URL) {
        config.backend.server_url = server_url;
    }
    if let Some(flag) = lookup(ENV_ENABLE_LEANCLOUD_INTEGRATION) {
        config.enable_leancloud_integration =
            matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }
}
