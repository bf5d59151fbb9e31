use crate::error::{DeskError, Result};
use crate::permission::Permissions;
use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DeskConfig {
    /// Enables the LeanCloud app lookup (ticket ↔ app association).
    #[serde(default)]
    pub enable_leancloud_integration: bool,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub permissions: PermissionConfig,
}

/// Credentials and endpoint of the hosted backend.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub server_url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionConfig {
    /// Baseline every group grant is OR-ed into.
    #[serde(default)]
    pub baseline: Permissions,
}

impl BackendConfig {
    /// Checks that the backend can be reached with this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(DeskError::config("backend.app_id is empty"));
        }
        if self.app_key.trim().is_empty() {
            return Err(DeskError::config("backend.app_key is empty"));
        }
        if self.server_url.trim().is_empty() {
            return Err(DeskError::config("backend.server_url is empty"));
        }
        Ok(())
    }
}
