use anyhow::{Context, Result};
use std::path::PathBuf;
use tapdesk_core::config::{BackendConfig, DeskConfig};
use tapdesk_infrastructure::{ConfigService, DeskPaths};

pub fn show(config_dir: Option<PathBuf>) -> Result<()> {
    let paths = DeskPaths::new(config_dir);
    let config = ConfigService::new(paths.clone()).get_config()?;

    println!("# {}", paths.config_file()?.display());
    println!("{}", render(&config)?);
    Ok(())
}

pub fn init(
    config_dir: Option<PathBuf>,
    app_id: String,
    app_key: String,
    server_url: String,
) -> Result<()> {
    let paths = DeskPaths::new(config_dir);
    let service = ConfigService::new(paths.clone());

    let backend = BackendConfig {
        app_id,
        app_key,
        server_url,
    };
    backend.validate()?;

    let mut config = service.stored_config()?;
    config.backend = backend;
    service
        .save(&config)
        .context("Failed to write configuration")?;

    println!("✓ Wrote {}", paths.config_file()?.display());
    Ok(())
}

/// TOML rendering with the app key masked.
fn render(config: &DeskConfig) -> Result<String> {
    let mut shown = config.clone();
    if !shown.backend.app_key.is_empty() {
        shown.backend.app_key = "********".to_string();
    }
    Ok(toml::to_string_pretty(&shown)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_masks_app_key() {
        let mut config = DeskConfig::default();
        config.backend.app_key = "very-secret".to_string();
        let rendered = render(&config).unwrap();
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn test_init_keeps_permission_baseline() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(DeskPaths::new(Some(dir.path().to_path_buf())));
        let mut existing = DeskConfig::default();
        existing.permissions.baseline.statistics = true;
        service.save(&existing).unwrap();

        init(
            Some(dir.path().to_path_buf()),
            "app".to_string(),
            "key".to_string(),
            "https://api.example.com".to_string(),
        )
        .unwrap();

        let stored = service.stored_config().unwrap();
        assert_eq!(stored.backend.app_id, "app");
        assert!(stored.permissions.baseline.statistics);
    }
}
