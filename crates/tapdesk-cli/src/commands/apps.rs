use super::context::Desk;
use anyhow::{Result, bail};
use std::path::PathBuf;
use tapdesk_application::LeanCloudAppService;
use tapdesk_core::cloud::LeanCloudRegion;

/// Opens the desk with a restored session and the app lookup enabled.
async fn open_service(
    config_dir: Option<PathBuf>,
    token: Option<&str>,
) -> Result<LeanCloudAppService> {
    let desk = Desk::open(config_dir)?;
    if !desk.config.enable_leancloud_integration {
        bail!(
            "LeanCloud integration is disabled \
             (set enable_leancloud_integration or TAPDESK_ENABLE_LEANCLOUD_INTEGRATION)"
        );
    }
    desk.restore(token).await?;
    Ok(LeanCloudAppService::new(desk.client.clone()))
}

pub async fn list(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let service = open_service(config_dir, token).await?;
    let apps = service.apps().await?;
    if apps.is_empty() {
        println!("(no apps)");
    }
    for app in apps.iter() {
        println!("{}  {}  [{}]", app.app_id, app.app_name, app.region);
    }
    Ok(())
}

pub async fn show(
    config_dir: Option<PathBuf>,
    token: Option<&str>,
    app_id: &str,
    username: &str,
) -> Result<()> {
    let service = open_service(config_dir, token).await?;
    match service.app(app_id, username).await? {
        Some(app) => println!("{}", serde_json::to_string_pretty(&app)?),
        None => println!("App {app_id} not found for {username}"),
    }
    Ok(())
}

pub async fn url(
    config_dir: Option<PathBuf>,
    token: Option<&str>,
    app_id: &str,
    region: LeanCloudRegion,
) -> Result<()> {
    let service = open_service(config_dir, token).await?;
    match service.app_url(app_id, region).await? {
        Some(url) => println!("{url}"),
        None => println!("No console URL for {app_id} in {region}"),
    }
    Ok(())
}
