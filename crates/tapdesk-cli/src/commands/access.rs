use super::context::Desk;
use anyhow::Result;
use std::path::PathBuf;
use tapdesk_core::{PartialPermissions, Permissions};

pub async fn permissions(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    desk.restore(token).await?;

    let permissions = desk.graph().permissions().await?;
    for line in permission_lines(&permissions) {
        println!("{line}");
    }
    Ok(())
}

pub async fn roles(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    desk.restore(token).await?;

    let roles = desk.graph().roles().await?;
    if roles.is_empty() {
        println!("(no system roles)");
    }
    for role in roles.iter() {
        println!("{role}");
    }
    Ok(())
}

pub async fn groups(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    desk.restore(token).await?;

    let groups = desk.graph().groups().await?;
    if groups.is_empty() {
        println!("(no groups)");
    }
    for group in groups.iter() {
        println!(
            "{} ({}) grants: {}",
            group.name,
            group.id,
            grant_summary(&group.permissions)
        );
    }
    Ok(())
}

fn permission_lines(permissions: &Permissions) -> [String; 3] {
    [
        format!("view:       {}", permissions.view),
        format!("ticketList: {}", permissions.ticket_list),
        format!("statistics: {}", permissions.statistics),
    ]
}

fn grant_summary(grants: &PartialPermissions) -> String {
    let granted: Vec<&str> = [
        ("view", grants.view),
        ("ticketList", grants.ticket_list),
        ("statistics", grants.statistics),
    ]
    .into_iter()
    .filter(|(_, grant)| *grant == Some(true))
    .map(|(name, _)| name)
    .collect();

    if granted.is_empty() {
        "-".to_string()
    } else {
        granted.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_summary_lists_true_grants_only() {
        let grants = PartialPermissions::default()
            .with_statistics(true)
            .with_view(false);
        assert_eq!(grant_summary(&grants), "statistics");
        assert_eq!(grant_summary(&PartialPermissions::default()), "-");
    }

    #[test]
    fn test_permission_lines_use_wire_names() {
        let lines = permission_lines(&Permissions::default());
        assert_eq!(lines[1], "ticketList: true");
        assert_eq!(lines[2], "statistics: false");
    }
}
