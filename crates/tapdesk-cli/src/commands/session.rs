use super::context::Desk;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub async fn login(
    config_dir: Option<PathBuf>,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let user = desk
        .auth
        .login(username, &password)
        .await
        .context("Login failed")?;
    if let Some(session) = desk.graph().session() {
        desk.tokens.save(&session.session_token)?;
    }

    println!("✓ Logged in as {} ({})", user.display_name, user.id);
    Ok(())
}

pub async fn logout(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    let restored = desk.restore(token).await;
    desk.tokens.clear()?;

    match restored {
        Ok(user) => {
            desk.auth.logout().await.context("Failed to revoke session")?;
            println!("✓ Logged out {}", user.display_name);
        }
        Err(err) => {
            tracing::debug!("[CLI] No live session to revoke: {:#}", err);
            println!("✓ Logged out");
        }
    }
    Ok(())
}

pub async fn whoami(config_dir: Option<PathBuf>, token: Option<&str>) -> Result<()> {
    let desk = Desk::open(config_dir)?;
    let user = desk.restore(token).await?;
    let graph = desk.graph();

    println!("{} ({})", user.display_name, user.id);
    println!("  admin:            {}", graph.is_admin().await?);
    println!("  customer service: {}", graph.is_customer_service().await?);
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
