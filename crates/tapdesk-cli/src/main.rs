use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapdesk_core::cloud::LeanCloudRegion;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tapdesk")]
#[command(about = "TapDesk CLI - customer-support console session and permissions", long_about = None)]
struct Cli {
    /// Directory holding config.toml and session.json
    #[arg(long, global = true, env = "TAPDESK_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Session token to use instead of the stored one
    #[arg(long, global = true, env = "TAPDESK_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "TAPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Revoke the session and forget the stored token
    Logout,
    /// Show the logged-in user and role flags
    Whoami,
    /// Show effective customer-service permissions
    Permissions,
    /// List the system roles of the logged-in user
    Roles,
    /// List the support groups of the logged-in user
    Groups,
    /// LeanCloud application lookup
    Apps {
        #[command(subcommand)]
        action: AppsAction,
    },
    /// Inspect or write the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AppsAction {
    /// List the apps visible to the logged-in user
    List,
    /// Look up one app on behalf of a user
    Show { app_id: String, username: String },
    /// Print the console URL of an app
    Url {
        app_id: String,
        #[arg(long, default_value = "cn-n1")]
        region: LeanCloudRegion,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Write backend credentials to config.toml
    Init {
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        app_key: String,
        #[arg(long)]
        server_url: String,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tapdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let token = cli.session_token.as_deref();
    let config_dir = cli.config_dir;

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(config_dir, &username, password).await?
        }
        Commands::Logout => commands::session::logout(config_dir, token).await?,
        Commands::Whoami => commands::session::whoami(config_dir, token).await?,
        Commands::Permissions => commands::access::permissions(config_dir, token).await?,
        Commands::Roles => commands::access::roles(config_dir, token).await?,
        Commands::Groups => commands::access::groups(config_dir, token).await?,
        Commands::Apps { action } => match action {
            AppsAction::List => commands::apps::list(config_dir, token).await?,
            AppsAction::Show { app_id, username } => {
                commands::apps::show(config_dir, token, &app_id, &username).await?
            }
            AppsAction::Url { app_id, region } => {
                commands::apps::url(config_dir, token, &app_id, region).await?
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(config_dir)?,
            ConfigAction::Init {
                app_id,
                app_key,
                server_url,
            } => commands::config::init(config_dir, app_id, app_key, server_url)?,
        },
    }

    Ok(())
}
