use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tapdesk_application::{AuthUseCase, SessionGraph};
use tapdesk_core::CurrentUser;
use tapdesk_core::config::DeskConfig;
use tapdesk_infrastructure::{ConfigService, DeskPaths, LeanCloudClient, SessionTokenStore};

/// Everything a command needs: configuration, backend client, session graph
/// and the token store.
pub struct Desk {
    pub config: DeskConfig,
    pub client: Arc<LeanCloudClient>,
    pub auth: AuthUseCase,
    pub tokens: SessionTokenStore,
}

impl Desk {
    pub fn open(config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = DeskPaths::new(config_dir);
        let config = ConfigService::new(paths.clone())
            .get_config()
            .context("Failed to load configuration")?;
        let client = Arc::new(
            LeanCloudClient::new(&config.backend)
                .context("Backend is not configured (see `tapdesk config init`)")?,
        );
        let graph = SessionGraph::new(client.clone(), config.permissions.baseline)?;
        let auth = AuthUseCase::new(client.clone(), graph);
        let tokens = SessionTokenStore::new(&paths)?;

        Ok(Self {
            config,
            client,
            auth,
            tokens,
        })
    }

    pub fn graph(&self) -> &SessionGraph {
        self.auth.graph()
    }

    /// Restores the session from `token`, or from the stored token.
    pub async fn restore(&self, token: Option<&str>) -> Result<CurrentUser> {
        let token = match token {
            Some(token) => token.to_string(),
            None => match self.tokens.load()? {
                Some(token) => token,
                None => bail!("Not logged in (run `tapdesk login <username>`)"),
            },
        };

        self.auth
            .restore(&token)
            .await
            .context("Failed to restore session")
    }
}
