//! Authentication use case.
//!
//! Bridges the authentication collaborator and the session graph: every
//! credential change is committed to the graph's session store. The graph
//! itself never logs in or out.

use crate::session_graph::SessionGraph;
use std::sync::Arc;
use tapdesk_core::backend::Authenticator;
use tapdesk_core::{CurrentUser, Result};

pub struct AuthUseCase {
    authenticator: Arc<dyn Authenticator>,
    graph: SessionGraph,
}

impl AuthUseCase {
    pub fn new(authenticator: Arc<dyn Authenticator>, graph: SessionGraph) -> Self {
        Self {
            authenticator,
            graph,
        }
    }

    pub fn graph(&self) -> &SessionGraph {
        &self.graph
    }

    /// Logs in and commits the new session.
    ///
    /// On failure the current session is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentUser> {
        let session = self.authenticator.login(username, password).await?;
        let user = CurrentUser::from_session(&session);
        tracing::info!("[Auth] Logged in as {} ({})", user.display_name, user.id);
        self.graph.set_session(Some(session));
        Ok(user)
    }

    /// Restores a session from a stored token.
    pub async fn restore(&self, session_token: &str) -> Result<CurrentUser> {
        let session = self.authenticator.become_user(session_token).await?;
        let user = CurrentUser::from_session(&session);
        tracing::info!("[Auth] Restored session of {}", user.id);
        self.graph.set_session(Some(session));
        Ok(user)
    }

    /// Re-fetches the current user record and re-commits the session.
    ///
    /// Every derived node is recomputed, even if the record did not change.
    /// Without a session this just re-commits the logged-out state.
    pub async fn refresh_current_user(&self) -> Result<()> {
        let Some(current) = self.graph.session() else {
            self.graph.set_session(None);
            return Ok(());
        };

        let session = self
            .authenticator
            .become_user(&current.session_token)
            .await?;
        self.graph.set_session(Some(session));
        Ok(())
    }

    /// Logs out locally, then revokes the token on the backend.
    ///
    /// The local session is cleared even if revocation fails.
    pub async fn logout(&self) -> Result<()> {
        let Some(current) = self.graph.session() else {
            return Ok(());
        };

        self.graph.set_session(None);
        tracing::info!("[Auth] Logged out {}", current.user_id());

        if let Err(err) = self.authenticator.logout(&current.session_token).await {
            tracing::warn!("[Auth] Failed to revoke session token: {}", err);
            return Err(err);
        }
        Ok(())
    }
}
