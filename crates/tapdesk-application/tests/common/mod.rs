#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tapdesk_core::backend::{Authenticator, DirectoryBackend};
use tapdesk_core::role::RoleQuery;
use tapdesk_core::{DeskError, Group, Result, Role, Session, SessionUser};
use tokio::sync::Notify;

pub fn session(user_id: &str, username: &str) -> Session {
    Session::new(format!("token-{user_id}"), SessionUser::new(user_id, username))
}

/// In-memory directory with call counters, injectable failures and gates.
#[derive(Default)]
pub struct MockDirectory {
    /// user id -> roles attached to that user
    roles: Mutex<HashMap<String, Vec<Role>>>,
    groups: Mutex<Vec<Group>>,
    failures: AtomicUsize,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub role_calls: AtomicUsize,
    pub group_calls: AtomicUsize,
}

impl MockDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach_role(&self, user_id: &str, role: Role) {
        self.roles
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(role);
    }

    pub fn add_group(&self, group: Group) {
        self.groups.lock().unwrap().push(group);
    }

    /// Makes the next `count` backend calls fail.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Blocks role queries for `user_id` until the returned gate is notified.
    pub fn gate(&self, user_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(user_id.to_string(), gate.clone());
        gate
    }

    pub fn role_calls(&self) -> usize {
        self.role_calls.load(Ordering::SeqCst)
    }

    pub fn group_calls(&self) -> usize {
        self.group_calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self, query: &str) -> Result<()> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            Err(DeskError::upstream(query, "injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DirectoryBackend for MockDirectory {
    async fn find_roles(&self, _session: &Session, query: &RoleQuery) -> Result<Vec<Role>> {
        self.role_calls.fetch_add(1, Ordering::SeqCst);

        let gate = query
            .user_id
            .as_ref()
            .and_then(|user_id| self.gates.lock().unwrap().get(user_id).cloned());
        if let Some(gate) = gate {
            gate.notified().await;
        }
        tokio::task::yield_now().await;

        self.take_failure("roles")?;

        let roles = self.roles.lock().unwrap();
        let Some(user_id) = query.user_id.as_deref() else {
            return Ok(Vec::new());
        };
        Ok(roles
            .get(user_id)
            .map(|roles| {
                roles
                    .iter()
                    .filter(|role| query.matches(&role.name, Some(user_id)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_groups_by_roles(
        &self,
        _session: &Session,
        role_ids: &[String],
    ) -> Result<Vec<Group>> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        self.take_failure("groups")?;

        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|group| role_ids.contains(&group.role_id))
            .cloned()
            .collect())
    }
}

/// Authenticator accepting `password == "secret"` for any known user.
#[derive(Default)]
pub struct MockAuthenticator {
    users: Mutex<HashMap<String, SessionUser>>,
    pub revoked: Mutex<Vec<String>>,
    pub fail_logout: std::sync::atomic::AtomicBool,
}

impl MockAuthenticator {
    pub fn with_user(self, user: SessionUser) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(user.username.clone(), user);
        self
    }

    pub fn rename(&self, username: &str, name: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(username) {
            user.name = Some(name.to_string());
        }
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let users = self.users.lock().unwrap();
        match users.get(username) {
            Some(user) if password == "secret" => {
                Ok(Session::new(format!("token-{}", user.id), user.clone()))
            }
            _ => Err(DeskError::unauthorized("invalid username or password")),
        }
    }

    async fn become_user(&self, session_token: &str) -> Result<Session> {
        let users = self.users.lock().unwrap();
        users
            .values()
            .find(|user| format!("token-{}", user.id) == session_token)
            .map(|user| Session::new(session_token, user.clone()))
            .ok_or_else(|| DeskError::unauthorized("invalid session token"))
    }

    async fn logout(&self, session_token: &str) -> Result<()> {
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(DeskError::upstream("logout", "network down"));
        }
        self.revoked.lock().unwrap().push(session_token.to_string());
        Ok(())
    }
}
