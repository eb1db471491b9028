use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{generate_session_token, TokenError};
use crate::types::{Principal, Role};

/// In-memory session registry shared by every request handler.
///
/// Reads (`resolve`) take the shared lock and run concurrently; `create`,
/// `set` and the revocation methods take the exclusive lock. Nothing is
/// persisted, so a restart logs everyone out.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Principal>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a token for `principal` and registers it.
    pub async fn create(&self, principal: Principal) -> Result<String, TokenError> {
        let token = generate_session_token()?;
        self.set(token.clone(), principal).await;
        Ok(token)
    }

    /// Binds `token` to `principal`, replacing any previous binding.
    pub async fn set(&self, token: String, principal: Principal) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(token, principal);
    }

    pub async fn resolve(&self, token: &str) -> Option<Principal> {
        let sessions = self.sessions.read().await;
        let principal = sessions.get(token).cloned();
        if principal.is_none() {
            debug!("Session lookup missed");
        }
        principal
    }

    /// Removes the session. Revoking an unknown token is a no-op.
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    /// Drops every session held by the given user. Returns how many were removed.
    pub async fn revoke_user(&self, user_id: i32) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, principal| principal.id != user_id);
        before - sessions.len()
    }

    /// Propagates a role change to the user's live sessions.
    /// `NoAccess` revokes them instead.
    pub async fn update_role(&self, user_id: i32, role: Role) {
        if role == Role::NoAccess {
            self.revoke_user(user_id).await;
            return;
        }
        let mut sessions = self.sessions.write().await;
        for principal in sessions.values_mut().filter(|p| p.id == user_id) {
            principal.role = role;
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
