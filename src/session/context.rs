// src/session/context.rs
// DOCUMENTATION: Explicitly passed identity of the signed-in user
// PURPOSE: Init from persisted session on startup, teardown on logout or 401

use crate::errors::{GuideError, GuideResult};
use crate::models::{Session, User};
use crate::session::{MemorySessionStore, SessionStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Current session shared by the API client and services
/// DOCUMENTATION: Cheap to clone; clones observe the same session
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Empty context backed by `store`
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Signed-out context that persists nothing
    pub fn anonymous() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Restore the persisted session from `store`
    /// DOCUMENTATION: Called once at startup; storage failures start signed out
    pub async fn restore(store: Arc<dyn SessionStore>) -> Self {
        let context = Self::new(store);

        match context.store.load().await {
            Ok(Some(session)) => {
                log::info!("Restored session for user {}", session.user.username);
                *context.current.write().await = Some(session);
            }
            Ok(None) => log::info!("No persisted session found"),
            Err(e) => log::warn!("Failed to restore session: {}", e),
        }

        context
    }

    /// Sign in: persist then publish the new session
    /// The write lock is held across storage so login and expiry never interleave
    pub async fn login(&self, session: Session) -> GuideResult<()> {
        let mut current = self.current.write().await;
        self.store.save(&session).await?;
        log::info!("User {} signed in", session.user.username);
        *current = Some(session);
        Ok(())
    }

    /// Sign out: clear memory and storage
    pub async fn logout(&self) -> GuideResult<()> {
        let mut current = self.current.write().await;
        if let Some(session) = current.take() {
            log::info!("User {} signed out", session.user.username);
        }
        self.store.clear().await
    }

    /// Drop the session if it still carries `token`
    /// DOCUMENTATION: Called when the backend rejects `token`. A session created
    /// after the rejected request was sent is left alone
    pub async fn expire_if(&self, token: &str) -> bool {
        let mut current = self.current.write().await;
        match current.as_ref() {
            Some(session) if session.token == token => {}
            _ => {
                log::debug!("Ignoring 401 for a token that is no longer current");
                return false;
            }
        }

        if let Some(session) = current.take() {
            log::warn!(
                "Session for {} rejected by server; signing out",
                session.user.username
            );
        }
        if let Err(e) = self.store.clear().await {
            log::error!("Failed to clear persisted session: {}", e);
        }
        true
    }

    /// Replace the cached profile after the user edits it
    pub async fn update_user(&self, user: User) -> GuideResult<()> {
        let updated = {
            let mut current = self.current.write().await;
            match current.as_mut() {
                Some(session) if session.user.id == user.id => {
                    session.user = user;
                    Some(session.clone())
                }
                _ => None,
            }
        };

        match updated {
            Some(session) => self.store.save(&session).await,
            None => Ok(()),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Signed-in user or `Unauthorized`
    pub async fn require_user(&self) -> GuideResult<User> {
        self.current_user().await.ok_or(GuideError::Unauthorized)
    }

    /// Signed-in admin; `Unauthorized` when signed out, `Forbidden` otherwise
    pub async fn require_admin(&self) -> GuideResult<User> {
        let user = self.require_user().await?;
        if user.is_admin() {
            Ok(user)
        } else {
            log::warn!("User {} attempted an admin operation", user.username);
            Err(GuideError::Forbidden)
        }
    }
}
