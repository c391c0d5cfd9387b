// src/session/store.rs
// DOCUMENTATION: Persistence backends for the signed-in session
// PURPOSE: Survive restarts the way browser local storage does

use crate::errors::{GuideError, GuideResult};
use crate::models::Session;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Where the session (token + user) is persisted
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the persisted session, `None` when nothing is stored
    async fn load(&self) -> GuideResult<Option<Session>>;

    async fn save(&self, session: &Session) -> GuideResult<()>;

    /// Remove the persisted session; succeeds when nothing is stored
    async fn clear(&self) -> GuideResult<()>;
}

/// Session stored as a JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> GuideResult<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GuideError::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        // A corrupt file is treated as signed out rather than a hard failure
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> GuideResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    GuideError::StorageError(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| GuideError::StorageError(format!("Failed to encode session: {}", e)))?;

        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            GuideError::StorageError(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        log::debug!("Session persisted to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> GuideResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GuideError::StorageError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Session kept in memory only
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> GuideResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> GuideResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> GuideResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}
