//! Credential and identity storage with an explicit set/clear lifecycle.
//!
//! A session is written on successful login and cleared on logout or when
//! the server rejects the credential.

use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Bearer credential plus cached identity attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, username: String, role: String) -> Self {
        Self {
            token,
            username,
            role,
            logged_in_at: Utc::now(),
        }
    }
}

/// Injected session context shared by the controller and auth flows.
pub trait SessionStore: Send + Sync {
    /// Current session, if any.
    fn get(&self) -> Option<Session>;

    /// Replace the stored session.
    fn set(&self, session: Session) -> Result<(), ClientError>;

    /// Drop the credential and all cached identity attributes.
    fn clear(&self) -> Result<(), ClientError>;

    fn token(&self) -> Option<String> {
        self.get()
            .map(|session| session.token)
            .filter(|token| !token.is_empty())
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // A poisoned lock still holds a usable session value.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.lock().clone()
    }

    fn set(&self, session: Session) -> Result<(), ClientError> {
        *self.lock() = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.lock() = None;
        Ok(())
    }
}

/// Session persisted as a JSON file so CLI invocations share a login.
#[derive(Debug, Clone)]
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

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("failed to read session file {}: {}", self.path.display(), err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(
                    "ignoring unreadable session file {}: {}",
                    self.path.display(),
                    err
                );
                None
            }
        }
    }

    fn set(&self, session: Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| ClientError::Storage(err.to_string()))?;
        }
        let encoded = serde_json::to_string_pretty(&session)
            .map_err(|err| ClientError::Storage(err.to_string()))?;
        std::fs::write(&self.path, encoded).map_err(|err| ClientError::Storage(err.to_string()))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Storage(err.to_string())),
        }
    }
}
