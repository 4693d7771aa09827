// assure-core/src/infrastructure/session.rs
//
// Bearer token shared between the CLI and the HTTP adapter. A 401 from the
// platform clears it, same as an explicit logout.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, read_optional, remove_if_exists};

/// Token persisted on disk between invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<String>, InfrastructureError> {
        Ok(read_optional(&self.path)?
            .map(|raw| raw.trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    pub fn save(&self, token: &str) -> Result<(), InfrastructureError> {
        atomic_write(&self.path, token.trim())
    }

    pub fn remove(&self) -> Result<(), InfrastructureError> {
        remove_if_exists(&self.path)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    store: Option<TokenStore>,
}

impl Session {
    /// Session backed by `store`, starting from whatever token it holds.
    pub fn init(store: TokenStore) -> Result<Self, InfrastructureError> {
        let token = store.load()?;
        debug!(path = ?store.path(), authenticated = token.is_some(), "session initialised");
        Ok(Self {
            token,
            store: Some(store),
        })
    }

    /// Session that lives in memory only.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            store: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn login(&mut self, token: &str) -> Result<(), InfrastructureError> {
        if let Some(store) = &self.store {
            store.save(token)?;
        }
        self.token = Some(token.trim().to_string());
        info!("session opened");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), InfrastructureError> {
        self.token = None;
        if let Some(store) = &self.store {
            store.remove()?;
        }
        info!("session cleared");
        Ok(())
    }
}

/// Cloneable handle over one [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    pub fn token(&self) -> Option<String> {
        self.0
            .read()
            .ok()
            .and_then(|s| s.token().map(str::to_string))
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.read().map(|s| s.is_authenticated()).unwrap_or(false)
    }

    pub fn login(&self, token: &str) -> Result<(), InfrastructureError> {
        let mut session = self.0.write().map_err(|_| poisoned())?;
        session.login(token)
    }

    pub fn clear(&self) -> Result<(), InfrastructureError> {
        let mut session = self.0.write().map_err(|_| poisoned())?;
        session.clear()
    }

    /// Called by the HTTP adapter on a 401. Failing to delete the file is only logged.
    pub fn expire(&self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "could not remove persisted token");
        }
    }
}

fn poisoned() -> InfrastructureError {
    InfrastructureError::ConfigError("session lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_init_loads_persisted_token() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("token");
        fs::write(&path, "abc123\n")?;

        let session = Session::init(TokenStore::new(&path))?;
        assert_eq!(session.token(), Some("abc123"));
        Ok(())
    }

    #[test]
    fn test_login_then_clear_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = TokenStore::new(dir.path().join("token"));
        let handle = SessionHandle::new(Session::init(store.clone())?);
        assert!(!handle.is_authenticated());

        handle.login("tok")?;
        assert_eq!(store.load()?.as_deref(), Some("tok"));
        assert_eq!(handle.token().as_deref(), Some("tok"));

        let other = handle.clone();
        other.expire();
        assert!(!handle.is_authenticated());
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn test_blank_token_file_means_logged_out() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("token");
        fs::write(&path, "  \n")?;
        assert!(!Session::init(TokenStore::new(path))?.is_authenticated());
        Ok(())
    }

    #[test]
    fn test_in_memory_session_clears_without_store() -> Result<()> {
        let mut session = Session::with_token("t");
        session.clear()?;
        assert_eq!(session.token(), None);
        Ok(())
    }
}
