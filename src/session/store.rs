use anyhow::Result;
use std::sync::{Arc, PoisonError, RwLock};

use super::token::SessionToken;
use crate::api::ApiError;
use crate::storage::{Database, SESSION_TOKEN_KEY};

/// Holder of the current session credential.
///
/// Cloning yields another handle to the same session, so the gateway, the
/// guard and the UI all observe one lifecycle: created on login, destroyed on
/// logout or on an authentication rejection.
///
/// Writes update memory first and then the state database; reads never touch
/// the database.
#[derive(Clone)]
pub struct TokenStore {
    current: Arc<RwLock<Option<SessionToken>>>,
    db: Option<Database>,
}

impl TokenStore {
    /// A store with no durable backing. Used by tests and `:memory:` runs.
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            db: None,
        }
    }

    /// Restore the session persisted by a previous run, if any.
    pub async fn load(db: Database) -> Result<Self> {
        let persisted = db.get_state(SESSION_TOKEN_KEY).await?;
        let token = persisted.and_then(SessionToken::new);
        tracing::debug!(restored = token.is_some(), "Loaded session state");

        Ok(Self {
            current: Arc::new(RwLock::new(token)),
            db: Some(db),
        })
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<SessionToken> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current token, or `ApiError::Unauthenticated` for protected operations
    /// that must fail before touching the network.
    pub fn require(&self) -> Result<SessionToken, ApiError> {
        self.get().ok_or(ApiError::Unauthenticated)
    }

    /// Install a new session token and persist it.
    pub async fn set(&self, token: SessionToken) -> Result<()> {
        let raw = token.expose().to_owned();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        tracing::info!("Session established");

        if let Some(db) = &self.db {
            db.set_state(SESSION_TOKEN_KEY, &raw).await?;
        }
        Ok(())
    }

    /// Destroy the session in memory and on disk.
    pub async fn clear(&self) -> Result<()> {
        let had_token = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if had_token {
            tracing::info!("Session cleared");
        }

        if let Some(db) = &self.db {
            db.delete_state(SESSION_TOKEN_KEY).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_lifecycle() {
        let store = TokenStore::in_memory();
        assert!(!store.is_present());
        assert!(matches!(store.require(), Err(ApiError::Unauthenticated)));

        store.set(token("tok123")).await.unwrap();
        assert!(store.is_present());
        assert_eq!(store.get().unwrap().expose(), "tok123");

        store.clear().await.unwrap();
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let store = TokenStore::in_memory();
        let other = store.clone();

        store.set(token("shared")).await.unwrap();
        assert_eq!(other.get().unwrap().expose(), "shared");

        other.clear().await.unwrap();
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn test_token_survives_reload() {
        let db = Database::open(":memory:").await.unwrap();

        let store = TokenStore::load(db.clone()).await.unwrap();
        assert!(!store.is_present());
        store.set(token("persisted")).await.unwrap();

        let reloaded = TokenStore::load(db.clone()).await.unwrap();
        assert_eq!(reloaded.get().unwrap().expose(), "persisted");

        reloaded.clear().await.unwrap();
        let after_logout = TokenStore::load(db).await.unwrap();
        assert!(!after_logout.is_present());
    }

    #[tokio::test]
    async fn test_blank_persisted_value_is_absent() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_state(SESSION_TOKEN_KEY, "").await.unwrap();

        let store = TokenStore::load(db).await.unwrap();
        assert!(!store.is_present());
    }
}
