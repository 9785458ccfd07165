use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use shipyard_auth::{
    AccessToken, AccessTokenError, AccessTokenRegistry, AccessTokenUpdate, NewAccessToken,
    StoreError,
};
use shipyard_core::AccessTokenId;

/// In-memory access token registry for tests/dev, keyed by token name.
///
/// Uniqueness checks and writes happen under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryAccessTokenRegistry {
    inner: RwLock<BTreeMap<String, AccessToken>>,
}

impl InMemoryAccessTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, AccessToken>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::new("access token registry lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, AccessToken>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::new("access token registry lock poisoned"))
    }
}

fn key_taken(tokens: &BTreeMap<String, AccessToken>, key: &str, except: Option<&str>) -> bool {
    tokens
        .values()
        .any(|t| t.key == key && Some(t.name.as_str()) != except)
}

#[async_trait]
impl AccessTokenRegistry for InMemoryAccessTokenRegistry {
    async fn create(&self, new: NewAccessToken) -> Result<AccessToken, AccessTokenError> {
        let token = AccessToken::create(new, Utc::now())?;
        let mut tokens = self.write()?;

        if tokens.contains_key(&token.name) {
            return Err(AccessTokenError::DuplicateName(token.name));
        }
        if key_taken(&tokens, &token.key, None) {
            return Err(AccessTokenError::DuplicateKey);
        }

        tracing::info!(name = %token.name, id = %token.id, "access token created");
        tokens.insert(token.name.clone(), token.clone());
        Ok(token)
    }

    async fn get(&self, id: AccessTokenId) -> Result<Option<AccessToken>, AccessTokenError> {
        Ok(self.read()?.values().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AccessToken>, AccessTokenError> {
        Ok(self.read()?.get(name).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<AccessToken>, AccessTokenError> {
        Ok(self.read()?.values().find(|t| t.key == key).cloned())
    }

    async fn list(&self) -> Result<Vec<AccessToken>, AccessTokenError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn update(
        &self,
        name: &str,
        update: AccessTokenUpdate,
    ) -> Result<AccessToken, AccessTokenError> {
        let mut tokens = self.write()?;
        let token = tokens
            .get_mut(name)
            .ok_or_else(|| AccessTokenError::NotFound(name.to_string()))?;

        token.apply(update, Utc::now())?;
        tracing::info!(name = %token.name, "access token updated");
        Ok(token.clone())
    }

    async fn rotate_key(&self, name: &str, key: String) -> Result<AccessToken, AccessTokenError> {
        let mut tokens = self.write()?;
        if !tokens.contains_key(name) {
            return Err(AccessTokenError::NotFound(name.to_string()));
        }
        if key_taken(&tokens, &key, Some(name)) {
            return Err(AccessTokenError::DuplicateKey);
        }

        let token = tokens
            .get_mut(name)
            .ok_or_else(|| AccessTokenError::NotFound(name.to_string()))?;
        token.rotate(key, Utc::now())?;
        tracing::info!(name = %token.name, "access token key rotated");
        Ok(token.clone())
    }

    async fn delete(&self, name: &str) -> Result<AccessToken, AccessTokenError> {
        let removed = self
            .write()?
            .remove(name)
            .ok_or_else(|| AccessTokenError::NotFound(name.to_string()))?;
        tracing::info!(name = %removed.name, "access token revoked");
        Ok(removed)
    }
}
