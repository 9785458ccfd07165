//! In-memory identity stores for tests/dev.
//!
//! One store instance per namespace; local and OAuth users never share a map.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shipyard_auth::{
    LocalIdentityStore, LocalUserRecord, OAuthIdentityStore, OAuthUserRecord, StoreError,
    SubjectId,
};

/// Records keyed by subject id.
#[derive(Debug)]
pub struct InMemoryUserStore<R> {
    inner: RwLock<HashMap<SubjectId, R>>,
}

pub type LocalUserStore = InMemoryUserStore<LocalUserRecord>;
pub type OAuthUserStore = InMemoryUserStore<OAuthUserRecord>;

impl<R> InMemoryUserStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remove(&self, id: &SubjectId) -> Option<R> {
        self.inner.write().ok()?.remove(id)
    }
}

impl<R: Clone> InMemoryUserStore<R> {
    fn get(&self, id: &SubjectId) -> Result<Option<R>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::new("user store lock poisoned"))?;
        Ok(map.get(id).cloned())
    }
}

impl<R> Default for InMemoryUserStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryUserStore<R> {
    fn insert(&self, id: SubjectId, record: R) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::new("user store lock poisoned"))?;
        map.insert(id, record);
        Ok(())
    }
}

impl LocalUserStore {
    pub fn upsert(&self, record: LocalUserRecord) -> Result<(), StoreError> {
        self.insert(record.id.clone(), record)
    }
}

impl OAuthUserStore {
    pub fn upsert(&self, record: OAuthUserRecord) -> Result<(), StoreError> {
        self.insert(record.id.clone(), record)
    }
}

#[async_trait]
impl LocalIdentityStore for LocalUserStore {
    async fn find_local_user(&self, id: &SubjectId) -> Result<Option<LocalUserRecord>, StoreError> {
        self.get(id)
    }
}

#[async_trait]
impl OAuthIdentityStore for OAuthUserStore {
    async fn find_oauth_user(&self, id: &SubjectId) -> Result<Option<OAuthUserRecord>, StoreError> {
        self.get(id)
    }
}
