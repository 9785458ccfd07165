//! Claim set -> identity resolution.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    AuthError, ClaimSet, Identity, LocalIdentity, LocalUserRecord, OAuthIdentity,
    OAuthUserRecord, StoreError, SubjectId,
};

/// Lookup of locally registered users by subject id.
#[async_trait]
pub trait LocalIdentityStore: Send + Sync {
    async fn find_local_user(&self, id: &SubjectId) -> Result<Option<LocalUserRecord>, StoreError>;
}

/// Lookup of OAuth-linked users by subject id.
#[async_trait]
pub trait OAuthIdentityStore: Send + Sync {
    async fn find_oauth_user(&self, id: &SubjectId) -> Result<Option<OAuthUserRecord>, StoreError>;
}

/// Maps verified claims onto exactly one identity store.
///
/// The store is chosen from the claims alone; a subject is never probed in
/// both namespaces. Nothing is cached between calls.
#[derive(Clone)]
pub struct IdentityResolver {
    local: Arc<dyn LocalIdentityStore>,
    oauth: Arc<dyn OAuthIdentityStore>,
}

impl IdentityResolver {
    pub fn new(local: Arc<dyn LocalIdentityStore>, oauth: Arc<dyn OAuthIdentityStore>) -> Self {
        Self { local, oauth }
    }

    pub async fn resolve(&self, claims: &ClaimSet) -> Result<Identity, AuthError> {
        let subject = &claims.subject_id;

        match claims.oauth_provider() {
            Some(provider) => {
                let record = self
                    .oauth
                    .find_oauth_user(subject)
                    .await?
                    .ok_or_else(|| AuthError::IdentityNotFound(subject.clone()))?;
                Ok(Identity::OAuth(OAuthIdentity::from_record(provider, record)))
            }
            None => {
                let record = self
                    .local
                    .find_local_user(subject)
                    .await?
                    .ok_or_else(|| AuthError::IdentityNotFound(subject.clone()))?;
                Ok(Identity::Local(LocalIdentity::from_record(record)))
            }
        }
    }
}
