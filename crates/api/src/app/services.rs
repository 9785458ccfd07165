use std::sync::Arc;

use shipyard_auth::{
    AccessTokenRegistry, AuthGate, Hs256CredentialVerifier, IdentityResolver, VerifierConfig,
};
use shipyard_infra::{InMemoryAccessTokenRegistry, LocalUserStore, OAuthUserStore};

/// Backing stores shared by every request. Read-only from the gate's side.
pub struct AppServices {
    pub local_users: Arc<LocalUserStore>,
    pub oauth_users: Arc<OAuthUserStore>,
    pub tokens: Arc<dyn AccessTokenRegistry>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            local_users: Arc::new(LocalUserStore::new()),
            oauth_users: Arc::new(OAuthUserStore::new()),
            tokens: Arc::new(InMemoryAccessTokenRegistry::new()),
        }
    }

    pub fn gate(&self, verifier: VerifierConfig) -> AuthGate {
        let resolver = IdentityResolver::new(self.local_users.clone(), self.oauth_users.clone());
        AuthGate::new(Arc::new(Hs256CredentialVerifier::new(verifier)), resolver)
    }
}
