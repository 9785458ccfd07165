use std::sync::Arc;

use shipyard_auth::{AccessToken, AuthenticatedContext, Capability, Identity};

/// Bearer-authenticated request context.
///
/// Inserted by the auth middleware only after every stage succeeded; handlers
/// behind that middleware can rely on it being present.
#[derive(Debug, Clone)]
pub struct AuthContext {
    inner: Arc<AuthenticatedContext>,
}

impl AuthContext {
    pub fn new(ctx: AuthenticatedContext) -> Self {
        Self {
            inner: Arc::new(ctx),
        }
    }

    pub fn identity(&self) -> &Identity {
        self.inner.identity()
    }

    /// Never assume this is present, even for OAuth identities.
    pub fn capability(&self) -> Option<&Capability> {
        self.inner.capability()
    }
}

/// Machine-to-machine request context (resolved access token).
#[derive(Debug, Clone)]
pub struct TokenContext {
    token: Arc<AccessToken>,
}

impl TokenContext {
    pub fn new(token: AccessToken) -> Self {
        Self {
            token: Arc::new(token),
        }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}
