//! All-or-nothing authentication gate.
//!
//! verify -> resolve -> bind. Each stage must succeed before the next runs,
//! and no context exists unless all of them did.

use std::sync::Arc;

use crate::{bind, AuthError, Capability, CredentialVerifier, Identity, IdentityResolver};

/// What downstream handlers receive for an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthenticatedContext {
    identity: Identity,
    capability: Option<Capability>,
}

impl AuthenticatedContext {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// May be `None` even for OAuth identities.
    pub fn capability(&self) -> Option<&Capability> {
        self.capability.as_ref()
    }

    pub fn into_parts(self) -> (Identity, Option<Capability>) {
        (self.identity, self.capability)
    }
}

#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn CredentialVerifier>,
    resolver: IdentityResolver,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, resolver: IdentityResolver) -> Self {
        Self { verifier, resolver }
    }

    /// Authenticate a raw `Authorization` header value.
    ///
    /// Failures are logged with their internal cause here; callers should
    /// only expose [`AuthError::rejection`].
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedContext, AuthError> {
        let result = self.run(authorization).await;

        match &result {
            Ok(ctx) => tracing::debug!(
                subject = %ctx.identity.subject_id(),
                kind = ctx.identity.kind(),
                capability = ctx.capability.is_some(),
                "request authenticated"
            ),
            Err(AuthError::MissingCredential) => {
                tracing::debug!("request rejected: no credential")
            }
            Err(AuthError::Store(e)) => {
                tracing::error!(error = %e, "identity lookup failed")
            }
            Err(e) => tracing::warn!(error = %e, "request rejected"),
        }

        result
    }

    async fn run(&self, authorization: Option<&str>) -> Result<AuthenticatedContext, AuthError> {
        let claims = self.verifier.verify(authorization)?;
        let identity = self.resolver.resolve(&claims).await?;
        let capability = bind(&identity);

        Ok(AuthenticatedContext {
            identity,
            capability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use crate::{
        ExternalToken, Hs256CredentialVerifier, LocalIdentityStore, LocalUserRecord,
        OAuthIdentityStore, OAuthUserRecord, Profile, Rejection, StoreError, SubjectId,
        VerifierConfig,
    };

    const SECRET: &str = "gate-secret";

    #[derive(Default)]
    struct Users {
        local: HashMap<String, LocalUserRecord>,
        oauth: HashMap<String, OAuthUserRecord>,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl LocalIdentityStore for Users {
        async fn find_local_user(
            &self,
            id: &SubjectId,
        ) -> Result<Option<LocalUserRecord>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.local.get(id.as_str()).cloned())
        }
    }

    #[async_trait]
    impl OAuthIdentityStore for Users {
        async fn find_oauth_user(
            &self,
            id: &SubjectId,
        ) -> Result<Option<OAuthUserRecord>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.oauth.get(id.as_str()).cloned())
        }
    }

    fn users() -> Arc<Users> {
        let mut users = Users::default();
        users.local.insert(
            "u1".into(),
            LocalUserRecord {
                id: SubjectId::new("u1"),
                profile: Profile::default(),
            },
        );
        for (id, token) in [
            ("u2", ExternalToken::structured("tok")),
            ("u4", ExternalToken::legacy("legacytok")),
        ] {
            users.oauth.insert(
                id.into(),
                OAuthUserRecord {
                    id: SubjectId::new(id),
                    profile: Profile::default(),
                    token: Some(token),
                },
            );
        }
        Arc::new(users)
    }

    fn gate(users: &Arc<Users>) -> AuthGate {
        let verifier = Arc::new(Hs256CredentialVerifier::new(VerifierConfig::new(SECRET)));
        AuthGate::new(verifier, IdentityResolver::new(users.clone(), users.clone()))
    }

    fn bearer(claims: serde_json::Value) -> String {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn missing_header_never_touches_the_stores() {
        let users = users();
        let err = gate(&users).authenticate(None).await.unwrap_err();

        assert_eq!(err.rejection(), Rejection::NotLoggedIn);
        assert_eq!(users.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_header_is_not_logged_in() {
        let users = users();
        for header in ["", "   "] {
            let err = gate(&users).authenticate(Some(header)).await.unwrap_err();
            assert_eq!(err.rejection(), Rejection::NotLoggedIn, "{header:?}");
        }
        assert_eq!(users.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tampered_credential_never_touches_the_stores() {
        let users = users();
        let header = format!("{}x", bearer(serde_json::json!({ "subject_id": "u1" })));
        let err = gate(&users).authenticate(Some(header.as_str())).await.unwrap_err();

        assert_eq!(err.rejection(), Rejection::CouldNotProcess);
        assert_eq!(users.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn local_subject_gets_local_identity_and_no_capability() {
        let users = users();
        let header = bearer(serde_json::json!({ "subject_id": "u1" }));
        let ctx = gate(&users).authenticate(Some(header.as_str())).await.unwrap();

        assert!(matches!(ctx.identity(), Identity::Local(l) if l.subject_id.as_str() == "u1"));
        assert!(ctx.capability().is_none());
    }

    #[tokio::test]
    async fn oauth_subject_with_token_set_gets_capability() {
        let users = users();
        let header = bearer(serde_json::json!({ "subject_id": "u2", "oauth_provider": "github" }));
        let ctx = gate(&users).authenticate(Some(header.as_str())).await.unwrap();

        assert_eq!(ctx.identity().kind(), "oauth");
        assert_eq!(ctx.capability().map(|c| c.access_token()), Some("tok"));
    }

    #[tokio::test]
    async fn oauth_subject_with_legacy_token_gets_no_capability() {
        let users = users();
        let header = bearer(serde_json::json!({ "subject_id": "u4", "oauth_provider": "github" }));
        let ctx = gate(&users).authenticate(Some(header.as_str())).await.unwrap();

        assert_eq!(ctx.identity().kind(), "oauth");
        assert!(ctx.capability().is_none());
    }

    #[tokio::test]
    async fn unknown_subject_is_user_not_found() {
        let users = users();
        let header = bearer(serde_json::json!({ "subject_id": "u3" }));
        let err = gate(&users).authenticate(Some(header.as_str())).await.unwrap_err();

        assert_eq!(err.rejection(), Rejection::UserNotFound);
    }

    #[tokio::test]
    async fn local_subject_presented_as_oauth_is_not_found() {
        let users = users();
        let header = bearer(serde_json::json!({ "subject_id": "u1", "oauth_provider": "github" }));
        let err = gate(&users).authenticate(Some(header.as_str())).await.unwrap_err();

        assert_eq!(err, AuthError::IdentityNotFound(SubjectId::new("u1")));
    }
}
