//! Request-scoped handle for calling an external service as the caller.

use crate::{ExternalToken, Identity, OAuthIdentity};

/// Access to the OAuth provider on behalf of the resolved identity.
///
/// Built per request and dropped with it.
#[derive(Clone, PartialEq, Eq)]
pub struct Capability {
    provider: String,
    access_token: String,
}

impl Capability {
    pub fn new(provider: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            access_token: access_token.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Value for the `Authorization` header of outbound provider calls.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl core::fmt::Debug for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Capability")
            .field("provider", &self.provider)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Derive a capability from an identity.
///
/// Only OAuth identities holding a structured token set yield one. Legacy
/// string tokens and local identities yield `None`; that is not an error.
pub fn bind(identity: &Identity) -> Option<Capability> {
    let Identity::OAuth(OAuthIdentity {
        provider,
        token: Some(ExternalToken::Structured(set)),
        ..
    }) = identity
    else {
        return None;
    };

    if set.access_token.is_empty() {
        return None;
    }

    Some(Capability::new(provider.clone(), set.access_token.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalIdentity, Profile, SubjectId};

    fn oauth(token: Option<ExternalToken>) -> Identity {
        Identity::OAuth(OAuthIdentity {
            subject_id: SubjectId::new("u2"),
            provider: "github".into(),
            profile: Profile::default(),
            token,
        })
    }

    #[test]
    fn structured_token_binds() {
        let cap = bind(&oauth(Some(ExternalToken::structured("tok")))).unwrap();
        assert_eq!(cap.access_token(), "tok");
        assert_eq!(cap.provider(), "github");
        assert_eq!(cap.authorization_header(), "Bearer tok");
    }

    #[test]
    fn legacy_missing_or_empty_token_binds_nothing() {
        assert_eq!(bind(&oauth(Some(ExternalToken::legacy("legacytok")))), None);
        assert_eq!(bind(&oauth(None)), None);
        assert_eq!(bind(&oauth(Some(ExternalToken::structured("")))), None);
    }

    #[test]
    fn local_identity_binds_nothing() {
        let local = Identity::Local(LocalIdentity {
            subject_id: SubjectId::new("u1"),
            profile: Profile::default(),
        });
        assert_eq!(bind(&local), None);
    }

    #[test]
    fn debug_hides_token() {
        let cap = Capability::new("github", "very-secret");
        assert!(!format!("{cap:?}").contains("very-secret"));
    }
}
