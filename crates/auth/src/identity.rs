//! Identity records and the resolved identity sum type.
//!
//! Records are what the stores hold. [`Identity`] is what the gate hands to
//! downstream code; its variant comes from the credential's claims, never
//! from the shape of the record.

use serde::{Deserialize, Serialize};

use crate::SubjectId;

/// Profile fields shared by both identity kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Token material an OAuth provider issued for a user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl core::fmt::Debug for OAuthTokenSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OAuthTokenSet")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Stored external token.
///
/// Accounts linked before token sets were recorded hold a bare string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalToken {
    Structured(OAuthTokenSet),
    Legacy(String),
}

impl core::fmt::Debug for ExternalToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExternalToken::Structured(set) => f.debug_tuple("Structured").field(set).finish(),
            ExternalToken::Legacy(_) => f.write_str("Legacy(<redacted>)"),
        }
    }
}

impl ExternalToken {
    pub fn structured(access_token: impl Into<String>) -> Self {
        Self::Structured(OAuthTokenSet {
            access_token: access_token.into(),
            token_type: None,
            scope: None,
        })
    }

    pub fn legacy(token: impl Into<String>) -> Self {
        Self::Legacy(token.into())
    }
}

/// Record of a locally registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUserRecord {
    pub id: SubjectId,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Record of an OAuth-linked user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthUserRecord {
    pub id: SubjectId,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub token: Option<ExternalToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalIdentity {
    pub subject_id: SubjectId,
    pub profile: Profile,
}

impl LocalIdentity {
    pub fn from_record(record: LocalUserRecord) -> Self {
        Self {
            subject_id: record.id,
            profile: record.profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuthIdentity {
    pub subject_id: SubjectId,
    /// Provider named by the credential's `oauth_provider` claim.
    pub provider: String,
    pub profile: Profile,
    #[serde(skip_serializing)]
    pub token: Option<ExternalToken>,
}

impl OAuthIdentity {
    pub fn from_record(provider: impl Into<String>, record: OAuthUserRecord) -> Self {
        Self {
            subject_id: record.id,
            provider: provider.into(),
            profile: record.profile,
            token: record.token,
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Local(LocalIdentity),
    #[serde(rename = "oauth")]
    OAuth(OAuthIdentity),
}

impl Identity {
    pub fn subject_id(&self) -> &SubjectId {
        match self {
            Identity::Local(local) => &local.subject_id,
            Identity::OAuth(oauth) => &oauth.subject_id,
        }
    }

    pub fn profile(&self) -> &Profile {
        match self {
            Identity::Local(local) => &local.profile,
            Identity::OAuth(oauth) => &oauth.profile,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Identity::Local(_) => "local",
            Identity::OAuth(_) => "oauth",
        }
    }
}
