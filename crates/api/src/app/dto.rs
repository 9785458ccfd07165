//! Request/response bodies for the access token endpoints.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipyard_auth::{generate_key, AccessToken, NewAccessToken, Scope};
use shipyard_core::AccessTokenId;

#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    pub name: String,
    /// Generated when omitted.
    #[serde(default)]
    pub key: Option<String>,
    pub description: String,
    pub permissions: BTreeSet<Scope>,
}

impl CreateTokenRequest {
    pub fn into_new_token(self) -> NewAccessToken {
        NewAccessToken {
            name: self.name,
            key: self.key.unwrap_or_else(generate_key),
            description: self.description,
            permissions: self.permissions,
        }
    }
}

/// Public view of a token; the key is omitted.
#[derive(Debug, Serialize)]
pub struct TokenView {
    pub id: AccessTokenId,
    pub name: String,
    pub description: String,
    pub permissions: BTreeSet<Scope>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AccessToken> for TokenView {
    fn from(token: &AccessToken) -> Self {
        Self {
            id: token.id,
            name: token.name.clone(),
            description: token.description.clone(),
            permissions: token.permissions.clone(),
            created_at: token.created_at,
            updated_at: token.updated_at,
        }
    }
}

/// Returned only by create and rotate: the one time the key is shown.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    #[serde(flatten)]
    pub token: TokenView,
    pub key: String,
}

impl From<AccessToken> for IssuedToken {
    fn from(token: AccessToken) -> Self {
        Self {
            token: TokenView::from(&token),
            key: token.key,
        }
    }
}
