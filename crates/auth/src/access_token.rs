//! Named, permission-scoped API credentials for machine-to-machine access.
//!
//! # Invariants
//! - `name` and `key` are unique across all access tokens (enforced by the
//!   registry).
//! - `permissions` holds at least one non-blank scope.
//! - `name`, `key` and `description` are non-empty.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shipyard_core::{AccessTokenId, Entity, Timestamped};

use crate::{Scope, StoreError};

/// Prefix of generated access token keys.
pub const KEY_PREFIX: &str = "sy_";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessTokenError {
    #[error("an access token named '{0}' already exists")]
    DuplicateName(String),

    #[error("an access token with this key already exists")]
    DuplicateKey,

    #[error("invalid permission set: {0}")]
    InvalidPermissionSet(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("access token '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persisted access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: AccessTokenId,
    pub name: String,
    pub key: String,
    pub description: String,
    pub permissions: BTreeSet<Scope>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl core::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key", &"<redacted>")
            .field("description", &self.description)
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Input for creating an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccessToken {
    pub name: String,
    pub key: String,
    pub description: String,
    pub permissions: BTreeSet<Scope>,
}

/// Partial edit of an existing token. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessTokenUpdate {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<BTreeSet<Scope>>,
}

impl AccessToken {
    /// Validate `new` and stamp it. Uniqueness is the registry's job.
    pub fn create(new: NewAccessToken, now: DateTime<Utc>) -> Result<Self, AccessTokenError> {
        require("name", &new.name)?;
        require("key", &new.key)?;
        require("description", &new.description)?;
        validate_permissions(&new.permissions)?;

        Ok(Self {
            id: AccessTokenId::new(),
            name: new.name,
            key: new.key,
            description: new.description,
            permissions: new.permissions,
            created_at: now,
            updated_at: now,
        })
    }

    /// True iff `required` is one of this token's scopes.
    pub fn authorize(&self, required: &Scope) -> bool {
        self.permissions.contains(required)
    }

    /// Apply an edit; on error the token is left untouched.
    pub fn apply(
        &mut self,
        update: AccessTokenUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), AccessTokenError> {
        if let Some(description) = &update.description {
            require("description", description)?;
        }
        if let Some(permissions) = &update.permissions {
            validate_permissions(permissions)?;
        }

        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(permissions) = update.permissions {
            self.permissions = permissions;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn rotate(&mut self, key: String, now: DateTime<Utc>) -> Result<(), AccessTokenError> {
        require("key", &key)?;
        self.key = key;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for AccessToken {
    type Id = AccessTokenId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Timestamped for AccessToken {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Generate a fresh random key (`sy_` + 32 hex chars).
pub fn generate_key() -> String {
    format!("{KEY_PREFIX}{}", Uuid::new_v4().simple())
}

fn require(field: &'static str, value: &str) -> Result<(), AccessTokenError> {
    if value.trim().is_empty() {
        return Err(AccessTokenError::MissingField(field));
    }
    Ok(())
}

fn validate_permissions(permissions: &BTreeSet<Scope>) -> Result<(), AccessTokenError> {
    if permissions.is_empty() {
        return Err(AccessTokenError::InvalidPermissionSet(
            "at least one permission is required".to_string(),
        ));
    }
    if permissions.iter().any(Scope::is_blank) {
        return Err(AccessTokenError::InvalidPermissionSet(
            "permissions must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Storage of access tokens.
///
/// Implementations enforce name/key uniqueness atomically with the write.
#[async_trait]
pub trait AccessTokenRegistry: Send + Sync {
    async fn create(&self, new: NewAccessToken) -> Result<AccessToken, AccessTokenError>;

    async fn get(&self, id: AccessTokenId) -> Result<Option<AccessToken>, AccessTokenError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<AccessToken>, AccessTokenError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<AccessToken>, AccessTokenError>;

    /// All tokens, ordered by name.
    async fn list(&self) -> Result<Vec<AccessToken>, AccessTokenError>;

    async fn update(
        &self,
        name: &str,
        update: AccessTokenUpdate,
    ) -> Result<AccessToken, AccessTokenError>;

    async fn rotate_key(&self, name: &str, key: String) -> Result<AccessToken, AccessTokenError>;

    /// Revoke a token; returns the removed record.
    async fn delete(&self, name: &str) -> Result<AccessToken, AccessTokenError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scopes(items: &[&'static str]) -> BTreeSet<Scope> {
        items.iter().copied().map(Scope::from_static).collect()
    }

    fn new_token() -> NewAccessToken {
        NewAccessToken {
            name: "ci".into(),
            key: generate_key(),
            description: "deploys from CI".into(),
            permissions: scopes(&["projects.read", "projects.deploy"]),
        }
    }

    #[test]
    fn create_rejects_empty_permission_set() {
        let err = AccessToken::create(
            NewAccessToken {
                permissions: BTreeSet::new(),
                ..new_token()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, AccessTokenError::InvalidPermissionSet(_)));
    }

    #[test]
    fn create_rejects_blank_scope() {
        let err = AccessToken::create(
            NewAccessToken {
                permissions: scopes(&["projects.read", " "]),
                ..new_token()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, AccessTokenError::InvalidPermissionSet(_)));
    }

    #[test]
    fn create_requires_name_key_and_description() {
        let cases = [
            (NewAccessToken { name: "".into(), ..new_token() }, "name"),
            (NewAccessToken { key: " ".into(), ..new_token() }, "key"),
            (NewAccessToken { description: "".into(), ..new_token() }, "description"),
        ];
        for (input, field) in cases {
            assert_eq!(
                AccessToken::create(input, Utc::now()).unwrap_err(),
                AccessTokenError::MissingField(field)
            );
        }
    }

    #[test]
    fn failed_update_leaves_token_untouched() {
        let mut token = AccessToken::create(new_token(), Utc::now()).unwrap();
        let before = token.clone();

        let err = token
            .apply(
                AccessTokenUpdate {
                    description: Some("new".into()),
                    permissions: Some(BTreeSet::new()),
                },
                Utc::now(),
            )
            .unwrap_err();

        assert!(matches!(err, AccessTokenError::InvalidPermissionSet(_)));
        assert_eq!(token, before);
    }

    #[test]
    fn update_replaces_permission_set() {
        let mut token = AccessToken::create(new_token(), Utc::now()).unwrap();
        token
            .apply(
                AccessTokenUpdate {
                    description: None,
                    permissions: Some(scopes(&["domains.write"])),
                },
                Utc::now(),
            )
            .unwrap();

        assert!(token.authorize(&Scope::from_static("domains.write")));
        assert!(!token.authorize(&Scope::from_static("projects.read")));
        assert_eq!(token.description, "deploys from CI");
    }

    #[test]
    fn generated_keys_are_prefixed_and_distinct() {
        let a = generate_key();
        let b = generate_key();
        assert!(a.starts_with(KEY_PREFIX));
        assert_eq!(a.len(), KEY_PREFIX.len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn debug_redacts_key() {
        let token = AccessToken::create(new_token(), Utc::now()).unwrap();
        assert!(!format!("{token:?}").contains(&token.key));
    }

    #[test]
    fn persisted_shape_lists_permissions() {
        let token = AccessToken::create(new_token(), Utc::now()).unwrap();
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(
            json["permissions"],
            serde_json::json!(["projects.deploy", "projects.read"])
        );
    }

    proptest! {
        #[test]
        fn authorize_is_set_membership(
            granted in proptest::collection::btree_set("[a-z]{1,8}\\.[a-z]{1,8}", 1..6),
            required in "[a-z]{1,8}\\.[a-z]{1,8}",
        ) {
            let permissions: BTreeSet<Scope> = granted.iter().cloned().map(Scope::from).collect();
            let token = AccessToken::create(
                NewAccessToken { permissions, ..new_token() },
                Utc::now(),
            ).unwrap();

            prop_assert_eq!(
                token.authorize(&Scope::from(required.clone())),
                granted.contains(&required)
            );
        }
    }
}
