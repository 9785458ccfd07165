//! Authorization on top of authentication.
//!
//! Machine-to-machine handlers check scopes before doing any work; the token
//! itself was already resolved by the API key middleware. Token
//! administration is limited to configured local users.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use shipyard_auth::{Identity, Scope, SubjectId};

use crate::context::TokenContext;

/// List access token names.
pub const TOKENS_READ: Scope = Scope::from_static("tokens.read");

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("missing required permission '{0}'")]
pub struct MissingScope(pub Scope);

pub fn require_scope(ctx: &TokenContext, required: &Scope) -> Result<(), MissingScope> {
    if ctx.token().authorize(required) {
        Ok(())
    } else {
        Err(MissingScope(required.clone()))
    }
}

/// Local subjects allowed to issue, edit, rotate and revoke access tokens.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    subjects: Arc<HashSet<SubjectId>>,
}

impl AdminPolicy {
    pub fn new(subjects: impl IntoIterator<Item = SubjectId>) -> Self {
        Self {
            subjects: Arc::new(subjects.into_iter().collect()),
        }
    }

    /// OAuth identities never administer tokens; their ids live in another
    /// namespace.
    pub fn allows(&self, identity: &Identity) -> bool {
        matches!(identity, Identity::Local(local) if self.subjects.contains(&local.subject_id))
    }

    pub fn contains(&self, subject: &SubjectId) -> bool {
        self.subjects.contains(subject)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
