//! Authentication failure taxonomy.
//!
//! Internal variants stay distinct for logging; callers only ever see the
//! coarse [`Rejection`] derived from them.

use thiserror::Error;

use crate::SubjectId;

/// Fault reported by a backing store (connection loss, corrupt record, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("store error: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a request failed to authenticate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential presented")]
    MissingCredential,

    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    /// Signature, expiry and decoding failures are deliberately one variant.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("no identity record for subject '{0}'")]
    IdentityNotFound(SubjectId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCredential(reason.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCredential(reason.into())
    }

    /// Externally visible outcome for this failure.
    pub fn rejection(&self) -> Rejection {
        match self {
            AuthError::MissingCredential => Rejection::NotLoggedIn,
            AuthError::IdentityNotFound(_) => Rejection::UserNotFound,
            AuthError::MalformedCredential(_)
            | AuthError::InvalidCredential(_)
            | AuthError::Store(_) => Rejection::CouldNotProcess,
        }
    }
}

/// The only three outcomes a rejected caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NotLoggedIn,
    CouldNotProcess,
    UserNotFound,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NotLoggedIn => "Not logged in",
            Rejection::CouldNotProcess => "Could not process authentication status",
            Rejection::UserNotFound => "User not found",
        }
    }
}
