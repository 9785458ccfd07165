use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Named permission carried by an access token (e.g. "projects.read").
///
/// Scopes are opaque strings compared for exact equality; there is no
/// wildcard or prefix matching at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank scopes are never valid members of a permission set.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Scope {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
