use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of an authenticated subject, as carried in the credential.
///
/// Local and OAuth identities live in disjoint namespaces; the same value
/// may exist in both without referring to the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verified payload of a bearer credential.
///
/// Lives for one request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireClaims")]
pub struct ClaimSet {
    pub subject_id: SubjectId,

    /// Present only for credentials issued through an OAuth login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,

    /// Expiry as whole seconds since the unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Claims as they appear on the wire. Older credentials spell the subject
/// `_id`; `subject_id` wins when both are present.
#[derive(Deserialize)]
struct WireClaims {
    #[serde(default)]
    subject_id: Option<SubjectId>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<SubjectId>,
    #[serde(default)]
    oauth_provider: Option<String>,
    #[serde(default, deserialize_with = "numeric_date")]
    exp: Option<u64>,
}

impl TryFrom<WireClaims> for ClaimSet {
    type Error = &'static str;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        let subject_id = wire
            .subject_id
            .or(wire.legacy_id)
            .ok_or("missing field `subject_id`")?;

        Ok(Self {
            subject_id,
            oauth_provider: wire.oauth_provider,
            exp: wire.exp,
        })
    }
}

/// NumericDate may carry a fractional part; it is truncated (saturating).
fn numeric_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let secs = Option::<f64>::deserialize(deserializer)?;
    Ok(secs.map(|s| s as u64))
}

impl ClaimSet {
    pub fn local(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: SubjectId::new(subject_id),
            oauth_provider: None,
            exp: None,
        }
    }

    pub fn oauth(subject_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            subject_id: SubjectId::new(subject_id),
            oauth_provider: Some(provider.into()),
            exp: None,
        }
    }

    pub fn with_expiry(mut self, exp: u64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// The OAuth provider marker, if any. A blank marker counts as absent.
    pub fn oauth_provider(&self) -> Option<&str> {
        self.oauth_provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// A claim set is only usable with a non-empty subject.
    pub fn is_usable(&self) -> bool {
        !self.subject_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_id_claim() {
        let claims: ClaimSet =
            serde_json::from_str(r#"{"_id":"u1","oauth_provider":"github"}"#).unwrap();
        assert_eq!(claims.subject_id.as_str(), "u1");
        assert_eq!(claims.oauth_provider(), Some("github"));
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn subject_id_wins_over_legacy_id() {
        let claims: ClaimSet =
            serde_json::from_str(r#"{"subject_id":"u1","_id":"old"}"#).unwrap();
        assert_eq!(claims.subject_id.as_str(), "u1");
    }

    #[test]
    fn missing_subject_is_rejected() {
        let err = serde_json::from_str::<ClaimSet>(r#"{"oauth_provider":"github"}"#).unwrap_err();
        assert!(err.to_string().contains("subject_id"));
    }

    #[test]
    fn fractional_expiry_is_truncated() {
        let claims: ClaimSet =
            serde_json::from_str(r#"{"subject_id":"u1","exp":1700000000.75}"#).unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000));
    }

    #[test]
    fn blank_provider_is_treated_as_local() {
        let claims: ClaimSet =
            serde_json::from_str(r#"{"subject_id":"u1","oauth_provider":"  "}"#).unwrap();
        assert_eq!(claims.oauth_provider(), None);
    }

    #[test]
    fn empty_subject_is_not_usable() {
        assert!(!ClaimSet::local("").is_usable());
        assert!(!ClaimSet::local("   ").is_usable());
        assert!(ClaimSet::local("u1").is_usable());
    }

    #[test]
    fn serializes_without_absent_claims() {
        let json = serde_json::to_value(ClaimSet::local("u1")).unwrap();
        assert_eq!(json, serde_json::json!({ "subject_id": "u1" }));
    }
}
