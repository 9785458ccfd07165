//! Bearer credential verification.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use zeroize::Zeroizing;

use crate::{AuthError, ClaimSet};

/// Scheme accepted in the `Authorization` header (compared case-insensitively).
pub const BEARER_SCHEME: &str = "Bearer";

/// Upper bound on `exp` leeway (one day).
pub const MAX_LEEWAY_SECS: u64 = 86_400;

/// Verification settings, built once at startup and owned by the verifier.
///
/// Every copy of the secret is zeroed when it is dropped.
#[derive(Clone)]
pub struct VerifierConfig {
    secret: Zeroizing<Vec<u8>>,
    leeway_secs: u64,
}

impl VerifierConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            leeway_secs: 0,
        }
    }

    /// Clock skew tolerated when checking `exp`, capped at [`MAX_LEEWAY_SECS`].
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs.min(MAX_LEEWAY_SECS);
        self
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }
}

impl core::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("secret", &"<redacted>")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Decodes and validates bearer credentials into claim sets.
///
/// Implementations must be pure: no I/O, no blocking.
pub trait CredentialVerifier: Send + Sync {
    /// Validate a bare token (no scheme prefix).
    fn decode(&self, token: &str) -> Result<ClaimSet, AuthError>;

    /// Validate a raw `Authorization` header value.
    fn verify(&self, header: Option<&str>) -> Result<ClaimSet, AuthError> {
        let token = extract_bearer(header)?;
        self.decode(token)
    }
}

/// Split `"<scheme> <token>"` and return the token.
///
/// An absent or blank header is no credential at all.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AuthError::malformed("expected '<scheme> <token>'"))?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::malformed(format!("unsupported scheme '{scheme}'")));
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::malformed("token segment is empty or split"));
    }

    Ok(token)
}

/// HMAC-SHA256 signed JWT verifier.
#[derive(Debug, Clone)]
pub struct Hs256CredentialVerifier {
    config: VerifierConfig,
    validation: Validation,
}

impl Hs256CredentialVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional; when present it is enforced.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_secs();

        Self { config, validation }
    }
}

impl CredentialVerifier for Hs256CredentialVerifier {
    fn decode(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let key = DecodingKey::from_secret(self.config.secret.as_slice());
        let data = decode::<ClaimSet>(token, &key, &self.validation)
            .map_err(|e| AuthError::invalid(format!("{:?}", e.kind())))?;

        let claims = data.claims;
        if !claims.is_usable() {
            return Err(AuthError::invalid("empty subject"));
        }

        Ok(claims)
    }
}
