//! `shipyard-auth` — request authentication and scoped API credentials.
//!
//! Decoupled from HTTP and storage: transports hand the gate a raw
//! `Authorization` value, stores plug in through the async traits below.

pub mod access_token;
pub mod capability;
pub mod claims;
pub mod error;
pub mod gate;
pub mod identity;
pub mod resolver;
pub mod scope;
pub mod verifier;

pub use access_token::{
    generate_key, AccessToken, AccessTokenError, AccessTokenRegistry, AccessTokenUpdate,
    NewAccessToken,
};
pub use capability::{bind, Capability};
pub use claims::{ClaimSet, SubjectId};
pub use error::{AuthError, Rejection, StoreError};
pub use gate::{AuthGate, AuthenticatedContext};
pub use identity::{
    ExternalToken, Identity, LocalIdentity, LocalUserRecord, OAuthIdentity, OAuthTokenSet,
    OAuthUserRecord, Profile,
};
pub use resolver::{IdentityResolver, LocalIdentityStore, OAuthIdentityStore};
pub use scope::Scope;
pub use verifier::{
    extract_bearer, CredentialVerifier, Hs256CredentialVerifier, VerifierConfig, MAX_LEEWAY_SECS,
};
