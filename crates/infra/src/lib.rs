//! `shipyard-infra` — store implementations behind the auth traits.

pub mod access_tokens;
pub mod seed;
pub mod user_store;

pub use access_tokens::InMemoryAccessTokenRegistry;
pub use seed::Seed;
pub use user_store::{InMemoryUserStore, LocalUserStore, OAuthUserStore};
