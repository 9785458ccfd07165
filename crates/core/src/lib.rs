//! `shipyard-core` — domain primitives shared by every platform crate.
//!
//! No infrastructure or transport concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Timestamped};
pub use error::{DomainError, DomainResult};
pub use id::AccessTokenId;
