//! Entity traits: identity plus persistence bookkeeping.

use chrono::{DateTime, Utc};

/// A persisted record with a stable identity across updates.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Creation/update timestamps maintained by the owning store.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}
