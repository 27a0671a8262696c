//! Entity identification.
//!
//! Every live game object a skill can touch (players, mobs, summons) is
//! addressed by an opaque `EntityId` minted by the host platform. The
//! engine never interprets the value; it only uses it as a map key for
//! per-entity bookkeeping.

use serde::{Deserialize, Serialize};

/// Unique identifier for a live game entity.
///
/// The host platform owns allocation and liveness; the engine treats the
/// id as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
