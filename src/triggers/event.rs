//! Platform event shapes.
//!
//! The host fires a `GameEvent` into [`TriggerManager::dispatch`] when
//! something trigger-worthy happens in the world. The engine does not
//! observe the world itself; the set of shapes here is the whole
//! vocabulary the trigger layer understands.
//!
//! One shape can serve several trigger kinds: a `Death` event fires
//! `DEATH` handlers armed on the victim and `KILL` handlers armed on
//! the killer, and a `PhysicalDamage` event fires `TOOK_DAMAGE` on the
//! victim and `DEALT_DAMAGE` on the attacker.
//!
//! [`TriggerManager::dispatch`]: super::TriggerManager::dispatch

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// An event fired by the host platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity started or stopped crouching.
    Crouch { entity: EntityId, started: bool },

    /// An entity landed after a fall.
    Land { entity: EntityId, distance: f64 },

    /// An entity died, possibly at the hands of another.
    Death {
        victim: EntityId,
        killer: Option<EntityId>,
    },

    /// One entity physically damaged another.
    PhysicalDamage {
        attacker: EntityId,
        victim: EntityId,
        amount: f64,
    },

    /// The world damaged an entity (fall, lava, drowning, ...).
    EnvironmentalDamage {
        victim: EntityId,
        cause: String,
        amount: f64,
    },
}

impl GameEvent {
    /// The entity the event primarily happened to.
    #[must_use]
    pub fn subject(&self) -> EntityId {
        match self {
            Self::Crouch { entity, .. } | Self::Land { entity, .. } => *entity,
            Self::Death { victim, .. }
            | Self::PhysicalDamage { victim, .. }
            | Self::EnvironmentalDamage { victim, .. } => *victim,
        }
    }

    /// The other entity involved, if the shape has one.
    #[must_use]
    pub fn other(&self) -> Option<EntityId> {
        match self {
            Self::Death { killer, .. } => *killer,
            Self::PhysicalDamage { attacker, .. } => Some(*attacker),
            Self::Crouch { .. } | Self::Land { .. } | Self::EnvironmentalDamage { .. } => None,
        }
    }
}
