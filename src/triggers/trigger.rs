//! Trigger classifiers.
//!
//! A `TriggerKind` is stateless: it only decides whether an incoming
//! event concerns it and, if so, which entity's armed handlers should
//! fire. Everything stateful about an armed trigger (expiry, cooldown
//! bookkeeping) lives in the [`TriggerManager`].
//!
//! [`TriggerManager`]: super::TriggerManager

use serde::{Deserialize, Serialize};

use crate::components::Settings;
use crate::core::EntityId;

use super::event::GameEvent;

/// Closed set of trigger classifiers, keyed by uppercase identifiers in
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Synthetic "fire right away" trigger; never matches a platform
    /// event.
    Cast,
    /// The armed entity crouched (or stood up, per the `type` setting).
    Crouch,
    /// The armed entity landed after falling at least `min_distance`.
    Land,
    /// The armed entity died.
    Death,
    /// The armed entity killed something.
    Kill,
    /// The armed entity took at least `min_damage` physical damage.
    TookDamage,
    /// The armed entity dealt at least `min_damage` physical damage.
    DealtDamage,
    /// The armed entity took environmental damage, optionally filtered
    /// by `cause`.
    Environmental,
}

impl TriggerKind {
    /// Every classifier, in declaration order.
    pub const ALL: [TriggerKind; 8] = [
        Self::Cast,
        Self::Crouch,
        Self::Land,
        Self::Death,
        Self::Kill,
        Self::TookDamage,
        Self::DealtDamage,
        Self::Environmental,
    ];

    /// The canonical uppercase identifier.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Cast => "CAST",
            Self::Crouch => "CROUCH",
            Self::Land => "LAND",
            Self::Death => "DEATH",
            Self::Kill => "KILL",
            Self::TookDamage => "TOOK_DAMAGE",
            Self::DealtDamage => "DEALT_DAMAGE",
            Self::Environmental => "ENVIRONMENTAL",
        }
    }

    /// Parse an identifier, tolerating case and hyphen/underscore
    /// spelling. Returns `None` for unknown identifiers.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Whether this classifier concerns the event at all.
    #[must_use]
    pub fn matches(self, event: &GameEvent) -> bool {
        self.subject_of(event).is_some()
    }

    /// The entity whose armed handlers fire for this event, when it
    /// matches.
    #[must_use]
    pub fn subject_of(self, event: &GameEvent) -> Option<EntityId> {
        match (self, event) {
            (Self::Crouch, GameEvent::Crouch { entity, .. }) => Some(*entity),
            (Self::Land, GameEvent::Land { entity, .. }) => Some(*entity),
            (Self::Death, GameEvent::Death { victim, .. }) => Some(*victim),
            (Self::Kill, GameEvent::Death { killer, .. }) => *killer,
            (Self::TookDamage, GameEvent::PhysicalDamage { victim, .. }) => Some(*victim),
            (Self::DealtDamage, GameEvent::PhysicalDamage { attacker, .. }) => Some(*attacker),
            (Self::Environmental, GameEvent::EnvironmentalDamage { victim, .. }) => Some(*victim),
            _ => None,
        }
    }

    /// The entity opposite the subject, for handlers whose `target`
    /// setting is `other`.
    #[must_use]
    pub fn counterpart_of(self, event: &GameEvent) -> Option<EntityId> {
        match (self, event) {
            (Self::Death, GameEvent::Death { killer, .. }) => *killer,
            (Self::Kill, GameEvent::Death { victim, .. }) => Some(*victim),
            (Self::TookDamage, GameEvent::PhysicalDamage { attacker, .. }) => Some(*attacker),
            (Self::DealtDamage, GameEvent::PhysicalDamage { victim, .. }) => Some(*victim),
            _ => None,
        }
    }

    /// Kind-specific settings check, applied at fire time against the
    /// matched event.
    pub(crate) fn passes(self, settings: &Settings, event: &GameEvent) -> bool {
        match (self, event) {
            (Self::Crouch, GameEvent::Crouch { started, .. }) => {
                match settings.get_string("type", "start").to_ascii_lowercase().as_str() {
                    "stop" => !started,
                    "both" => true,
                    _ => *started,
                }
            }

            (Self::Land, GameEvent::Land { distance, .. }) => {
                *distance >= settings.get_double("min_distance", 0.0)
            }

            (
                Self::TookDamage | Self::DealtDamage,
                GameEvent::PhysicalDamage { amount, .. },
            ) => *amount >= settings.get_double("min_damage", 0.0),

            (Self::Environmental, GameEvent::EnvironmentalDamage { cause, .. }) => {
                let wanted = settings.get_string("cause", "any");
                wanted.eq_ignore_ascii_case("any") || wanted.eq_ignore_ascii_case(cause)
            }

            _ => true,
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
