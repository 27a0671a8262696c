//! Target and filter components.
//!
//! Targets resolve a fresh candidate set from the world around the
//! caster, ignoring whatever set they were handed; filters narrow the
//! incoming set. Both then gate their children on the survivors the
//! same way a condition does.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

use super::settings::Settings;
use super::{EffectContext, TargetList};

/// Closed set of target resolvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// The caster itself.
    Self_,
    /// The closest living hostile within `range`.
    Nearest,
    /// Living entities within `radius`, capped at `max`; the `caster`
    /// flag includes the caster in the set.
    Area,
}

/// Closed set of target filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// Keep targets on the caster's side.
    Allies,
    /// Keep targets hostile to the caster.
    Enemies,
    /// Keep targets that are still alive.
    Alive,
}

impl TargetKind {
    /// Resolve a new candidate set around the caster.
    pub(crate) fn resolve(
        &self,
        ctx: &mut EffectContext,
        settings: &Settings,
        caster: EntityId,
        level: i64,
        _incoming: &[EntityId],
    ) -> TargetList {
        let mut resolved = TargetList::new();

        match self {
            Self::Self_ => resolved.push(caster),

            Self::Nearest => {
                let range = settings.attr(ctx.formula, "range", level, 5.0);
                if let Some(found) = ctx.host.nearest_hostile(caster, range) {
                    resolved.push(found);
                }
            }

            Self::Area => {
                let radius = settings.attr(ctx.formula, "radius", level, 3.0);
                let max = settings.attr(ctx.formula, "max", level, 99.0).max(0.0) as usize;
                if settings.get_bool("caster", false) {
                    resolved.push(caster);
                }
                for entity in ctx.host.nearby(caster, radius) {
                    if resolved.len() >= max {
                        break;
                    }
                    resolved.push(entity);
                }
            }
        }

        resolved
    }
}

impl FilterKind {
    /// Narrow the incoming target set.
    pub(crate) fn narrow(
        &self,
        ctx: &mut EffectContext,
        _settings: &Settings,
        caster: EntityId,
        targets: &[EntityId],
    ) -> TargetList {
        let mut kept = TargetList::new();

        for &target in targets {
            let keep = match self {
                Self::Allies => ctx.host.are_allied(caster, target),
                Self::Enemies => target != caster && !ctx.host.are_allied(caster, target),
                Self::Alive => ctx.host.is_alive(target),
            };
            if keep {
                kept.push(target);
            }
        }

        kept
    }
}
