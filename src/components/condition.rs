//! Condition components.
//!
//! A condition filters the incoming target list with a predicate and
//! gates its children on the survivors. Predicates read their thresholds
//! from the node's settings at test time, so one component definition
//! serves every level of every skill that references it.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

use super::settings::Settings;
use super::EffectContext;

/// Closed set of condition predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Random roll against a `chance` percentage.
    Chance,
    /// Target health between `min_value` and `max_value`.
    Health,
    /// Target mana between `min_value` and `max_value`.
    Mana,
    /// Target burning state matches the `type` setting
    /// (`required`/`forbidden`).
    Fire,
    /// Target in-water state matches the `type` setting.
    Water,
    /// Target elevation between `min_value` and `max_value`.
    Elevation,
    /// Target stands in one of the comma-separated `biome` names.
    Biome,
    /// World clock matches the `time` setting (`day`/`night`).
    Time,
    /// Target name matches the `name` setting; `contains` (default true)
    /// switches between substring and exact comparison.
    Name,
}

/// Ticks in a world day; the first half is daytime.
const DAY_TICKS: u64 = 24_000;

impl ConditionKind {
    /// Test one target against this predicate.
    pub(crate) fn test(
        &self,
        ctx: &mut EffectContext,
        settings: &Settings,
        _caster: EntityId,
        level: i64,
        target: EntityId,
    ) -> bool {
        match self {
            Self::Chance => {
                let percent = settings.attr(ctx.formula, "chance", level, 100.0);
                ctx.rng.chance(percent)
            }

            Self::Health => {
                let min = settings.attr(ctx.formula, "min_value", level, 0.0);
                let max = settings.attr(ctx.formula, "max_value", level, f64::MAX);
                ctx.host
                    .health(target)
                    .is_some_and(|health| health >= min && health <= max)
            }

            Self::Mana => {
                let min = settings.attr(ctx.formula, "min_value", level, 0.0);
                let max = settings.attr(ctx.formula, "max_value", level, f64::MAX);
                ctx.host
                    .mana(target)
                    .is_some_and(|mana| mana >= min && mana <= max)
            }

            Self::Fire => {
                let required = settings.get_string("type", "required");
                ctx.host.is_burning(target) == required.eq_ignore_ascii_case("required")
            }

            Self::Water => {
                let required = settings.get_string("type", "required");
                ctx.host.is_in_water(target) == required.eq_ignore_ascii_case("required")
            }

            Self::Elevation => {
                let min = settings.attr(ctx.formula, "min_value", level, 0.0);
                let max = settings.attr(ctx.formula, "max_value", level, 255.0);
                ctx.host
                    .elevation(target)
                    .is_some_and(|y| y >= min && y <= max)
            }

            Self::Biome => {
                let Some(biome) = ctx.host.biome(target) else {
                    return false;
                };
                settings
                    .get_string("biome", "")
                    .split(',')
                    .map(str::trim)
                    .any(|name| !name.is_empty() && name.eq_ignore_ascii_case(&biome))
            }

            Self::Time => {
                let daytime = ctx.host.world_time() % DAY_TICKS < DAY_TICKS / 2;
                match settings.get_string("time", "day").to_ascii_lowercase().as_str() {
                    "night" => !daytime,
                    _ => daytime,
                }
            }

            Self::Name => {
                let Some(name) = ctx.host.name(target) else {
                    return false;
                };
                let wanted = settings.get_string("name", "");
                if wanted.is_empty() {
                    return false;
                }
                let name = name.to_ascii_lowercase();
                let wanted = wanted.to_ascii_lowercase();
                if settings.get_bool("contains", true) {
                    name.contains(&wanted)
                } else {
                    name == wanted
                }
            }
        }
    }
}
