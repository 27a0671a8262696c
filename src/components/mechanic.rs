//! Mechanic components.
//!
//! Mechanics are the leaves that actually touch the world: each
//! application maps to one host primitive against one target. Numeric
//! magnitudes follow the `value_base`/`value_scale` level convention.
//!
//! The one exception to the leaf rule is `Delay`, whose children are its
//! continuation: they are captured into a [`ScheduledTask`] and handed
//! to the host scheduler, with the returned handle recorded for
//! cancellation on deactivation.
//!
//! [`ScheduledTask`]: crate::core::ScheduledTask

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, ScheduledTask};
use crate::error::ExecError;

use super::{EffectComponent, EffectContext};

/// Closed set of concrete game effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechanicKind {
    /// Deal `value` damage attributed to the caster.
    Damage,
    /// Restore `value` health.
    Heal,
    /// Knock the target away from the caster at `speed`.
    Push,
    /// Ignite the target for `seconds`.
    Fire,
    /// Apply the `potion` status effect at `tier` for `seconds`.
    Potion,
    /// Send the `message` text, with `{target}` replaced by the target's
    /// name.
    Message,
    /// Play the `particle` effect `amount` times.
    Particle,
    /// Play the `sound` at `volume` and `pitch`.
    Sound,
    /// Run the `command` string with the target as subject.
    Command,
    /// Detonate an explosion of `power`.
    Explosion,
    /// Scale movement speed by `multiplier` for `seconds`.
    Speed,
    /// Strip all status effects.
    Cleanse,
    /// Schedule this node's children to run after `seconds`.
    Delay,
    /// Launch the `projectile` from the caster at `speed`.
    Launch,
    /// Strike lightning at the target.
    Lightning,
}

impl MechanicKind {
    /// Apply this mechanic to one target.
    ///
    /// Returns whether the application had an effect; host failures
    /// surface as errors for the caller to confine.
    pub(crate) fn apply(
        &self,
        ctx: &mut EffectContext,
        component: &EffectComponent,
        caster: EntityId,
        level: i64,
        target: EntityId,
    ) -> Result<bool, ExecError> {
        let settings = component.settings();

        match self {
            Self::Damage => {
                let amount = settings.attr(ctx.formula, "value", level, 1.0);
                if amount <= 0.0 {
                    return Ok(false);
                }
                ctx.host.damage(caster, target, amount)?;
                Ok(true)
            }

            Self::Heal => {
                let amount = settings.attr(ctx.formula, "value", level, 1.0);
                if amount <= 0.0 {
                    return Ok(false);
                }
                ctx.host.heal(target, amount)?;
                Ok(true)
            }

            Self::Push => {
                let speed = settings.attr(ctx.formula, "speed", level, 1.0);
                ctx.host.push(caster, target, speed)?;
                Ok(true)
            }

            Self::Fire => {
                let seconds = settings.attr(ctx.formula, "seconds", level, 3.0);
                if seconds <= 0.0 {
                    return Ok(false);
                }
                ctx.host.ignite(target, to_millis(seconds))?;
                Ok(true)
            }

            Self::Potion => {
                let effect = settings.get_string("potion", "slowness");
                let tier = settings.attr(ctx.formula, "tier", level, 1.0) as i64;
                let seconds = settings.attr(ctx.formula, "seconds", level, 3.0);
                ctx.host
                    .apply_potion(target, &effect, tier.max(1), to_millis(seconds))?;
                Ok(true)
            }

            Self::Message => {
                let text = settings.get_string("message", "");
                if text.is_empty() {
                    return Ok(false);
                }
                let text = match ctx.host.name(target) {
                    Some(name) => text.replace("{target}", &name),
                    None => text,
                };
                ctx.host.message(target, &text)?;
                Ok(true)
            }

            Self::Particle => {
                let name = settings.get_string("particle", "flame");
                let amount = settings.attr(ctx.formula, "amount", level, 10.0) as i64;
                ctx.host.particle(target, &name, amount.max(1))?;
                Ok(true)
            }

            Self::Sound => {
                let name = settings.get_string("sound", "");
                if name.is_empty() {
                    return Ok(false);
                }
                let volume = settings.attr(ctx.formula, "volume", level, 1.0);
                let pitch = settings.attr(ctx.formula, "pitch", level, 1.0);
                ctx.host.sound(target, &name, volume, pitch)?;
                Ok(true)
            }

            Self::Command => {
                let command = settings.get_string("command", "");
                if command.is_empty() {
                    return Ok(false);
                }
                ctx.host.command(target, &command)?;
                Ok(true)
            }

            Self::Explosion => {
                let power = settings.attr(ctx.formula, "power", level, 2.0);
                ctx.host.explode(target, power)?;
                Ok(true)
            }

            Self::Speed => {
                let multiplier = settings.attr(ctx.formula, "multiplier", level, 1.2);
                let seconds = settings.attr(ctx.formula, "seconds", level, 3.0);
                ctx.host.set_speed(target, multiplier, to_millis(seconds))?;
                Ok(true)
            }

            Self::Cleanse => {
                ctx.host.cleanse(target)?;
                Ok(true)
            }

            Self::Delay => {
                if !component.has_children() {
                    return Ok(false);
                }
                let seconds = settings.attr(ctx.formula, "seconds", level, 1.0);
                let skill = component.skill().unwrap_or_default().to_string();
                let task = ScheduledTask {
                    skill: skill.clone(),
                    caster,
                    level,
                    targets: vec![target],
                    components: component.children(),
                };
                let id = ctx.host.schedule(to_millis(seconds), task);
                ctx.pending.push(&skill, caster, id);
                Ok(true)
            }

            Self::Launch => {
                let projectile = settings.get_string("projectile", "arrow");
                let speed = settings.attr(ctx.formula, "speed", level, 2.0);
                ctx.host.launch(caster, &projectile, speed)?;
                Ok(true)
            }

            Self::Lightning => {
                ctx.host.lightning(target)?;
                Ok(true)
            }
        }
    }
}

fn to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0) as u64
}
