//! Process-wide registry of armed trigger handlers.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::components::{CastDataStore, EffectContext, PendingTasks};
use crate::core::{EntityId, FormulaEvaluator, Host, ScheduledTask, SkillRng};

use super::event::GameEvent;
use super::handler::TriggerHandler;

/// One handler armed for an entity, with its fire-time cooldown state.
#[derive(Clone, Debug)]
struct ArmedHandler {
    handler: TriggerHandler,
    last_fired_ms: Option<u64>,
}

/// All handlers of one skill armed for an entity, under a shared expiry
/// window.
#[derive(Clone, Debug)]
struct ArmedSkill {
    level: i64,
    /// Absolute expiry in host milliseconds; `0` never expires.
    expires_at_ms: u64,
    handlers: Vec<ArmedHandler>,
}

impl ArmedSkill {
    fn expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms != 0 && now_ms >= self.expires_at_ms
    }
}

/// Registry of currently armed trigger handlers per entity.
///
/// Initialized once per server lifetime and reset with [`clear`] on
/// plugin reload. The host forwards platform events into [`dispatch`];
/// the manager finds armed handlers whose classifier matches, re-checks
/// each handler's own settings (chance, cooldown) at fire time, and
/// runs the bound payload. Expired armed entries are reaped lazily on
/// lookup; no background sweep is required.
///
/// [`clear`]: TriggerManager::clear
/// [`dispatch`]: TriggerManager::dispatch
#[derive(Debug, Default)]
pub struct TriggerManager {
    armed: FxHashMap<EntityId, FxHashMap<String, ArmedSkill>>,
    cast_data: CastDataStore,
    pending: PendingTasks,
}

impl TriggerManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `handlers` for `entity` under the given skill id.
    ///
    /// Re-arming a skill that is already armed replaces the previous
    /// window: old handlers are disarmed (and their deferred work
    /// cancelled) first. A non-positive duration arms until explicitly
    /// disarmed.
    pub fn activate_skill(
        &mut self,
        host: &mut dyn Host,
        skill: &str,
        entity: EntityId,
        level: i64,
        duration_s: f64,
        handlers: Vec<TriggerHandler>,
    ) {
        self.deactivate_skill(host, skill, entity);

        let expires_at_ms = if duration_s <= 0.0 {
            0
        } else {
            host.now_ms() + (duration_s * 1000.0) as u64
        };

        debug!(
            skill,
            entity = %entity,
            handlers = handlers.len(),
            expires_at_ms,
            "arming skill triggers"
        );

        let armed = ArmedSkill {
            level,
            expires_at_ms,
            handlers: handlers
                .into_iter()
                .map(|handler| ArmedHandler {
                    handler,
                    last_fired_ms: None,
                })
                .collect(),
        };
        self.armed.entry(entity).or_default().insert(skill.to_string(), armed);
    }

    /// Disarm and forget a skill's handlers for an entity, cancelling
    /// any deferred work they scheduled. No-op when nothing is armed.
    pub fn deactivate_skill(&mut self, host: &mut dyn Host, skill: &str, entity: EntityId) {
        let Some(skills) = self.armed.get_mut(&entity) else {
            return;
        };
        let Some(armed) = skills.remove(skill) else {
            return;
        };
        if skills.is_empty() {
            self.armed.remove(&entity);
        }

        debug!(skill, entity = %entity, "disarming skill triggers");

        for entry in &armed.handlers {
            entry.handler.component().clean_up(host, &mut self.pending, entity);
        }
        for task in self.pending.drain(skill, entity) {
            host.cancel(task);
        }
        self.cast_data.clear(entity);
    }

    /// Whether a skill is currently armed for an entity. An expired
    /// entry is reaped and reported as not armed.
    pub fn is_armed(&mut self, host: &mut dyn Host, skill: &str, entity: EntityId) -> bool {
        let Some(armed) = self.armed.get(&entity).and_then(|skills| skills.get(skill)) else {
            return false;
        };
        if armed.expired(host.now_ms()) {
            self.deactivate_skill(host, skill, entity);
            return false;
        }
        true
    }

    /// Route a platform event to every matching armed handler.
    ///
    /// For each entity the event involves: expired armed skills are
    /// reaped first, then each surviving handler whose classifier
    /// matches the event re-checks its own settings — kind-specific
    /// filters, `cooldown` (seconds), `chance` (percent) — before the
    /// bound payload runs. The `target` setting selects whether the
    /// payload runs against the armed entity (`self`, default) or the
    /// event counterpart (`other`).
    ///
    /// Returns the number of handlers that fired.
    pub fn dispatch(
        &mut self,
        host: &mut dyn Host,
        formula: &dyn FormulaEvaluator,
        rng: &mut SkillRng,
        event: &GameEvent,
    ) -> usize {
        let now = host.now_ms();
        let mut fired = 0;

        let mut involved = vec![event.subject()];
        if let Some(other) = event.other() {
            if !involved.contains(&other) {
                involved.push(other);
            }
        }

        for &entity in &involved {
            let expired: Vec<String> = self
                .armed
                .get(&entity)
                .map(|skills| {
                    skills
                        .iter()
                        .filter(|(_, armed)| armed.expired(now))
                        .map(|(skill, _)| skill.clone())
                        .collect()
                })
                .unwrap_or_default();
            for skill in expired {
                self.deactivate_skill(host, &skill, entity);
            }

            let TriggerManager {
                armed,
                cast_data,
                pending,
            } = self;
            let Some(skills) = armed.get_mut(&entity) else {
                continue;
            };

            for armed_skill in skills.values_mut() {
                let level = armed_skill.level;
                for entry in &mut armed_skill.handlers {
                    let handler = &entry.handler;
                    if handler.trigger().subject_of(event) != Some(entity) {
                        continue;
                    }
                    if !handler.trigger().passes(handler.settings(), event) {
                        continue;
                    }

                    let cooldown_s = handler.settings().get_double("cooldown", 0.0);
                    if let Some(last) = entry.last_fired_ms {
                        if cooldown_s > 0.0 && now < last + (cooldown_s * 1000.0) as u64 {
                            continue;
                        }
                    }

                    let chance = handler.settings().get_double("chance", 100.0);
                    if !rng.chance(chance) {
                        continue;
                    }

                    let target = if handler
                        .settings()
                        .get_string("target", "self")
                        .eq_ignore_ascii_case("other")
                    {
                        handler.trigger().counterpart_of(event).unwrap_or(entity)
                    } else {
                        entity
                    };

                    debug!(
                        skill = handler.skill(),
                        trigger = %handler.trigger(),
                        entity = %entity,
                        "trigger fired"
                    );

                    let mut ctx = EffectContext::new(host, formula, rng, cast_data, pending);
                    handler.handle_immediate(&mut ctx, entity, level, target);
                    entry.last_fired_ms = Some(now);
                    fired += 1;
                }
            }

            // Scratch values do not outlive the dispatch that wrote them.
            cast_data.clear(entity);
        }

        fired
    }

    /// Run a deferred continuation scheduled by an armed handler's
    /// payload.
    ///
    /// Re-validates that the caster is live and the owning skill is
    /// still armed, and drops targets that died during the delay.
    pub fn run_scheduled(
        &mut self,
        host: &mut dyn Host,
        formula: &dyn FormulaEvaluator,
        rng: &mut SkillRng,
        task: ScheduledTask,
    ) -> bool {
        if !host.is_alive(task.caster) {
            return false;
        }
        if !self.is_armed(host, &task.skill, task.caster) {
            warn!(
                skill = task.skill.as_str(),
                caster = %task.caster,
                "dropping scheduled work for disarmed skill"
            );
            return false;
        }

        let live: Vec<EntityId> = task
            .targets
            .iter()
            .copied()
            .filter(|&target| host.is_alive(target))
            .collect();
        if live.is_empty() {
            return false;
        }

        let TriggerManager {
            cast_data, pending, ..
        } = self;
        let mut ctx = EffectContext::new(host, formula, rng, cast_data, pending);
        let mut worked = false;
        for component in &task.components {
            worked = component.execute(&mut ctx, task.caster, task.level, &live) || worked;
        }
        worked
    }

    /// Disarm everything and cancel all outstanding deferred work.
    /// Called on plugin reload.
    pub fn clear(&mut self, host: &mut dyn Host) {
        for task in self.pending.drain_all() {
            host.cancel(task);
        }
        self.armed.clear();
        self.cast_data.clear_all();
    }

    /// Total number of armed (entity, skill) entries.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.armed.values().map(FxHashMap::len).sum()
    }

    /// Whether nothing is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
