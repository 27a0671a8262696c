//! Skill effect aggregate.
//!
//! A `SkillEffect` is one skill's ordered forest of top-level
//! components plus the per-entity bookkeeping the components themselves
//! stay free of: activation records with time-based expiry, cast-data
//! scratch state, and handles to deferred work awaiting a scheduler
//! callback.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::components::{
    CastData, CastDataStore, EffectComponent, EffectContext, PendingTasks,
};
use crate::core::{EntityId, FormulaEvaluator, Host, ScheduledTask, SkillRng};

/// Level reported for entities with no active instance.
pub const INACTIVE_LEVEL: i64 = -1;

/// Per-entity record of a skill's current activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveInstance {
    /// Skill level the activation was made at.
    pub level: i64,
    /// Absolute expiry in host milliseconds; `0` never expires.
    pub expires_at_ms: u64,
}

/// One skill's effect forest and per-entity activation state.
#[derive(Debug, Default)]
pub struct SkillEffect {
    skill: String,
    components: Vec<EffectComponent>,
    active: FxHashMap<EntityId, ActiveInstance>,
    cast_data: CastDataStore,
    pending: PendingTasks,
}

impl SkillEffect {
    /// Create an empty effect for a skill id.
    #[must_use]
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            ..Self::default()
        }
    }

    /// The owning skill id.
    #[must_use]
    pub fn skill(&self) -> &str {
        &self.skill
    }

    /// Append a top-level component, attaching the owning-skill id to
    /// its whole subtree. An absent component (a loader skipping an
    /// unknown declaration) is ignored.
    pub fn add_component(&mut self, component: impl Into<Option<EffectComponent>>) {
        let Some(mut component) = component.into() else {
            return;
        };
        component.set_skill(&self.skill);
        self.components.push(component);
    }

    /// The ordered top-level components.
    #[must_use]
    pub fn components(&self) -> &[EffectComponent] {
        &self.components
    }

    /// Execute every top-level component in declaration order.
    ///
    /// All components run regardless of earlier results; the skill
    /// succeeded iff at least one of them did. (Conditions short-circuit
    /// internally on an empty filtered set; top-level siblings
    /// deliberately do not.)
    pub fn execute(
        &mut self,
        host: &mut dyn Host,
        formula: &dyn FormulaEvaluator,
        rng: &mut SkillRng,
        caster: EntityId,
        level: i64,
        targets: &[EntityId],
    ) -> bool {
        let mut ctx = EffectContext::new(host, formula, rng, &mut self.cast_data, &mut self.pending);
        let mut worked = false;
        for component in &self.components {
            worked = component.execute(&mut ctx, caster, level, targets) || worked;
        }
        worked
    }

    /// Record (or overwrite) an activation for an entity.
    ///
    /// A non-positive duration keeps the activation alive until
    /// [`deactivate`] is called explicitly.
    ///
    /// [`deactivate`]: SkillEffect::deactivate
    pub fn activate(&mut self, host: &mut dyn Host, entity: EntityId, level: i64, duration_s: f64) {
        let expires_at_ms = if duration_s <= 0.0 {
            0
        } else {
            host.now_ms() + (duration_s * 1000.0) as u64
        };
        debug!(skill = self.skill.as_str(), entity = %entity, level, expires_at_ms, "activating");
        self.active.insert(entity, ActiveInstance { level, expires_at_ms });
    }

    /// Whether the skill is currently active for an entity.
    ///
    /// An expired record is deactivated as a side effect before `false`
    /// is returned, so cleanup needs no background sweep.
    pub fn is_active(&mut self, host: &mut dyn Host, entity: EntityId) -> bool {
        let Some(instance) = self.active.get(&entity) else {
            return false;
        };
        if instance.expires_at_ms != 0 && host.now_ms() >= instance.expires_at_ms {
            self.deactivate(host, entity);
            return false;
        }
        true
    }

    /// Remove an entity's activation, release entity-scoped component
    /// resources, and cancel the entity's outstanding deferred work.
    /// No-op for an entity that was never activated.
    pub fn deactivate(&mut self, host: &mut dyn Host, entity: EntityId) {
        if self.active.remove(&entity).is_none() {
            return;
        }
        debug!(skill = self.skill.as_str(), entity = %entity, "deactivating");

        for component in &self.components {
            component.clean_up(host, &mut self.pending, entity);
        }
        // Continuations scheduled by already-consumed tasks are not
        // reachable from the tree; cancel whatever is left directly.
        for task in self.pending.drain(&self.skill, entity) {
            host.cancel(task);
        }
        self.cast_data.clear(entity);
    }

    /// The level an entity is activated at, or [`INACTIVE_LEVEL`].
    #[must_use]
    pub fn active_level(&self, entity: EntityId) -> i64 {
        self.active
            .get(&entity)
            .map_or(INACTIVE_LEVEL, |instance| instance.level)
    }

    /// Number of entities with an activation record.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Per-entity scratch map shared across components within one
    /// [`execute`] invocation.
    ///
    /// [`execute`]: SkillEffect::execute
    pub fn cast_data(&mut self, entity: EntityId) -> &mut CastData {
        self.cast_data.entry(entity)
    }

    /// Drop an entity's scratch values. Call between unrelated casts so
    /// state does not leak from one cast into the next.
    pub fn clear_cast_data(&mut self, entity: EntityId) {
        self.cast_data.clear(entity);
    }

    /// Run a deferred continuation scheduled during an earlier
    /// execution.
    ///
    /// The host calls this when a scheduled task comes due. The caster
    /// must still be live and the skill still active for them; targets
    /// that died during the delay are dropped.
    pub fn run_scheduled(
        &mut self,
        host: &mut dyn Host,
        formula: &dyn FormulaEvaluator,
        rng: &mut SkillRng,
        task: ScheduledTask,
    ) -> bool {
        if task.skill != self.skill {
            warn!(
                skill = self.skill.as_str(),
                task_skill = task.skill.as_str(),
                "scheduled task routed to the wrong skill"
            );
            return false;
        }
        if !host.is_alive(task.caster) {
            return false;
        }
        if !self.is_active(host, task.caster) {
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

        let mut ctx = EffectContext::new(host, formula, rng, &mut self.cast_data, &mut self.pending);
        let mut worked = false;
        for component in &task.components {
            worked = component.execute(&mut ctx, task.caster, task.level, &live) || worked;
        }
        worked
    }

    /// Bundle this skill's scratch stores with the given collaborators
    /// into an execution context.
    pub(crate) fn context<'a>(
        &'a mut self,
        host: &'a mut dyn Host,
        formula: &'a dyn FormulaEvaluator,
        rng: &'a mut SkillRng,
    ) -> EffectContext<'a> {
        EffectContext::new(host, formula, rng, &mut self.cast_data, &mut self.pending)
    }
}
