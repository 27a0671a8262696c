//! Cast-time orchestrator.
//!
//! A cast request is the seam between the skill data model (levels,
//! gating, out of scope here) and the execution engine. The executor
//! splits a skill's top-level forest by role: non-trigger components
//! run immediately against the caster, the synthetic `CAST` trigger
//! fires its payload right away, and every other trigger block is
//! wrapped into a handler and armed through the [`TriggerManager`] for
//! the skill's duration.

use tracing::debug;

use crate::components::{ComponentKind, ComponentType};
use crate::core::{EntityId, FormulaEvaluator, Host, SkillRng};
use crate::skill::SkillEffect;
use crate::triggers::{TriggerHandler, TriggerKind, TriggerManager};

/// Executes cast requests against skill effects.
pub struct EffectExecutor;

impl EffectExecutor {
    /// Cast a skill for an entity.
    ///
    /// Direct components execute against the caster at once; trigger
    /// components are armed for `duration_s` (the skill itself is
    /// activated alongside them so deferred work can re-validate
    /// against it). Returns `true` iff anything ran successfully or at
    /// least one trigger was armed.
    pub fn cast(
        skill: &mut SkillEffect,
        manager: &mut TriggerManager,
        host: &mut dyn Host,
        formula: &dyn FormulaEvaluator,
        rng: &mut SkillRng,
        caster: EntityId,
        level: i64,
        duration_s: f64,
    ) -> bool {
        let skill_id = skill.skill().to_string();
        let components = skill.components().to_vec();

        let mut to_arm = Vec::new();
        let mut worked = false;
        {
            let mut ctx = skill.context(host, formula, rng);
            for component in &components {
                match component.kind() {
                    ComponentKind::Trigger(TriggerKind::Cast) => {
                        let handler = TriggerHandler::new(
                            skill_id.as_str(),
                            TriggerKind::Cast,
                            component.settings().clone(),
                            component.clone(),
                            duration_s,
                        );
                        worked = handler.handle_immediate(&mut ctx, caster, level, caster) || worked;
                    }
                    ComponentKind::Trigger(kind) => {
                        to_arm.push(TriggerHandler::new(
                            skill_id.as_str(),
                            *kind,
                            component.settings().clone(),
                            component.clone(),
                            duration_s,
                        ));
                    }
                    _ => {
                        worked = component.execute(&mut ctx, caster, level, &[caster]) || worked;
                    }
                }
            }
        }

        if !to_arm.is_empty() {
            debug!(skill = skill_id.as_str(), caster = %caster, armed = to_arm.len(), "deferred cast");
            skill.activate(host, caster, level, duration_s);
            manager.activate_skill(host, &skill_id, caster, level, duration_s, to_arm);
            worked = true;
        }

        worked
    }

    /// Mana cost declared by the skill's first `Cost` component, or `0`.
    #[must_use]
    pub fn mana_cost(skill: &SkillEffect, formula: &dyn FormulaEvaluator, level: i64) -> f64 {
        Self::declared(skill, ComponentType::Cost, "cost", formula, level)
    }

    /// Cooldown in seconds declared by the skill's first `Cooldown`
    /// component, or `0`.
    #[must_use]
    pub fn cooldown(skill: &SkillEffect, formula: &dyn FormulaEvaluator, level: i64) -> f64 {
        Self::declared(skill, ComponentType::Cooldown, "cooldown", formula, level)
    }

    fn declared(
        skill: &SkillEffect,
        family: ComponentType,
        key: &str,
        formula: &dyn FormulaEvaluator,
        level: i64,
    ) -> f64 {
        skill
            .components()
            .iter()
            .find(|component| component.component_type() == family)
            .map_or(0.0, |component| {
                component.settings().attr(formula, key, level, 0.0)
            })
    }
}
