//! Armed trigger handlers.

use crate::components::{EffectComponent, EffectContext, Settings};
use crate::core::EntityId;

use super::trigger::TriggerKind;

/// Immutable binding of a skill, a trigger classifier, the trigger's
/// own settings, the root component to run on fire, and an arming
/// duration.
///
/// One handler is created per declared trigger block when a skill
/// definition loads; the same handler is then armed for any number of
/// entities through the [`TriggerManager`]. Anything per-entity
/// (expiry, cooldown timestamps) lives on the manager's armed entry,
/// never here.
///
/// [`TriggerManager`]: super::TriggerManager
#[derive(Clone, Debug)]
pub struct TriggerHandler {
    skill: String,
    trigger: TriggerKind,
    settings: Settings,
    component: EffectComponent,
    duration_s: f64,
}

impl TriggerHandler {
    /// Bind a trigger block. The root component's payload is its
    /// children; the root itself is the declarative trigger node.
    #[must_use]
    pub fn new(
        skill: impl Into<String>,
        trigger: TriggerKind,
        settings: Settings,
        mut component: EffectComponent,
        duration_s: f64,
    ) -> Self {
        let skill = skill.into();
        component.set_skill(&skill);
        Self {
            skill,
            trigger,
            settings,
            component,
            duration_s,
        }
    }

    /// Id of the owning skill.
    #[must_use]
    pub fn skill(&self) -> &str {
        &self.skill
    }

    /// The bound classifier.
    #[must_use]
    pub fn trigger(&self) -> TriggerKind {
        self.trigger
    }

    /// The trigger block's own settings (chance, cooldown, target, and
    /// kind-specific filters).
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The bound root component.
    #[must_use]
    pub fn component(&self) -> &EffectComponent {
        &self.component
    }

    /// Arming duration in seconds; `0` arms until explicitly disarmed.
    #[must_use]
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Run the bound payload synchronously against one target.
    ///
    /// This is the synthetic `CAST` path ("fire right away") and the
    /// shared firing primitive the manager uses when a platform event
    /// matches.
    pub fn handle_immediate(
        &self,
        ctx: &mut EffectContext,
        caster: EntityId,
        level: i64,
        target: EntityId,
    ) -> bool {
        self.component.execute_children(ctx, caster, level, &[target])
    }
}
