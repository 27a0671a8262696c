//! Effect component trees.
//!
//! A skill is declared as a forest of composable components: conditions
//! gate, targets resolve, mechanics act, triggers arm. Components are
//! built once when a skill definition loads and are stateless during
//! execution — per-entity state lives in external stores keyed by the
//! owning skill and entity, never on the node.
//!
//! ## Execution semantics
//!
//! - **Condition**: filters the incoming targets by its predicate. An
//!   empty filtered set fails immediately without recursing. With
//!   children, the node succeeds iff at least one child succeeds against
//!   the filtered set.
//! - **Target/Filter**: resolves or narrows the candidate set, then
//!   passes through like a condition.
//! - **Mechanic**: applies one concrete effect per target; succeeds iff
//!   at least one application succeeded.
//! - **Trigger/Cost/Cooldown**: declarative metadata. `execute` is a
//!   no-op returning `true`; their data is read by the executor and by
//!   trigger-handler construction.
//!
//! A fault inside one node is caught at the node boundary, logged, and
//! treated as `false` for that node only; sibling nodes still run.

pub mod condition;
pub mod mechanic;
pub mod registry;
pub mod settings;
pub mod target;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::{EntityId, FormulaEvaluator, Host, SkillRng, TaskId};
use crate::error::ExecError;
use crate::triggers::TriggerKind;

pub use condition::ConditionKind;
pub use mechanic::MechanicKind;
pub use registry::ComponentRegistry;
pub use settings::Settings;
pub use target::{FilterKind, TargetKind};

/// Working list of targets during one tree traversal.
///
/// Most casts touch a handful of entities; SmallVec keeps the common
/// case off the heap.
pub type TargetList = SmallVec<[EntityId; 4]>;

/// Role of a node in an effect tree. Classification only — it does not
/// constrain tree shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Condition,
    Mechanic,
    Target,
    Filter,
    Trigger,
    Cost,
    Cooldown,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Condition => "condition",
            Self::Mechanic => "mechanic",
            Self::Target => "target",
            Self::Filter => "filter",
            Self::Trigger => "trigger",
            Self::Cost => "cost",
            Self::Cooldown => "cooldown",
        };
        write!(f, "{}", name)
    }
}

/// Concrete behavior of a node, one closed set per component family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    Condition(ConditionKind),
    Mechanic(MechanicKind),
    Target(TargetKind),
    Filter(FilterKind),
    Trigger(TriggerKind),
    Cost,
    Cooldown,
}

impl ComponentKind {
    /// The component family this kind belongs to.
    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Condition(_) => ComponentType::Condition,
            Self::Mechanic(_) => ComponentType::Mechanic,
            Self::Target(_) => ComponentType::Target,
            Self::Filter(_) => ComponentType::Filter,
            Self::Trigger(_) => ComponentType::Trigger,
            Self::Cost => ComponentType::Cost,
            Self::Cooldown => ComponentType::Cooldown,
        }
    }
}

/// Per-entity scratch values shared across components within one
/// execution.
pub type CastData = FxHashMap<String, f64>;

/// Store of cast data keyed by entity.
///
/// Owned by the store that drives execution (a `SkillEffect` for direct
/// casts, the `TriggerManager` for event-driven ones) rather than a
/// process global, so it can be torn down with its owner.
#[derive(Clone, Debug, Default)]
pub struct CastDataStore {
    data: FxHashMap<EntityId, CastData>,
}

impl CastDataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the scratch map for an entity.
    pub fn entry(&mut self, entity: EntityId) -> &mut CastData {
        self.data.entry(entity).or_default()
    }

    /// Get the scratch map for an entity, if any values were stored.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&CastData> {
        self.data.get(&entity)
    }

    /// Drop an entity's scratch values.
    pub fn clear(&mut self, entity: EntityId) {
        self.data.remove(&entity);
    }

    /// Drop everything.
    pub fn clear_all(&mut self) {
        self.data.clear();
    }
}

/// Outstanding scheduled-continuation handles, keyed by owning skill and
/// entity. Deactivating a skill for an entity drains and cancels its
/// tasks.
#[derive(Clone, Debug, Default)]
pub struct PendingTasks {
    tasks: FxHashMap<(String, EntityId), Vec<TaskId>>,
}

impl PendingTasks {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a handle for later cancellation.
    pub fn push(&mut self, skill: &str, entity: EntityId, task: TaskId) {
        self.tasks
            .entry((skill.to_string(), entity))
            .or_default()
            .push(task);
    }

    /// Remove and return all handles for a skill/entity pair.
    pub fn drain(&mut self, skill: &str, entity: EntityId) -> Vec<TaskId> {
        self.tasks
            .remove(&(skill.to_string(), entity))
            .unwrap_or_default()
    }

    /// Remove and return every recorded handle.
    pub fn drain_all(&mut self) -> Vec<TaskId> {
        self.tasks.drain().flat_map(|(_, ids)| ids).collect()
    }

    /// Total number of outstanding handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    /// Check if no handles are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Everything a component needs while executing: the host platform, the
/// formula evaluator, the RNG, and the owning store's scratch state.
pub struct EffectContext<'a> {
    /// Host platform collaborator.
    pub host: &'a mut dyn Host,
    /// External formula evaluator.
    pub formula: &'a dyn FormulaEvaluator,
    /// RNG for chance rolls.
    pub rng: &'a mut SkillRng,
    /// Per-entity scratch values for this execution.
    pub cast_data: &'a mut CastDataStore,
    /// Ledger of scheduled continuations for cancellation.
    pub pending: &'a mut PendingTasks,
}

impl<'a> EffectContext<'a> {
    /// Bundle the collaborators for one execution.
    pub fn new(
        host: &'a mut dyn Host,
        formula: &'a dyn FormulaEvaluator,
        rng: &'a mut SkillRng,
        cast_data: &'a mut CastDataStore,
        pending: &'a mut PendingTasks,
    ) -> Self {
        Self {
            host,
            formula,
            rng,
            cast_data,
            pending,
        }
    }
}

/// One node of an effect tree.
///
/// Owns its children exclusively; the tree is acyclic by construction
/// because children are only appended bottom-up during loading, never
/// re-parented.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectComponent {
    key: String,
    kind: ComponentKind,
    settings: Settings,
    children: Vec<EffectComponent>,
    skill: Option<String>,
}

impl EffectComponent {
    /// Create a node with empty settings and no children.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            key: key.into(),
            kind,
            settings: Settings::new(),
            children: Vec::new(),
            skill: None,
        }
    }

    /// Replace the settings bag (builder pattern).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a child (builder pattern).
    #[must_use]
    pub fn with_child(mut self, child: EffectComponent) -> Self {
        self.add_child(child);
        self
    }

    /// The declared type key this node was created from.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node's concrete behavior.
    #[must_use]
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The node's component family.
    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// The node's settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings access, for loaders filling a freshly created
    /// node.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: EffectComponent) {
        self.children.push(child);
    }

    /// Copy of the child list.
    #[must_use]
    pub fn children(&self) -> Vec<EffectComponent> {
        self.children.clone()
    }

    /// Whether this node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Id of the owning skill, once attached.
    #[must_use]
    pub fn skill(&self) -> Option<&str> {
        self.skill.as_deref()
    }

    /// Attach the owning skill id, recursively. Called exactly once, by
    /// the owning `SkillEffect`, when the root is added.
    pub(crate) fn set_skill(&mut self, skill: &str) {
        self.skill = Some(skill.to_string());
        for child in &mut self.children {
            child.set_skill(skill);
        }
    }

    /// Execute this node against a target list.
    ///
    /// Never fails: any internal fault is logged and becomes `false` for
    /// this node only.
    pub fn execute(
        &self,
        ctx: &mut EffectContext,
        caster: EntityId,
        level: i64,
        targets: &[EntityId],
    ) -> bool {
        match self.run(ctx, caster, level, targets) {
            Ok(worked) => worked,
            Err(err) => {
                warn!(
                    component = self.key.as_str(),
                    error = %err,
                    "component fault, treating node as failed"
                );
                false
            }
        }
    }

    fn run(
        &self,
        ctx: &mut EffectContext,
        caster: EntityId,
        level: i64,
        targets: &[EntityId],
    ) -> Result<bool, ExecError> {
        match &self.kind {
            ComponentKind::Condition(condition) => {
                let mut passed = TargetList::new();
                for &target in targets {
                    if condition.test(ctx, &self.settings, caster, level, target) {
                        passed.push(target);
                    }
                }
                if passed.is_empty() {
                    return Ok(false);
                }
                if self.children.is_empty() {
                    return Ok(true);
                }
                Ok(self.execute_children(ctx, caster, level, &passed))
            }

            ComponentKind::Target(target_kind) => {
                let resolved = target_kind.resolve(ctx, &self.settings, caster, level, targets);
                self.pass_through(ctx, caster, level, resolved)
            }

            ComponentKind::Filter(filter) => {
                let narrowed = filter.narrow(ctx, &self.settings, caster, targets);
                self.pass_through(ctx, caster, level, narrowed)
            }

            ComponentKind::Mechanic(mechanic) => {
                let mut worked = false;
                for &target in targets {
                    match mechanic.apply(ctx, self, caster, level, target) {
                        Ok(applied) => worked = applied || worked,
                        Err(err) => {
                            warn!(
                                component = self.key.as_str(),
                                target = %target,
                                error = %err,
                                "mechanic application failed"
                            );
                        }
                    }
                }
                Ok(worked)
            }

            // Declarative metadata; read elsewhere, inert here.
            ComponentKind::Trigger(_) | ComponentKind::Cost | ComponentKind::Cooldown => Ok(true),
        }
    }

    fn pass_through(
        &self,
        ctx: &mut EffectContext,
        caster: EntityId,
        level: i64,
        resolved: TargetList,
    ) -> Result<bool, ExecError> {
        if resolved.is_empty() {
            return Ok(false);
        }
        if self.children.is_empty() {
            return Ok(true);
        }
        Ok(self.execute_children(ctx, caster, level, &resolved))
    }

    /// Execute every child against `targets`, returning whether at least
    /// one succeeded. All children run; there is no short-circuit.
    pub(crate) fn execute_children(
        &self,
        ctx: &mut EffectContext,
        caster: EntityId,
        level: i64,
        targets: &[EntityId],
    ) -> bool {
        let mut worked = false;
        for child in &self.children {
            worked = child.execute(ctx, caster, level, targets) || worked;
        }
        worked
    }

    /// Release entity-scoped resources held for this subtree.
    ///
    /// Nodes that scheduled deferred work cancel their outstanding
    /// handles; every node recurses into its own children.
    pub fn clean_up(&self, host: &mut dyn Host, pending: &mut PendingTasks, entity: EntityId) {
        if matches!(self.kind, ComponentKind::Mechanic(MechanicKind::Delay)) {
            if let Some(skill) = self.skill.as_deref() {
                for task in pending.drain(skill, entity) {
                    host.cancel(task);
                }
            }
        }
        for child in &self.children {
            child.clean_up(host, pending, entity);
        }
    }
}
