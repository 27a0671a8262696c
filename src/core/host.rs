//! Host platform contract.
//!
//! The engine runs against whatever game server embeds it. Everything
//! platform-specific — entity liveness, world queries, the concrete
//! damage/heal/particle primitives, and the task scheduler — is reached
//! through the `Host` trait. Query methods are infallible and answer
//! conservatively for unknown entities; effect primitives return a
//! `PlatformError` the component layer confines to the failing node.

use serde::{Deserialize, Serialize};

use crate::components::EffectComponent;
use crate::error::PlatformError;

use super::entity::EntityId;

/// Handle for a scheduled continuation, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a task ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// A deferred effect continuation handed to the host scheduler.
///
/// When the delay elapses, the host feeds the task back through
/// [`SkillEffect::run_scheduled`] (direct casts) or
/// [`TriggerManager::run_scheduled`] (event-driven casts), which
/// re-validate liveness and activation before running the stored
/// components.
///
/// [`SkillEffect::run_scheduled`]: crate::skill::SkillEffect::run_scheduled
/// [`TriggerManager::run_scheduled`]: crate::triggers::TriggerManager::run_scheduled
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Owning skill id, for activation re-validation and routing.
    pub skill: String,
    /// Entity the skill was cast by.
    pub caster: EntityId,
    /// Skill level at schedule time.
    pub level: i64,
    /// Targets captured at schedule time; dead ones are dropped on resume.
    pub targets: Vec<EntityId>,
    /// Components to execute when the task comes due.
    pub components: Vec<EffectComponent>,
}

/// The game-platform collaborator the engine executes against.
///
/// ## Implementation notes
///
/// - Queries must answer for any `EntityId`, returning `None`/`false`
///   for entities the platform no longer knows.
/// - Effect primitives run on the main simulation thread and should
///   fail with [`PlatformError`] rather than panic.
/// - `schedule` must retain the task until it comes due or `cancel` is
///   called with the returned id; cancelling a spent or unknown id is a
///   no-op.
pub trait Host {
    // === Time ===

    /// Current monotonic time in milliseconds.
    fn now_ms(&self) -> u64;

    /// World clock in ticks; a day is 24000 ticks, daytime is the first
    /// half.
    fn world_time(&self) -> u64;

    // === Entity queries ===

    /// Whether the entity is present and alive.
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Display name, if the entity has one.
    fn name(&self, entity: EntityId) -> Option<String>;

    /// Current health.
    fn health(&self, entity: EntityId) -> Option<f64>;

    /// Maximum health.
    fn max_health(&self, entity: EntityId) -> Option<f64>;

    /// Current mana, for platforms that track it.
    fn mana(&self, entity: EntityId) -> Option<f64>;

    /// Height of the entity's position above the world floor.
    fn elevation(&self, entity: EntityId) -> Option<f64>;

    /// Name of the biome at the entity's position.
    fn biome(&self, entity: EntityId) -> Option<String>;

    /// Whether the entity is currently on fire.
    fn is_burning(&self, entity: EntityId) -> bool;

    /// Whether the entity is currently in water.
    fn is_in_water(&self, entity: EntityId) -> bool;

    // === World queries ===

    /// Live entities within `radius` of `origin`, excluding `origin`.
    fn nearby(&self, origin: EntityId, radius: f64) -> Vec<EntityId>;

    /// Closest living hostile entity within `range` of `origin`.
    fn nearest_hostile(&self, origin: EntityId, range: f64) -> Option<EntityId>;

    /// Whether two entities are on the same side.
    fn are_allied(&self, a: EntityId, b: EntityId) -> bool;

    // === Effect primitives ===

    /// Deal `amount` damage to `target`, attributed to `source`.
    fn damage(
        &mut self,
        source: EntityId,
        target: EntityId,
        amount: f64,
    ) -> Result<(), PlatformError>;

    /// Restore `amount` health to `target`.
    fn heal(&mut self, target: EntityId, amount: f64) -> Result<(), PlatformError>;

    /// Knock `target` away from `source` at `speed`.
    fn push(
        &mut self,
        source: EntityId,
        target: EntityId,
        speed: f64,
    ) -> Result<(), PlatformError>;

    /// Set `target` on fire for the given duration.
    fn ignite(&mut self, target: EntityId, duration_ms: u64) -> Result<(), PlatformError>;

    /// Apply a named status effect at `tier` for the given duration.
    fn apply_potion(
        &mut self,
        target: EntityId,
        effect: &str,
        tier: i64,
        duration_ms: u64,
    ) -> Result<(), PlatformError>;

    /// Remove all status effects from `target`.
    fn cleanse(&mut self, target: EntityId) -> Result<(), PlatformError>;

    /// Send a chat message to `target`.
    fn message(&mut self, target: EntityId, text: &str) -> Result<(), PlatformError>;

    /// Play a named particle effect at `target`.
    fn particle(
        &mut self,
        target: EntityId,
        name: &str,
        count: i64,
    ) -> Result<(), PlatformError>;

    /// Play a named sound at `target`.
    fn sound(
        &mut self,
        target: EntityId,
        name: &str,
        volume: f64,
        pitch: f64,
    ) -> Result<(), PlatformError>;

    /// Run a server command with `target` bound as the subject.
    fn command(&mut self, target: EntityId, command: &str) -> Result<(), PlatformError>;

    /// Detonate an explosion of `power` at `target`.
    fn explode(&mut self, target: EntityId, power: f64) -> Result<(), PlatformError>;

    /// Scale `target`'s movement speed for the given duration.
    fn set_speed(
        &mut self,
        target: EntityId,
        multiplier: f64,
        duration_ms: u64,
    ) -> Result<(), PlatformError>;

    /// Launch a named projectile from `source` at `speed`.
    fn launch(
        &mut self,
        source: EntityId,
        projectile: &str,
        speed: f64,
    ) -> Result<(), PlatformError>;

    /// Strike lightning at `target`.
    fn lightning(&mut self, target: EntityId) -> Result<(), PlatformError>;

    // === Scheduling ===

    /// Schedule `task` to run after `delay_ms`, returning a cancellable
    /// handle.
    fn schedule(&mut self, delay_ms: u64, task: ScheduledTask) -> TaskId;

    /// Cancel a previously scheduled task. Unknown or spent ids are
    /// ignored.
    fn cancel(&mut self, task: TaskId);
}
