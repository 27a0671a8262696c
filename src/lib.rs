//! # skillcast
//!
//! A data-driven skill-effect engine for multiplayer game servers.
//!
//! Designers declare skills as trees of composable effect components
//! (conditions, mechanics, target selectors, triggers) in
//! configuration; this crate executes an already-built tree against
//! live game entities at cast time or in response to gameplay events.
//!
//! ## Design Principles
//!
//! 1. **Platform-Agnostic**: Everything concrete — entity liveness,
//!    damage primitives, world queries, the task scheduler — is reached
//!    through the [`Host`] trait the embedding server implements.
//!
//! 2. **Stateless Trees**: Components are built once at load time and
//!    carry no per-entity state. Activation records, cast-data scratch
//!    values, and deferred-work handles live in external stores keyed
//!    by entity.
//!
//! 3. **Nothing Is Fatal**: A fault inside one component degrades that
//!    node to `false` and is logged; siblings, other skills, and the
//!    host process are unaffected.
//!
//! ## Execution Semantics
//!
//! Conditions AND-short-circuit on an empty filtered target set but OR
//! across their children; a skill's top-level components always all run
//! and OR their results. The asymmetry is deliberate and pinned by
//! tests.
//!
//! ## Modules
//!
//! - `core`: Entity ids, host-platform contract, formula contract, RNG
//! - `components`: Settings, the effect-component tree, kind catalogs,
//!   registry
//! - `skill`: `SkillEffect` aggregate (activation lifecycle, cast data)
//! - `triggers`: Event shapes, classifiers, handlers, trigger manager
//! - `executor`: Cast-time orchestrator
//! - `error`: Error taxonomy

pub mod components;
pub mod core;
pub mod error;
pub mod executor;
pub mod skill;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{EntityId, FormulaEvaluator, Host, ScheduledTask, SkillRng, TaskId};

pub use crate::components::{
    CastData, CastDataStore, ComponentKind, ComponentRegistry, ComponentType, ConditionKind,
    EffectComponent, EffectContext, FilterKind, MechanicKind, PendingTasks, Settings, TargetKind,
    TargetList,
};

pub use crate::error::{ExecError, FormulaError, PlatformError};

pub use crate::executor::EffectExecutor;

pub use crate::skill::{ActiveInstance, SkillEffect, INACTIVE_LEVEL};

pub use crate::triggers::{GameEvent, TriggerHandler, TriggerKind, TriggerManager};
