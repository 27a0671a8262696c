//! Core infrastructure: entity ids, the host platform contract, the
//! formula evaluator contract, and deterministic RNG.

pub mod entity;
pub mod formula;
pub mod host;
pub mod rng;

pub use entity::EntityId;
pub use formula::{level_scaled, FormulaEvaluator, LEVEL_VAR};
pub use host::{Host, ScheduledTask, TaskId};
pub use rng::SkillRng;
