//! Error taxonomy.
//!
//! Nothing in this crate is fatal to the host process. Configuration
//! faults are resolved through typed defaults inside [`Settings`] and are
//! never surfaced. Execution and platform faults are confined to the
//! component that raised them: the node's result becomes `false`, a
//! warning is logged, and sibling nodes continue to run.
//!
//! [`Settings`]: crate::components::Settings

use thiserror::Error;

use crate::core::EntityId;

/// Failure inside a host platform primitive.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlatformError {
    /// The entity is no longer present in the world.
    #[error("entity {0} is not present")]
    MissingEntity(EntityId),

    /// The host refused or failed the operation.
    #[error("host operation failed: {0}")]
    Host(String),
}

/// Failure while parsing or evaluating a formula expression.
///
/// Produced by [`FormulaEvaluator`] implementations; the evaluator itself
/// lives outside this crate.
///
/// [`FormulaEvaluator`]: crate::core::FormulaEvaluator
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormulaError {
    /// The expression could not be parsed.
    #[error("malformed expression `{0}`")]
    Parse(String),

    /// The expression referenced a variable that was not bound.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// The expression evaluated to NaN or infinity.
    #[error("expression `{0}` did not evaluate to a finite number")]
    NotFinite(String),
}

/// A fault inside one component's execution logic.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ExecError {
    /// A host primitive failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A formula could not be evaluated.
    #[error(transparent)]
    Formula(#[from] FormulaError),
}
