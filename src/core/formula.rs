//! Formula evaluator contract.
//!
//! Numeric settings may hold arbitrary level-scaling expressions
//! (`"10 + Lv*2"`). Parsing and evaluating those expressions is the job
//! of an external collaborator; this module only defines the call
//! contract the engine uses. Plain numeric strings are valid
//! zero-variable formulas, so the simplest conforming evaluator is a
//! `str::parse` wrapper.

use crate::error::FormulaError;

/// Name of the implicit skill-level variable bound on every evaluation.
pub const LEVEL_VAR: &str = "Lv";

/// Evaluates a formula expression with a set of bound variables.
///
/// Implemented for closures, so hosts can plug in whatever expression
/// engine they already ship:
///
/// ```
/// use skillcast::core::FormulaEvaluator;
/// use skillcast::error::FormulaError;
///
/// fn numbers_only(expr: &str, _vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
///     expr.trim()
///         .parse()
///         .map_err(|_| FormulaError::Parse(expr.to_string()))
/// }
///
/// let evaluator: &dyn FormulaEvaluator = &numbers_only;
/// assert_eq!(evaluator.evaluate("4.5", &[]).unwrap(), 4.5);
/// ```
pub trait FormulaEvaluator {
    /// Evaluate `expr` with `vars` bound, failing on malformed input.
    fn evaluate(&self, expr: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError>;
}

impl<F> FormulaEvaluator for F
where
    F: Fn(&str, &[(&str, f64)]) -> Result<f64, FormulaError>,
{
    fn evaluate(&self, expr: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        self(expr, vars)
    }
}

/// Resolve the `base`/`scale` level convention:
/// `eval(base) + (level - 1) * eval(scale)`, with `Lv` bound in both.
///
/// A missing scale contributes nothing.
pub fn level_scaled(
    formula: &dyn FormulaEvaluator,
    base: &str,
    scale: Option<&str>,
    level: i64,
) -> Result<f64, FormulaError> {
    let vars = [(LEVEL_VAR, level as f64)];
    let base = formula.evaluate(base, &vars)?;
    let scale = match scale {
        Some(expr) => formula.evaluate(expr, &vars)?,
        None => 0.0,
    };
    Ok(base + (level - 1) as f64 * scale)
}
