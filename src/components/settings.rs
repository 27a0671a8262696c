//! Component settings.
//!
//! Every node in an effect tree carries a normalized key/value bag that
//! the loader fills from configuration. Keys treat hyphens and
//! underscores as the same character, so `min-value` and `min_value`
//! address one entry. Typed accessors never fail: a missing key or a
//! malformed value falls back to the caller's default, so one bad
//! setting degrades one value instead of aborting the component.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{FormulaEvaluator, LEVEL_VAR};

/// Normalized string key/value configuration bag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: FxHashMap<String, String>,
}

fn normalize(key: &str) -> String {
    key.replace('-', "_")
}

impl Settings {
    /// Create an empty settings bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a normalized key, replacing any previous one.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(normalize(key), value.into());
    }

    /// Store a value and return the bag (builder pattern).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    /// Get the raw string value for a key.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(String::as_str)
    }

    /// Get a string value, or the default when missing.
    #[must_use]
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or(default).to_string()
    }

    /// Get an integer value, or the default on missing key or parse
    /// failure.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.raw(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a floating-point value, or the default on missing key or
    /// parse failure.
    #[must_use]
    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.raw(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a boolean value, or the default on missing key or parse
    /// failure. Accepts `true`/`false` in any case.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.raw(key).map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("true") => true,
            Some(raw) if raw.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    /// Resolve a level-scaling attribute.
    ///
    /// Looks for the `<key>_base`/`<key>_scale` pair first and computes
    /// `eval(base) + (level - 1) * eval(scale)`; otherwise treats a bare
    /// `<key>` entry as a raw expression. `Lv` is bound to `level` in
    /// every evaluation. Evaluation failure degrades to the default.
    #[must_use]
    pub fn attr(
        &self,
        formula: &dyn FormulaEvaluator,
        key: &str,
        level: i64,
        default: f64,
    ) -> f64 {
        let key = normalize(key);
        let vars = [(LEVEL_VAR, level as f64)];

        let result = if let Some(base) = self.raw(&format!("{key}_base")) {
            let scale = self.raw(&format!("{key}_scale"));
            crate::core::level_scaled(formula, base, scale, level)
        } else if let Some(expr) = self.raw(&key) {
            formula.evaluate(expr, &vars)
        } else {
            return default;
        };

        match result {
            Ok(value) => value,
            Err(err) => {
                debug!(attribute = %key, error = %err, "attribute formula failed, using default");
                default
            }
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use proptest::prelude::*;

    fn plain(expr: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        let trimmed = expr.trim();
        if let Ok(value) = trimmed.parse() {
            return Ok(value);
        }
        vars.iter()
            .find(|(name, _)| *name == trimmed)
            .map(|(_, value)| *value)
            .ok_or_else(|| FormulaError::Parse(expr.to_string()))
    }

    #[test]
    fn test_hyphen_underscore_equivalence() {
        let mut settings = Settings::new();
        settings.set("min-value", "3");

        assert!(settings.has("min_value"));
        assert!(settings.has("min-value"));
        assert_eq!(settings.get_int("min_value", 0), 3);

        settings.set("min_value", "5");
        assert_eq!(settings.get_int("min-value", 0), 5);
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn test_typed_accessors_fall_back() {
        let settings = Settings::new()
            .with("count", "7")
            .with("ratio", "2.5")
            .with("enabled", "TRUE")
            .with("garbage", "not a number");

        assert_eq!(settings.get_int("count", 0), 7);
        assert_eq!(settings.get_double("ratio", 0.0), 2.5);
        assert!(settings.get_bool("enabled", false));
        assert_eq!(settings.get_int("garbage", 42), 42);
        assert_eq!(settings.get_double("garbage", 1.5), 1.5);
        assert!(settings.get_bool("garbage", true));
        assert_eq!(settings.get_int("missing", -1), -1);
        assert_eq!(settings.get_string("missing", "dflt"), "dflt");
    }

    #[test]
    fn test_attr_base_scale() {
        let settings = Settings::new()
            .with("value-base", "10")
            .with("value-scale", "2");

        assert_eq!(settings.attr(&plain, "value", 1, 0.0), 10.0);
        assert_eq!(settings.attr(&plain, "value", 3, 0.0), 14.0);
    }

    #[test]
    fn test_attr_raw_expression() {
        let settings = Settings::new().with("radius", "Lv");
        assert_eq!(settings.attr(&plain, "radius", 4, 0.0), 4.0);
    }

    #[test]
    fn test_attr_degrades_to_default() {
        let settings = Settings::new().with("value-base", "oops");
        assert_eq!(settings.attr(&plain, "value", 2, 9.0), 9.0);
        assert_eq!(Settings::new().attr(&plain, "value", 2, 9.0), 9.0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let settings = Settings::new().with("chance", "25").with("type", "start");
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }

    proptest! {
        #[test]
        fn accessors_never_fail(key in ".{0,24}", value in ".{0,24}") {
            let mut settings = Settings::new();
            settings.set(&key, value.clone());

            settings.get_string(&key, "d");
            settings.get_int(&key, 0);
            settings.get_double(&key, 0.0);
            settings.get_bool(&key, false);
            settings.attr(&plain, &key, 3, 1.0);
        }

        #[test]
        fn spelling_variants_agree(value in "[0-9]{1,6}") {
            let settings = Settings::new().with("max-targets", value.clone());
            prop_assert_eq!(
                settings.get_int("max-targets", -1),
                settings.get_int("max_targets", -1)
            );
        }
    }
}
