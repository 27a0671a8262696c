//! Component registry for type-keyed instantiation.
//!
//! The loader resolves declared type strings through four independent
//! key tables (condition, mechanic, target/filter, trigger). Lookups
//! return `None` for blank or unknown keys instead of failing, so a
//! loader can skip an invalid declaration with a warning and keep the
//! rest of the skill. The registry is populated once at startup via
//! [`ComponentRegistry::with_defaults`] and treated as immutable after.

use rustc_hash::FxHashMap;

use crate::triggers::TriggerKind;

use super::condition::ConditionKind;
use super::mechanic::MechanicKind;
use super::target::{FilterKind, TargetKind};
use super::{ComponentKind, EffectComponent};

/// Registry of component factories, one table per family.
///
/// ## Example
///
/// ```
/// use skillcast::components::ComponentRegistry;
///
/// let registry = ComponentRegistry::with_defaults();
///
/// let damage = registry.new_mechanic("damage").unwrap();
/// assert_eq!(damage.key(), "damage");
///
/// assert!(registry.new_condition("no-such-condition").is_none());
/// assert!(registry.new_condition("").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    conditions: FxHashMap<String, ConditionKind>,
    mechanics: FxHashMap<String, MechanicKind>,
    targets: FxHashMap<String, ComponentKind>,
    triggers: FxHashMap<String, TriggerKind>,
}

fn normalize(key: &str) -> String {
    key.trim().replace('-', "_").to_ascii_lowercase()
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in kind registered under its
    /// canonical key.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_condition("chance", ConditionKind::Chance);
        registry.register_condition("health", ConditionKind::Health);
        registry.register_condition("mana", ConditionKind::Mana);
        registry.register_condition("fire", ConditionKind::Fire);
        registry.register_condition("water", ConditionKind::Water);
        registry.register_condition("elevation", ConditionKind::Elevation);
        registry.register_condition("biome", ConditionKind::Biome);
        registry.register_condition("time", ConditionKind::Time);
        registry.register_condition("name", ConditionKind::Name);

        registry.register_mechanic("damage", MechanicKind::Damage);
        registry.register_mechanic("heal", MechanicKind::Heal);
        registry.register_mechanic("push", MechanicKind::Push);
        registry.register_mechanic("fire", MechanicKind::Fire);
        registry.register_mechanic("potion", MechanicKind::Potion);
        registry.register_mechanic("message", MechanicKind::Message);
        registry.register_mechanic("particle", MechanicKind::Particle);
        registry.register_mechanic("sound", MechanicKind::Sound);
        registry.register_mechanic("command", MechanicKind::Command);
        registry.register_mechanic("explosion", MechanicKind::Explosion);
        registry.register_mechanic("speed", MechanicKind::Speed);
        registry.register_mechanic("cleanse", MechanicKind::Cleanse);
        registry.register_mechanic("delay", MechanicKind::Delay);
        registry.register_mechanic("launch", MechanicKind::Launch);
        registry.register_mechanic("lightning", MechanicKind::Lightning);

        registry.register_target("self", ComponentKind::Target(TargetKind::Self_));
        registry.register_target("nearest", ComponentKind::Target(TargetKind::Nearest));
        registry.register_target("area", ComponentKind::Target(TargetKind::Area));
        registry.register_target("allies", ComponentKind::Filter(FilterKind::Allies));
        registry.register_target("enemies", ComponentKind::Filter(FilterKind::Enemies));
        registry.register_target("alive", ComponentKind::Filter(FilterKind::Alive));

        for trigger in TriggerKind::ALL {
            registry.register_trigger(trigger.key(), trigger);
        }

        registry
    }

    /// Register a condition under a key, replacing any previous entry.
    pub fn register_condition(&mut self, key: &str, kind: ConditionKind) {
        self.conditions.insert(normalize(key), kind);
    }

    /// Register a mechanic under a key, replacing any previous entry.
    pub fn register_mechanic(&mut self, key: &str, kind: MechanicKind) {
        self.mechanics.insert(normalize(key), kind);
    }

    /// Register a target or filter under a key, replacing any previous
    /// entry. The two families share one table.
    pub fn register_target(&mut self, key: &str, kind: ComponentKind) {
        debug_assert!(matches!(
            kind,
            ComponentKind::Target(_) | ComponentKind::Filter(_)
        ));
        self.targets.insert(normalize(key), kind);
    }

    /// Register a trigger under a key, replacing any previous entry.
    pub fn register_trigger(&mut self, key: &str, kind: TriggerKind) {
        self.triggers.insert(normalize(key), kind);
    }

    /// Instantiate a condition component, or `None` for a blank or
    /// unknown key.
    #[must_use]
    pub fn new_condition(&self, key: &str) -> Option<EffectComponent> {
        let key = normalize(key);
        let kind = *self.conditions.get(&key)?;
        Some(EffectComponent::new(key, ComponentKind::Condition(kind)))
    }

    /// Instantiate a mechanic component, or `None` for a blank or
    /// unknown key.
    #[must_use]
    pub fn new_mechanic(&self, key: &str) -> Option<EffectComponent> {
        let key = normalize(key);
        let kind = *self.mechanics.get(&key)?;
        Some(EffectComponent::new(key, ComponentKind::Mechanic(kind)))
    }

    /// Instantiate a target or filter component, or `None` for a blank
    /// or unknown key.
    #[must_use]
    pub fn new_target(&self, key: &str) -> Option<EffectComponent> {
        let key = normalize(key);
        let kind = self.targets.get(&key)?.clone();
        Some(EffectComponent::new(key, kind))
    }

    /// Instantiate a trigger component, or `None` for a blank or
    /// unknown key. The component key is the trigger's canonical
    /// uppercase identifier.
    #[must_use]
    pub fn new_trigger(&self, key: &str) -> Option<EffectComponent> {
        let kind = self.trigger_kind(key)?;
        Some(EffectComponent::new(
            kind.key(),
            ComponentKind::Trigger(kind),
        ))
    }

    /// Look up a trigger kind without instantiating a component.
    #[must_use]
    pub fn trigger_kind(&self, key: &str) -> Option<TriggerKind> {
        self.triggers.get(&normalize(key)).copied()
    }

    /// Check whether a condition key is registered.
    #[must_use]
    pub fn has_condition(&self, key: &str) -> bool {
        self.conditions.contains_key(&normalize(key))
    }

    /// Check whether a mechanic key is registered.
    #[must_use]
    pub fn has_mechanic(&self, key: &str) -> bool {
        self.mechanics.contains_key(&normalize(key))
    }

    /// Check whether a target or filter key is registered.
    #[must_use]
    pub fn has_target(&self, key: &str) -> bool {
        self.targets.contains_key(&normalize(key))
    }

    /// Check whether a trigger key is registered.
    #[must_use]
    pub fn has_trigger(&self, key: &str) -> bool {
        self.triggers.contains_key(&normalize(key))
    }
}
