//! The build engine.
//!
//! Folds over the dependencies-first key order, expanding references in
//! each specification into already-built values and handing the result to
//! a construction function.

use std::any::Any;

use indexmap::IndexMap;
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::ComponentKey;

use crate::configuration::Configuration;
use crate::order::{dependent_keys, select_keys};
use crate::resolver::expand_references;
use crate::value::Value;

/// The built values of one build, keyed by component.
///
/// Entries appear in construction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSystem {
    components: IndexMap<ComponentKey, Value>,
}

impl BuiltSystem {
    /// Returns the built value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.components.get(key)
    }

    /// Returns the built instance of `key` downcast to `T`.
    #[must_use]
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(Value::downcast_ref::<T>)
    }

    /// Whether `key` was built.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }

    /// Built keys in construction order.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.components.keys()
    }

    /// Built entries in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, &Value)> {
        self.components.iter()
    }

    /// Number of built components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether nothing was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn assoc(&mut self, key: ComponentKey, value: Value) {
        let _ = self.components.insert(key, value);
    }
}

impl<K, V> FromIterator<(K, V)> for BuiltSystem
where
    K: Into<ComponentKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            components: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builds `keys` and everything they depend on.
///
/// `construct` is called once per key in the closure, dependencies first,
/// with the key's specification after reference expansion. Keys outside
/// the closure are never inspected.
///
/// # Errors
///
/// Returns an ordering error (unknown key, unresolvable reference, cycle)
/// before any construction runs, or the first error from `construct`. No
/// partial system is returned on failure.
pub fn build<F>(
    config: &Configuration,
    keys: &[ComponentKey],
    mut construct: F,
) -> Result<BuiltSystem>
where
    F: FnMut(&ComponentKey, Value) -> Result<Value>,
{
    let order = dependent_keys(config, keys)?;
    let relevant = select_keys(config, &order);
    tracing::info!(requested = keys.len(), components = order.len(), "building system");

    let system = relevant
        .iter()
        .try_fold(BuiltSystem::default(), |mut system, (key, spec)| {
            let expanded = expand_references(key, spec, &system)?;
            tracing::debug!(key = %key, kind = expanded.kind(), "constructing component");
            let built = construct(key, expanded)?;
            system.assoc(key.clone(), built);
            debug_assert!(system.contains_key(key.as_str()));
            Ok::<_, RiggingError>(system)
        })?;

    tracing::info!(components = system.len(), "system built");
    Ok(system)
}
