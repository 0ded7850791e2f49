//! The immutable key to specification mapping a system is built from.

use indexmap::IndexMap;
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::ComponentKey;

use crate::value::Value;
use crate::walk::find_references;

/// An insertion-ordered mapping from component key to specification.
///
/// Keys keep the order in which they were added. That order pins down
/// the dependency graph layout and therefore the build order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    entries: IndexMap<ComponentKey, Value>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configuration with `key` set to `value`.
    ///
    /// Setting an existing key replaces its value in place.
    #[must_use]
    pub fn with(mut self, key: impl Into<ComponentKey>, value: impl Into<Value>) -> Self {
        let _ = self.entries.insert(key.into(), value.into());
        self
    }

    /// Builds a configuration from a top-level mapping value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a mapping.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(fields) => Ok(fields.into_iter().collect()),
            other => Err(RiggingError::Config {
                message: format!(
                    "top-level configuration must be a mapping, found {}",
                    other.kind()
                ),
            }),
        }
    }

    /// Returns the specification for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentKey, &Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every reference anywhere in the configuration names a
    /// defined key.
    ///
    /// Builds only check the keys they touch. This check covers the whole
    /// configuration, orphan entries included.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::UnresolvableReference`] for the first
    /// reference to an undefined key.
    pub fn validate_references(&self) -> Result<()> {
        for (key, value) in &self.entries {
            if let Some(missing) = find_references(value)
                .into_iter()
                .find(|dep| !self.contains_key(dep.as_str()))
            {
                return Err(RiggingError::UnresolvableReference {
                    from: key.clone(),
                    key: missing,
                });
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<ComponentKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = (&'a ComponentKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, ComponentKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
