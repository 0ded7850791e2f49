//! Domain primitive types used across the Rigging workspace.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one entry in a configuration.
///
/// Keys are opaque strings. They are unique within a configuration and
/// ordered lexically when collected into a [`KeySet`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Creates a key from a string value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ComponentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ComponentKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&ComponentKey> for ComponentKey {
    fn from(key: &ComponentKey) -> Self {
        key.clone()
    }
}

/// A deterministic set of component keys.
pub type KeySet = BTreeSet<ComponentKey>;

/// Collects anything key-like into a list of [`ComponentKey`]s.
///
/// ```
/// use rigging_common::types::keys;
///
/// let requested = keys(["db", "api"]);
/// assert_eq!(requested[1].as_str(), "api");
/// ```
pub fn keys<I, K>(items: I) -> Vec<ComponentKey>
where
    I: IntoIterator<Item = K>,
    K: Into<ComponentKey>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn key_displays_inner_string() {
        let key = ComponentKey::new("db");
        assert_eq!(key.to_string(), "db");
        assert_eq!(key.as_str(), "db");
    }

    #[test]
    fn key_lookup_by_str() {
        let mut map = HashMap::new();
        let _ = map.insert(ComponentKey::from("db"), 1);
        assert_eq!(map.get("db"), Some(&1));
    }

    #[test]
    fn key_set_is_sorted() {
        let set: KeySet = keys(["c", "a", "b"]).into_iter().collect();
        let ordered: Vec<&str> = set.iter().map(ComponentKey::as_str).collect();
        assert_eq!(ordered, vec!["a", "b", "c"]);
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let json = serde_json::to_string(&ComponentKey::new("api")).expect("serialize");
        assert_eq!(json, "\"api\"");
    }
}
