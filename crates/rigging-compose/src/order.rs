//! Key selection and dependencies-first ordering.
//!
//! Given the keys a caller asks for, computes their transitive dependency
//! closure and orders it so every key follows everything it depends on.

use rigging_common::error::{Result, RiggingError};
use rigging_common::types::{ComponentKey, KeySet};

use crate::configuration::Configuration;
use crate::graph::DependencyGraph;

/// Everything `key` depends on, directly or transitively.
#[must_use]
pub fn transitive_dependencies(graph: &DependencyGraph, key: &ComponentKey) -> KeySet {
    graph.transitive_dependencies(key.as_str())
}

/// The union of [`transitive_dependencies`] over `keys`.
#[must_use]
pub fn transitive_dependencies_set(graph: &DependencyGraph, keys: &[ComponentKey]) -> KeySet {
    keys.iter()
        .flat_map(|key| transitive_dependencies(graph, key))
        .collect()
}

/// Returns `keys` plus `dependencies(graph, keys)`, ordered so that each
/// key comes after every key it depends on.
///
/// Independent keys keep their relative position in the topological sort
/// of the whole graph, which is reproducible for a given configuration.
/// When a cycle exists only outside the closure, the sort falls back to
/// the subgraph induced by the closure.
///
/// # Errors
///
/// - [`RiggingError::UnknownKey`] if a requested key is not defined.
/// - [`RiggingError::UnresolvableReference`] if a key in the closure
///   references an undefined key.
/// - [`RiggingError::CyclicDependency`] if the closure contains a cycle.
pub fn find_keys<F>(
    config: &Configuration,
    keys: &[ComponentKey],
    dependencies: F,
) -> Result<Vec<ComponentKey>>
where
    F: FnOnce(&DependencyGraph, &[ComponentKey]) -> KeySet,
{
    if let Some(unknown) = keys.iter().find(|k| !config.contains_key(k.as_str())) {
        return Err(RiggingError::UnknownKey {
            key: unknown.clone(),
        });
    }

    let graph = DependencyGraph::from_configuration(config);
    let mut closure = dependencies(&graph, keys);
    closure.extend(keys.iter().cloned());
    check_resolvable(config, &graph, &closure)?;

    let sorted = match graph.topological_order() {
        Ok(order) => order,
        Err(RiggingError::CyclicDependency { key }) => {
            tracing::debug!(key = %key, "cycle in full graph, sorting closure only");
            graph.restricted_to(&closure).topological_order()?
        }
        Err(other) => return Err(other),
    };

    let ordered: Vec<ComponentKey> = sorted
        .into_iter()
        .rev()
        .filter(|key| closure.contains(key))
        .collect();
    debug_assert_eq!(ordered.len(), closure.len());
    tracing::debug!(requested = keys.len(), resolved = ordered.len(), "build order resolved");
    Ok(ordered)
}

/// [`find_keys`] with [`transitive_dependencies_set`]: the requested keys
/// and everything they need, in construction order.
///
/// # Errors
///
/// See [`find_keys`].
pub fn dependent_keys(config: &Configuration, keys: &[ComponentKey]) -> Result<Vec<ComponentKey>> {
    find_keys(config, keys, transitive_dependencies_set)
}

/// The configuration restricted to `keys`, in the order given.
///
/// Keys that are not defined are skipped.
#[must_use]
pub fn select_keys(config: &Configuration, keys: &[ComponentKey]) -> Configuration {
    keys.iter()
        .filter_map(|key| config.get(key.as_str()).map(|v| (key.clone(), v.clone())))
        .collect()
}

fn check_resolvable(
    config: &Configuration,
    graph: &DependencyGraph,
    closure: &KeySet,
) -> Result<()> {
    for key in closure.iter().filter(|k| config.contains_key(k.as_str())) {
        if let Some(missing) = graph
            .direct_dependencies(key.as_str())
            .into_iter()
            .find(|dep| !config.contains_key(dep.as_str()))
        {
            return Err(RiggingError::UnresolvableReference {
                from: key.clone(),
                key: missing,
            });
        }
    }
    if let Some(unknown) = closure.iter().find(|k| !config.contains_key(k.as_str())) {
        return Err(RiggingError::UnknownKey {
            key: unknown.clone(),
        });
    }
    Ok(())
}
