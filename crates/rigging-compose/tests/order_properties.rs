//! Property tests for dependency ordering.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;

use proptest::prelude::*;
use rigging_common::types::ComponentKey;
use rigging_compose::{
    Configuration, Value, build, dependency_graph, dependent_keys, transitive_dependencies,
    transitive_dependencies_set,
};

/// An acyclic configuration: node `i` may only reference nodes `j < i`.
fn acyclic_config(node_count: usize, edges: &[(usize, usize)]) -> Configuration {
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(a, b) in edges {
        if a < node_count && b < a {
            deps[a].push(b);
        }
    }
    (0..node_count)
        .map(|i| {
            let refs = deps[i]
                .iter()
                .map(|j| Value::reference(format!("k{j}")))
                .collect::<Vec<_>>();
            (format!("k{i}"), Value::mapping([("deps", Value::from(refs))]))
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_every_key_follows_its_dependencies(
        node_count in 1..20usize,
        edges in proptest::collection::vec((0..20usize, 0..20usize), 0..50),
        pick in 0..20usize,
    ) {
        let config = acyclic_config(node_count, &edges);
        let requested = vec![ComponentKey::new(format!("k{}", pick % node_count))];
        let order = dependent_keys(&config, &requested).expect("acyclic config orders");

        let graph = dependency_graph(&config);
        let position: HashMap<&ComponentKey, usize> =
            order.iter().enumerate().map(|(i, k)| (k, i)).collect();

        // Exactly the requested key and its closure.
        let mut expected = transitive_dependencies(&graph, &requested[0]);
        let _ = expected.insert(requested[0].clone());
        prop_assert_eq!(order.len(), expected.len());

        for key in &order {
            prop_assert!(expected.contains(key));
            for dep in transitive_dependencies(&graph, key) {
                prop_assert!(position[&dep] < position[key], "{dep} must precede {key}");
            }
        }
    }

    #[test]
    fn prop_build_constructs_each_key_once(
        node_count in 1..15usize,
        edges in proptest::collection::vec((0..15usize, 0..15usize), 0..40),
    ) {
        let config = acyclic_config(node_count, &edges);
        let keys: Vec<ComponentKey> = config.keys().cloned().collect();
        let mut seen: Vec<ComponentKey> = Vec::new();
        let system = build(&config, &keys, |key, value| {
            seen.push(key.clone());
            Ok(value)
        })
        .expect("acyclic config builds");

        prop_assert_eq!(system.len(), node_count);
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), seen.len());
    }

    #[test]
    fn prop_subset_order_matches_global_sort(
        node_count in 1..20usize,
        edges in proptest::collection::vec((0..20usize, 0..20usize), 0..50),
        picks in proptest::collection::vec(0..20usize, 1..5),
    ) {
        let config = acyclic_config(node_count, &edges);
        let requested: Vec<ComponentKey> = picks
            .iter()
            .map(|p| ComponentKey::new(format!("k{}", p % node_count)))
            .collect();
        let order = dependent_keys(&config, &requested).expect("acyclic config orders");

        let graph = dependency_graph(&config);
        let mut closure = transitive_dependencies_set(&graph, &requested);
        closure.extend(requested.iter().cloned());
        let expected: Vec<ComponentKey> = graph
            .topological_order()
            .expect("acyclic")
            .into_iter()
            .rev()
            .filter(|k| closure.contains(k))
            .collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn prop_ordering_is_deterministic(
        node_count in 1..20usize,
        edges in proptest::collection::vec((0..20usize, 0..20usize), 0..50),
    ) {
        let config = acyclic_config(node_count, &edges);
        let keys: Vec<ComponentKey> = config.keys().cloned().collect();
        let first = dependent_keys(&config, &keys).expect("first");
        let second = dependent_keys(&config, &keys).expect("second");
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_rejects_cycle_in_requested_closure() {
    let config = Configuration::new()
        .with("k0", Value::reference("k2"))
        .with("k1", Value::reference("k0"))
        .with("k2", Value::reference("k1"));
    assert!(dependent_keys(&config, &[ComponentKey::new("k1")]).is_err());
}

#[test]
fn test_allows_cycle_outside_closure() {
    let config = Configuration::new()
        .with("k0", 0)
        .with("k1", Value::reference("k0"))
        .with("loop_a", Value::reference("loop_b"))
        .with("loop_b", Value::reference("loop_a"));
    let order = dependent_keys(&config, &[ComponentKey::new("k1")]).expect("cycle is unrelated");
    assert_eq!(order, vec![ComponentKey::new("k0"), ComponentKey::new("k1")]);
}
