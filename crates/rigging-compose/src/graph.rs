//! Dependency graph management using `petgraph`.
//!
//! Builds a directed graph from the references embedded in a
//! configuration. An edge `A -> B` means "A depends on B".

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::{ComponentKey, KeySet};

use crate::configuration::Configuration;
use crate::walk::find_references;

/// A dependency graph of components.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Internal petgraph representation.
    graph: DiGraph<ComponentKey, ()>,
    /// Map from key to node index.
    nodes: HashMap<ComponentKey, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the dependency graph of `config`.
    ///
    /// Every configuration key becomes a node, in configuration order.
    /// Each distinct key referenced from a value adds one edge from the
    /// owning key to the referenced key, so references to undefined keys
    /// still show up as nodes.
    #[must_use]
    pub fn from_configuration(config: &Configuration) -> Self {
        let mut graph = Self::new();
        for key in config.keys() {
            let _ = graph.add_component(key.clone());
        }
        for (key, value) in config {
            for dependency in find_references(value) {
                graph.add_dependency(key, &dependency);
            }
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );
        graph
    }

    /// Adds a component node, returning the existing node if present.
    pub fn add_component(&mut self, key: ComponentKey) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        let _ = self.nodes.insert(key, idx);
        idx
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    ///
    /// Repeated edges between the same pair collapse into one.
    pub fn add_dependency(&mut self, dependent: &ComponentKey, dependency: &ComponentKey) {
        let from = self.add_component(dependent.clone());
        let to = self.add_component(dependency.clone());
        let _ = self.graph.update_edge(from, to, ());
    }

    /// Whether `key` is a node of the graph.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has an edge `dependent -> dependency`.
    #[must_use]
    pub fn has_dependency(&self, dependent: &str, dependency: &str) -> bool {
        match (self.nodes.get(dependent), self.nodes.get(dependency)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Direct dependencies of `key`. Empty for keys not in the graph.
    #[must_use]
    pub fn direct_dependencies(&self, key: &str) -> KeySet {
        self.nodes.get(key).map_or_else(KeySet::new, |&idx| {
            self.graph
                .neighbors(idx)
                .map(|n| self.graph[n].clone())
                .collect()
        })
    }

    /// Everything `key` depends on, directly or transitively.
    ///
    /// `key` itself is excluded. Keys absent from the graph depend on
    /// nothing.
    #[must_use]
    pub fn transitive_dependencies(&self, key: &str) -> KeySet {
        let Some(&start) = self.nodes.get(key) else {
            return KeySet::new();
        };
        let mut dfs = Dfs::new(&self.graph, start);
        let mut reached = KeySet::new();
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                let _ = reached.insert(self.graph[idx].clone());
            }
        }
        reached
    }

    /// The subgraph induced by `keys`, keeping node and edge order.
    #[must_use]
    pub fn restricted_to(&self, keys: &KeySet) -> Self {
        let graph = self.graph.filter_map(
            |_, key| keys.contains(key).then(|| key.clone()),
            |_, &()| Some(()),
        );
        let nodes = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();
        Self { graph, nodes }
    }

    /// Returns a topological ordering of the whole graph.
    ///
    /// A key appears before every key it depends on; reverse the result
    /// to get a construction order.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::CyclicDependency`] if the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<ComponentKey>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(RiggingError::CyclicDependency {
                key: self.graph[cycle.node_id()].clone(),
            }),
        }
    }
}

/// Builds the dependency graph of `config`.
#[must_use]
pub fn dependency_graph(config: &Configuration) -> DependencyGraph {
    DependencyGraph::from_configuration(config)
}
