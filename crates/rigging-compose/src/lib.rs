//! # rigging-compose
//!
//! Builds a runtime object graph from a declarative configuration.
//!
//! Handles:
//! - **Value**: The nested specification model, including structural references.
//! - **Walk**: Post-order rewriting and lazy enumeration of nested values.
//! - **Configuration**: The immutable key to specification mapping.
//! - **Graph**: Dependency graph construction from embedded references.
//! - **Order**: Transitive closure and dependencies-first ordering.
//! - **Resolver**: Expansion of references into already-built values.
//! - **Build**: The fold that constructs each requested component once.
//! - **Initializer**: Per-key construction functions with an optional default.
//! - **Loader**: JSON/TOML loading and textual reference normalization.

pub mod build;
pub mod configuration;
pub mod graph;
pub mod initializer;
pub mod loader;
pub mod order;
pub mod resolver;
pub mod value;
pub mod walk;

pub use build::{BuiltSystem, build};
pub use configuration::Configuration;
pub use graph::{DependencyGraph, dependency_graph};
pub use initializer::{Args, Initializer};
pub use order::{
    dependent_keys, find_keys, select_keys, transitive_dependencies, transitive_dependencies_set,
};
pub use value::{Instance, Reference, Value};
