//! # rigging-common
//!
//! Shared types, error definitions, loader configuration, and constants
//! used across the entire Rigging workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives that the graph engine and
//! the SDK build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
