//! Traversal and rewriting of nested values.
//!
//! [`postwalk`] rewrites a value bottom-up: children are rewritten first,
//! then the rebuilt node is handed to the transform. [`tree_seq`] lazily
//! enumerates the nodes of any tree described by a branch predicate and a
//! children accessor.

use indexmap::IndexSet;
use rigging_common::types::ComponentKey;

use crate::value::Value;

/// Rewrites every node of `value` in post-order.
///
/// Sequence and mapping shapes are preserved. `f` sees each child after
/// that child's own subtree has been rewritten, and finally the root.
pub fn postwalk<F>(value: Value, f: &mut F) -> Value
where
    F: FnMut(Value) -> Value,
{
    let rebuilt = match value {
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(|v| postwalk(v, f)).collect())
        }
        Value::Mapping(fields) => Value::Mapping(
            fields
                .into_iter()
                .map(|(k, v)| (k, postwalk(v, f)))
                .collect(),
        ),
        leaf => leaf,
    };
    f(rebuilt)
}

/// Fallible [`postwalk`]. The first error aborts the walk.
///
/// # Errors
///
/// Returns the first error produced by `f`.
pub fn try_postwalk<F, E>(value: Value, f: &mut F) -> Result<Value, E>
where
    F: FnMut(Value) -> Result<Value, E>,
{
    let rebuilt = match value {
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|v| try_postwalk(v, f))
                .collect::<Result<_, E>>()?,
        ),
        Value::Mapping(fields) => Value::Mapping(
            fields
                .into_iter()
                .map(|(k, v)| try_postwalk(v, f).map(|v| (k, v)))
                .collect::<Result<_, E>>()?,
        ),
        leaf => leaf,
    };
    f(rebuilt)
}

/// Rewrites every node satisfying `pred` with `transform`, post-order.
pub fn replace_matching<P, T>(value: Value, pred: P, mut transform: T) -> Value
where
    P: Fn(&Value) -> bool,
    T: FnMut(Value) -> Value,
{
    postwalk(value, &mut |node| if pred(&node) { transform(node) } else { node })
}

/// Lazy pre-order enumeration of a tree.
///
/// Created by [`tree_seq`].
pub struct TreeSeq<'a, T, B, C> {
    stack: Vec<&'a T>,
    is_branch: B,
    children: C,
}

impl<'a, T, B, C, I> Iterator for TreeSeq<'a, T, B, C>
where
    B: Fn(&'a T) -> bool,
    C: Fn(&'a T) -> I,
    I: IntoIterator<Item = &'a T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if (self.is_branch)(node) {
            let start = self.stack.len();
            self.stack.extend((self.children)(node));
            self.stack[start..].reverse();
        }
        Some(node)
    }
}

/// Enumerates every node under `root`, the root first.
///
/// A node's children are visited in order, each subtree completely before
/// its next sibling. Each call starts a fresh enumeration.
pub fn tree_seq<'a, T, B, C, I>(root: &'a T, is_branch: B, children: C) -> TreeSeq<'a, T, B, C>
where
    B: Fn(&'a T) -> bool,
    C: Fn(&'a T) -> I,
    I: IntoIterator<Item = &'a T>,
{
    TreeSeq {
        stack: vec![root],
        is_branch,
        children,
    }
}

/// Every node of `value` (including `value` itself) matching `pred`.
pub fn depth_search<'a, P>(value: &'a Value, pred: P) -> impl Iterator<Item = &'a Value>
where
    P: Fn(&Value) -> bool,
{
    tree_seq(value, Value::is_branch, Value::children).filter(move |node| pred(*node))
}

/// The distinct keys referenced anywhere inside `value`, in first-seen order.
pub fn find_references(value: &Value) -> IndexSet<ComponentKey> {
    depth_search(value, |node| matches!(node, Value::Reference(_)))
        .filter_map(Value::as_reference)
        .map(|r| r.key().clone())
        .collect()
}
