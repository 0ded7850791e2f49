//! Expansion of references into already-built values.

use rigging_common::error::{Result, RiggingError};
use rigging_common::types::ComponentKey;

use crate::build::BuiltSystem;
use crate::value::Value;
use crate::walk::try_postwalk;

/// Replaces every reference inside `spec` with the built value it names.
///
/// `owner` is the key whose specification is being expanded and is only
/// used for error reporting.
///
/// # Errors
///
/// Returns [`RiggingError::UnresolvableReference`] if a reference names a
/// key that has not been built. The build engine orders keys so this
/// cannot happen for a closure it resolved itself.
pub fn expand_references(
    owner: &ComponentKey,
    spec: &Value,
    built: &BuiltSystem,
) -> Result<Value> {
    try_postwalk(spec.clone(), &mut |node| match node {
        Value::Reference(reference) => built.get(reference.key().as_str()).cloned().ok_or_else(|| {
            RiggingError::UnresolvableReference {
                from: owner.clone(),
                key: reference.key().clone(),
            }
        }),
        other => Ok(other),
    })
}
