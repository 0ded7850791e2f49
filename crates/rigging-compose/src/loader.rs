//! Loading configurations from JSON/TOML and normalizing textual references.
//!
//! Configuration text marks references with a string prefix, for example
//! `"#p/ref db"`. Loading parses the text into nested values and rewrites
//! every marker string into a structural [`Reference`].

use std::path::Path;

use rigging_common::config::RiggingConfig;
use rigging_common::constants::{FORMAT_JSON, FORMAT_TOML};
use rigging_common::error::{Result, RiggingError};

use crate::configuration::Configuration;
use crate::value::{Reference, Value};
use crate::walk::replace_matching;

/// Whether `value` is a textual reference under `syntax`.
///
/// An empty tag marks nothing.
#[must_use]
pub fn is_reference_marker(value: &Value, syntax: &RiggingConfig) -> bool {
    let tag = syntax.reference_tag();
    !tag.is_empty() && value.as_str().is_some_and(|s| s.starts_with(tag))
}

/// Turns a marker string into a [`Reference`].
///
/// The key is whatever follows the prefix, counted in characters, trimmed.
/// Values that are not strings are returned unchanged.
#[must_use]
pub fn marker_to_reference(value: Value, syntax: &RiggingConfig) -> Value {
    match value {
        Value::String(s) => {
            let skip = syntax.reference_prefix.chars().count();
            let rest = s.char_indices().nth(skip).map_or("", |(at, _)| &s[at..]);
            Value::Reference(Reference::new(rest.trim()))
        }
        other => other,
    }
}

/// Rewrites every value selected by `selector` with `transform`.
///
/// Existing structural references are left untouched.
#[must_use]
pub fn replace_refs_with<S, T>(config: &Configuration, selector: S, transform: T) -> Configuration
where
    S: Fn(&Value) -> bool,
    T: Fn(Value) -> Value,
{
    config
        .iter()
        .map(|(key, value)| (key.clone(), replace_matching(value.clone(), &selector, &transform)))
        .collect()
}

/// Rewrites textual reference markers into structural references.
#[must_use]
pub fn replace_refs(config: &Configuration, syntax: &RiggingConfig) -> Configuration {
    replace_refs_with(
        config,
        |v| is_reference_marker(v, syntax),
        |v| marker_to_reference(v, syntax),
    )
}

/// Builds a normalized configuration from a parsed top-level mapping.
///
/// # Errors
///
/// Returns an error if `value` is not a mapping, or if strict reference
/// checking is enabled and a reference is dangling.
pub fn from_value(value: Value, syntax: &RiggingConfig) -> Result<Configuration> {
    normalize(&Configuration::from_value(value)?, syntax)
}

fn normalize(raw: &Configuration, syntax: &RiggingConfig) -> Result<Configuration> {
    syntax.validate()?;
    let config = replace_refs(raw, syntax);
    if syntax.strict_references {
        config.validate_references()?;
    }
    tracing::info!(components = config.len(), "configuration loaded");
    Ok(config)
}

/// Parses JSON configuration text.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON or not a JSON object.
pub fn from_json_str(text: &str, syntax: &RiggingConfig) -> Result<Configuration> {
    tracing::debug!(format = FORMAT_JSON, bytes = text.len(), "parsing configuration");
    let json: serde_json::Value = serde_json::from_str(text)?;
    match json {
        // Top-level keys keep document order.
        serde_json::Value::Object(map) => normalize(&map.into_iter().collect(), syntax),
        other => from_value(Value::from(other), syntax),
    }
}

/// Parses TOML configuration text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML.
pub fn from_toml_str(text: &str, syntax: &RiggingConfig) -> Result<Configuration> {
    tracing::debug!(format = FORMAT_TOML, bytes = text.len(), "parsing configuration");
    let table: toml::Table = toml::from_str(text)?;
    normalize(&table.into_iter().collect(), syntax)
}

/// Reads and parses a JSON configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn from_json_file(path: &Path, syntax: &RiggingConfig) -> Result<Configuration> {
    tracing::info!(path = %path.display(), "loading JSON configuration");
    from_json_str(&read(path)?, syntax)
}

/// Reads and parses a TOML configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn from_toml_file(path: &Path, syntax: &RiggingConfig) -> Result<Configuration> {
    tracing::info!(path = %path.display(), "loading TOML configuration");
    from_toml_str(&read(path)?, syntax)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| RiggingError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
