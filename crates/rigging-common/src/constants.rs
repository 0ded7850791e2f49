//! Workspace-wide constants.

/// Textual marker that introduces a reference in loaded configuration text.
///
/// `"#p/ref db"` refers to the component keyed `db`.
pub const REF_PREFIX: &str = "#p/ref ";

/// Format name reported for JSON configuration sources.
pub const FORMAT_JSON: &str = "json";

/// Format name reported for TOML configuration sources.
pub const FORMAT_TOML: &str = "toml";
