//! Fluent API for assembling a [`System`].

use std::path::{Path, PathBuf};

use rigging_common::config::RiggingConfig;
use rigging_common::error::Result;
use rigging_common::types::ComponentKey;
use rigging_compose::configuration::Configuration;
use rigging_compose::initializer::Initializer;
use rigging_compose::loader;

use crate::system::System;

/// Where the configuration comes from.
#[derive(Debug, Clone)]
enum Source {
    Config(Configuration),
    Json(String),
    Toml(String),
    JsonFile(PathBuf),
    TomlFile(PathBuf),
}

/// Builder for choosing a configuration source, the keys to build, and
/// loader options before building a [`System`].
#[derive(Debug, Clone)]
pub struct SystemBuilder {
    source: Source,
    keys: Option<Vec<ComponentKey>>,
    options: RiggingConfig,
}

impl SystemBuilder {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            keys: None,
            options: RiggingConfig::default(),
        }
    }

    /// Starts from an in-memory configuration.
    #[must_use]
    pub fn from_config(config: Configuration) -> Self {
        Self::with_source(Source::Config(config))
    }

    /// Starts from JSON configuration text.
    #[must_use]
    pub fn from_json(text: impl Into<String>) -> Self {
        Self::with_source(Source::Json(text.into()))
    }

    /// Starts from TOML configuration text.
    #[must_use]
    pub fn from_toml(text: impl Into<String>) -> Self {
        Self::with_source(Source::Toml(text.into()))
    }

    /// Starts from a JSON configuration file.
    #[must_use]
    pub fn from_json_file(path: impl AsRef<Path>) -> Self {
        Self::with_source(Source::JsonFile(path.as_ref().to_path_buf()))
    }

    /// Starts from a TOML configuration file.
    #[must_use]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Self {
        Self::with_source(Source::TomlFile(path.as_ref().to_path_buf()))
    }

    /// Restricts the build to `keys` and their dependencies.
    #[must_use]
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the textual reference marker prefix.
    #[must_use]
    pub fn reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.reference_prefix = prefix.into();
        self
    }

    /// Validates every reference in the configuration before building.
    #[must_use]
    pub const fn strict_references(mut self, strict: bool) -> Self {
        self.options.strict_references = strict;
        self
    }

    /// Replaces all loader options at once.
    #[must_use]
    pub fn options(mut self, options: RiggingConfig) -> Self {
        self.options = options;
        self
    }

    /// Loads the configuration and builds the system.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, ordering, or any construction fails.
    pub fn build(self, initializer: &Initializer) -> Result<System> {
        let config = match self.source {
            Source::Config(config) => config,
            Source::Json(text) => loader::from_json_str(&text, &self.options)?,
            Source::Toml(text) => loader::from_toml_str(&text, &self.options)?,
            Source::JsonFile(path) => loader::from_json_file(&path, &self.options)?,
            Source::TomlFile(path) => loader::from_toml_file(&path, &self.options)?,
        };
        System::from_config_with(config, initializer, self.keys.as_deref(), &self.options)
    }
}

#[cfg(test)]
mod tests {
    use rigging_compose::initializer::Args;
    use rigging_compose::value::Value;

    use super::*;

    fn echo() -> Initializer {
        let mut i = Initializer::new();
        let _ = i
            .register_default(|args: Args| Ok(args.into_value()))
            .expect("default");
        i
    }

    #[test]
    fn builder_defaults_build_everything() {
        let system = SystemBuilder::from_json(r##"{ "a": 1, "b": "#p/ref a" }"##)
            .build(&echo())
            .expect("build");
        assert_eq!(system["b"], Value::from(1));
        assert_eq!(system.keys().count(), 2);
    }

    #[test]
    fn builder_restricts_keys() {
        let system = SystemBuilder::from_toml("a = 1\nb = 2\nc = \"#p/ref a\"\n")
            .keys(["c"])
            .build(&echo())
            .expect("build");
        assert!(system.get("b").is_none());
        assert_eq!(system["c"], Value::from(1));
    }

    #[test]
    fn builder_custom_prefix() {
        let system = SystemBuilder::from_json(r#"{ "a": 1, "b": "&a" }"#)
            .reference_prefix("&")
            .build(&echo())
            .expect("build");
        assert_eq!(system["b"], Value::from(1));
    }

    #[test]
    fn builder_strict_mode() {
        let result = SystemBuilder::from_config(
            Configuration::new().with("a", 1).with("orphan", Value::reference("ghost")),
        )
        .keys(["a"])
        .strict_references(true)
        .build(&echo());
        assert!(result.is_err());
    }

    #[test]
    fn builder_missing_file() {
        let result = SystemBuilder::from_toml_file("/nonexistent/system.toml").build(&echo());
        assert!(result.is_err());
    }
}
