//! A built system and the ways to obtain one.

use std::any::Any;
use std::ops::Index;

use rigging_common::config::RiggingConfig;
use rigging_common::error::Result;
use rigging_common::types::ComponentKey;
use rigging_compose::build::{BuiltSystem, build};
use rigging_compose::configuration::Configuration;
use rigging_compose::initializer::Initializer;
use rigging_compose::loader;
use rigging_compose::value::Value;

/// The components built from one configuration.
///
/// Each built key is available through [`get`](Self::get) or indexing. The
/// reference-normalized configuration it was built from stays available
/// for introspection.
#[derive(Debug, Clone)]
pub struct System {
    components: BuiltSystem,
    original_config: Configuration,
}

impl System {
    /// Builds `keys` (every key when `None`) and their dependencies.
    ///
    /// Textual reference markers in `config` are normalized first, so
    /// configurations written either way build the same system.
    ///
    /// # Errors
    ///
    /// Returns the first ordering, handler lookup, or construction error.
    pub fn from_config(
        config: Configuration,
        initializer: &Initializer,
        keys: Option<&[ComponentKey]>,
    ) -> Result<Self> {
        Self::from_config_with(config, initializer, keys, &RiggingConfig::default())
    }

    /// [`from_config`](Self::from_config) with explicit loader options.
    ///
    /// # Errors
    ///
    /// Returns the first validation, ordering, handler lookup, or
    /// construction error.
    pub fn from_config_with(
        config: Configuration,
        initializer: &Initializer,
        keys: Option<&[ComponentKey]>,
        options: &RiggingConfig,
    ) -> Result<Self> {
        options.validate()?;
        let original_config = loader::replace_refs(&config, options);
        if options.strict_references {
            original_config.validate_references()?;
        }
        let keys: Vec<ComponentKey> = match keys {
            Some(keys) => keys.to_vec(),
            None => original_config.keys().cloned().collect(),
        };
        tracing::info!(
            components = original_config.len(),
            requested = keys.len(),
            "assembling system"
        );
        let components = build(&original_config, &keys, |key, value| {
            initializer.initialize(key, value)
        })?;
        Ok(Self {
            components,
            original_config,
        })
    }

    /// Builds every key of a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any error from [`from_config`](Self::from_config).
    pub fn from_json_str(text: &str, initializer: &Initializer) -> Result<Self> {
        let options = RiggingConfig::default();
        Self::from_config_with(loader::from_json_str(text, &options)?, initializer, None, &options)
    }

    /// Builds every key of a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any error from [`from_config`](Self::from_config).
    pub fn from_toml_str(text: &str, initializer: &Initializer) -> Result<Self> {
        let options = RiggingConfig::default();
        Self::from_config_with(loader::from_toml_str(text, &options)?, initializer, None, &options)
    }

    /// Returns the built value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.components.get(key)
    }

    /// Returns the built instance of `key` downcast to `T`.
    #[must_use]
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.components.get_as::<T>(key)
    }

    /// Built keys in construction order.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.components.keys()
    }

    /// All built components.
    #[must_use]
    pub const fn components(&self) -> &BuiltSystem {
        &self.components
    }

    /// The configuration the system was built from, references normalized.
    #[must_use]
    pub const fn original_config(&self) -> &Configuration {
        &self.original_config
    }

    /// Consumes the system, returning its built components.
    #[must_use]
    pub fn into_components(self) -> BuiltSystem {
        self.components
    }
}

impl Index<&str> for System {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if `key` was not built.
    #[allow(clippy::panic)]
    fn index(&self, key: &str) -> &Self::Output {
        match self.components.get(key) {
            Some(value) => value,
            None => panic!("component \"{key}\" was not built"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rigging_common::error::RiggingError;
    use rigging_common::types::keys;
    use rigging_compose::initializer::Args;

    use super::*;

    fn upper() -> Initializer {
        let mut i = Initializer::new();
        let _ = i
            .register_default(|args: Args| Ok(args.into_value()))
            .expect("default");
        let _ = i.register("result", |args: Args| {
            Ok(Value::from(args.value()?.as_str().unwrap_or_default().to_uppercase()))
        });
        i
    }

    fn foo_bar() -> Configuration {
        Configuration::new()
            .with("foo", "foo")
            .with("bar", "bar")
            .with("result", "#p/ref foo")
    }

    #[test]
    fn default_handler_fallback_builds_only_closure() {
        let system =
            System::from_config(foo_bar(), &upper(), Some(&keys(["result"]))).expect("build");
        assert_eq!(system["result"], Value::from("FOO"));
        assert_eq!(system.get("foo"), Some(&Value::from("foo")));
        assert!(system.get("bar").is_none());
    }

    #[test]
    fn all_keys_by_default() {
        let system = System::from_config(foo_bar(), &upper(), None).expect("build");
        let mut built: Vec<&str> = system.keys().map(ComponentKey::as_str).collect();
        built.sort_unstable();
        assert_eq!(built, vec!["bar", "foo", "result"]);
    }

    #[test]
    fn original_config_is_normalized() {
        let system = System::from_config(foo_bar(), &upper(), None).expect("build");
        assert_eq!(
            system.original_config().get("result"),
            Some(&Value::reference("foo"))
        );
    }

    #[test]
    fn strict_options_reject_dangling_orphans() {
        let config = foo_bar().with("orphan", "#p/ref ghost");
        let options = RiggingConfig {
            strict_references: true,
            ..RiggingConfig::default()
        };
        let requested = keys(["result"]);
        let err = System::from_config_with(config.clone(), &upper(), Some(&requested), &options)
            .expect_err("strict");
        assert!(matches!(err, RiggingError::UnresolvableReference { .. }));

        let system =
            System::from_config(config, &upper(), Some(&keys(["result"]))).expect("lenient");
        assert_eq!(system["result"], Value::from("FOO"));
    }

    #[test]
    fn blank_reference_prefix_is_rejected() {
        let options = RiggingConfig {
            reference_prefix: String::new(),
            ..RiggingConfig::default()
        };
        let err = System::from_config_with(foo_bar(), &upper(), None, &options)
            .expect_err("blank prefix");
        assert!(matches!(err, RiggingError::Config { .. }));
    }

    #[test]
    #[should_panic(expected = "was not built")]
    fn indexing_unbuilt_key_panics() {
        let system =
            System::from_config(foo_bar(), &upper(), Some(&keys(["foo"]))).expect("build");
        let _ = &system["result"];
    }
}
