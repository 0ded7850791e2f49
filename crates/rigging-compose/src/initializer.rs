//! Single-dispatch construction functions keyed by component.
//!
//! An [`Initializer`] maps each component key to the handler responsible
//! for building it, with an optional catch-all default. Its
//! [`initialize`](Initializer::initialize) method is the construction
//! function handed to [`build`](crate::build::build).

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rigging_common::error::{BoxError, Result, RiggingError};
use rigging_common::types::ComponentKey;

use crate::value::Value;

/// Arguments passed to a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// A single value: a scalar or sequence specification, or any
    /// specification handed to the default handler.
    Positional(Value),
    /// The fields of a mapping specification, one per named argument.
    Named(BTreeMap<String, Value>),
}

impl Args {
    /// The single positional value.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] for named arguments.
    pub fn value(&self) -> Result<&Value> {
        match self {
            Self::Positional(value) => Ok(value),
            Self::Named(_) => Err(invalid(
                "expected a single positional argument, found named arguments",
            )),
        }
    }

    /// The named argument `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] if `name` is missing or the
    /// arguments are positional.
    pub fn get(&self, name: &str) -> Result<&Value> {
        match self {
            Self::Named(fields) => fields
                .get(name)
                .ok_or_else(|| invalid(format!("missing argument `{name}`"))),
            Self::Positional(_) => Err(invalid(format!(
                "expected named argument `{name}`, found a positional argument"
            ))),
        }
    }

    /// The named argument `name` as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] if it is missing or not an integer.
    pub fn integer(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_i64().ok_or_else(|| mismatch(name, "integer", value))
    }

    /// The named argument `name` as a float, widening integers.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] if it is missing or not a number.
    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_f64().ok_or_else(|| mismatch(name, "number", value))
    }

    /// The named argument `name` as a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] if it is missing or not a string.
    pub fn string(&self, name: &str) -> Result<&str> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    /// The named argument `name` as a built instance of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::InvalidArgument`] if it is missing or holds
    /// something other than a `T`.
    pub fn instance<T: Any>(&self, name: &str) -> Result<&T> {
        let value = self.get(name)?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch(name, std::any::type_name::<T>(), value))
    }

    /// Consumes the arguments, returning them as one value.
    ///
    /// Named arguments become a mapping again.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Positional(value) => value,
            Self::Named(fields) => Value::Mapping(fields),
        }
    }
}

fn invalid(message: impl Into<String>) -> RiggingError {
    RiggingError::InvalidArgument {
        message: message.into(),
    }
}

fn mismatch(name: &str, expected: &str, found: &Value) -> RiggingError {
    invalid(format!(
        "argument `{name}` should be {expected}, found {}",
        found.kind()
    ))
}

/// A construction function.
pub type Handler = Box<dyn Fn(Args) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Registry of construction functions.
#[derive(Default)]
pub struct Initializer {
    handlers: HashMap<ComponentKey, Handler>,
    default: Option<Handler>,
}

impl Initializer {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `key`, replacing any previous handler.
    pub fn register<F>(&mut self, key: impl Into<ComponentKey>, handler: F) -> &mut Self
    where
        F: Fn(Args) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.handlers.insert(key.clone(), Box::new(handler)).is_some() {
            tracing::debug!(key = %key, "handler replaced");
        }
        self
    }

    /// Registers the catch-all handler used for keys without their own.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::DuplicateDefaultRegistration`] if a default
    /// handler is already registered.
    pub fn register_default<F>(&mut self, handler: F) -> Result<&mut Self>
    where
        F: Fn(Args) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        if self.default.is_some() {
            return Err(RiggingError::DuplicateDefaultRegistration);
        }
        self.default = Some(Box::new(handler));
        Ok(self)
    }

    /// Builds the component `key` from its expanded specification.
    ///
    /// A specific handler receives a mapping specification as
    /// [`Args::Named`] and anything else as [`Args::Positional`]. The
    /// default handler always receives [`Args::Positional`].
    ///
    /// # Errors
    ///
    /// - [`RiggingError::MissingHandler`] if neither a specific nor a
    ///   default handler exists.
    /// - [`RiggingError::Construction`] wrapping the handler's own error.
    pub fn initialize(&self, key: &ComponentKey, value: Value) -> Result<Value> {
        let outcome = if let Some(handler) = self.handlers.get(key) {
            let args = match value {
                Value::Mapping(fields) => Args::Named(fields),
                other => Args::Positional(other),
            };
            handler(args)
        } else if let Some(default) = &self.default {
            tracing::debug!(key = %key, "using default handler");
            default(Args::Positional(value))
        } else {
            return Err(RiggingError::MissingHandler { key: key.clone() });
        };
        outcome.map_err(|source| RiggingError::Construction {
            key: key.clone(),
            source,
        })
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.handlers.keys().map(ComponentKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Initializer")
            .field("handlers", &keys)
            .field("default", &self.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Initializer {
        let mut i = Initializer::new();
        let _ = i
            .register("teststr", |args| {
                let s = args.value()?.as_str().unwrap_or_default();
                Ok(Value::from(format!("{s}!!")))
            })
            .register("testint", |args| {
                let v = args.value()?.as_i64().unwrap_or_default();
                Ok(Value::from(v * 2))
            })
            .register("division", |args| {
                Ok(Value::from(args.integer("dividend")? / args.integer("divisor")?))
            })
            .register("ac4", |args| Ok(Value::from(args.integer("a")? * args.integer("c")? * 4)));
        i
    }

    fn key(k: &str) -> ComponentKey {
        ComponentKey::new(k)
    }

    #[test]
    fn positional_dispatch() {
        let i = registry();
        assert_eq!(
            i.initialize(&key("teststr"), Value::from("a")).expect("init"),
            Value::from("a!!")
        );
        assert_eq!(i.initialize(&key("testint"), Value::from(0)).expect("init"), Value::from(0));
        assert_eq!(i.initialize(&key("testint"), Value::from(5)).expect("init"), Value::from(10));
    }

    #[test]
    fn mapping_is_splatted_into_named_args() {
        let i = registry();
        let spec = Value::mapping([("a", 1), ("c", 2)]);
        assert_eq!(i.initialize(&key("ac4"), spec).expect("init"), Value::from(8));
        let spec = Value::mapping([("dividend", 6), ("divisor", 2)]);
        assert_eq!(i.initialize(&key("division"), spec).expect("init"), Value::from(3));
    }

    #[test]
    fn missing_handler_without_default() {
        let err = registry()
            .initialize(&key("unknown"), Value::Null)
            .expect_err("no handler");
        assert!(matches!(
            err,
            RiggingError::MissingHandler { ref key } if key.as_str() == "unknown"
        ));
    }

    #[test]
    fn default_receives_mapping_unsplatted() {
        let mut i = Initializer::new();
        let _ = i.register_default(|args| Ok(args.value()?.clone())).expect("first default");
        let spec = Value::mapping([("a", 1)]);
        assert_eq!(i.initialize(&key("anything"), spec.clone()).expect("init"), spec);
    }

    #[test]
    fn specific_handler_wins_over_default() {
        let mut i = registry();
        let _ = i.register_default(|_| Ok(Value::Null)).expect("default");
        assert_eq!(i.initialize(&key("testint"), Value::from(4)).expect("init"), Value::from(8));
        assert_eq!(i.initialize(&key("other"), Value::from(4)).expect("init"), Value::Null);
    }

    #[test]
    fn second_default_is_rejected() {
        let mut i = Initializer::new();
        let _ = i.register_default(|args| Ok(args.into_value())).expect("first");
        let err = i.register_default(|args| Ok(args.into_value())).expect_err("second");
        assert!(matches!(err, RiggingError::DuplicateDefaultRegistration));
    }

    #[test]
    fn re_registering_overwrites() {
        let mut i = Initializer::new();
        let _ = i
            .register("k", |_| Ok(Value::from(1)))
            .register("k", |_| Ok(Value::from(2)));
        assert_eq!(i.initialize(&key("k"), Value::Null).expect("init"), Value::from(2));
    }

    #[test]
    fn handler_errors_are_wrapped_with_key() {
        let mut i = Initializer::new();
        let _ = i.register("flaky", |_| Err("backend unavailable".into()));
        let err = i.initialize(&key("flaky"), Value::Null).expect_err("fails");
        match err {
            RiggingError::Construction { key, source } => {
                assert_eq!(key.as_str(), "flaky");
                assert_eq!(source.to_string(), "backend unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[derive(Debug)]
    struct PoolExhausted {
        limit: usize,
    }

    impl fmt::Display for PoolExhausted {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pool exhausted at {} connections", self.limit)
        }
    }

    impl std::error::Error for PoolExhausted {}

    #[test]
    fn handler_error_type_survives_wrapping() {
        let mut i = Initializer::new();
        let _ = i.register("pool", |_| Err(PoolExhausted { limit: 4 }.into()));
        let err = i.initialize(&key("pool"), Value::Null).expect_err("fails");

        let chained = std::error::Error::source(&err).expect("source is kept");
        assert_eq!(chained.downcast_ref::<PoolExhausted>().map(|e| e.limit), Some(4));

        let RiggingError::Construction { source, .. } = err else {
            panic!("expected a construction error");
        };
        let inner = source.downcast::<PoolExhausted>().expect("concrete type");
        assert_eq!(inner.limit, 4);
    }

    #[test]
    fn argument_helpers_report_mismatches() {
        let i = registry();
        let err = i
            .initialize(
                &key("ac4"),
                Value::mapping([("a", Value::from("one")), ("c", Value::from(2))]),
            )
            .expect_err("bad arg");
        let msg = err.to_string();
        assert!(msg.contains("`a`"), "got: {msg}");
        assert!(msg.contains("integer"), "got: {msg}");

        let err = i.initialize(&key("ac4"), Value::from(3)).expect_err("positional");
        assert!(err.to_string().contains("named argument"), "got: {err}");
    }

    #[test]
    fn debug_lists_registered_keys() {
        let rendered = format!("{:?}", registry());
        assert!(rendered.contains("ac4"), "got: {rendered}");
        assert!(rendered.contains("default: false"), "got: {rendered}");
    }
}
