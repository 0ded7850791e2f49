//! Unified error types for the Rigging workspace.
//!
//! Every fallible operation of the graph engine, the initializer registry,
//! the loaders, and the SDK reports a [`RiggingError`]. Errors raised by
//! user construction functions travel inside [`RiggingError::Construction`]
//! with the original error kept as the source.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ComponentKey;

/// Boxed error type returned by construction functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RiggingError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration has an invalid shape.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A requested key is not defined in the configuration.
    #[error("unknown component key: \"{key}\"")]
    UnknownKey {
        /// The requested key.
        key: ComponentKey,
    },

    /// A reference names a key that is not defined in the configuration.
    #[error("component \"{from}\" references undefined key \"{key}\"")]
    UnresolvableReference {
        /// Key whose specification holds the reference.
        from: ComponentKey,
        /// The referenced key.
        key: ComponentKey,
    },

    /// The dependency graph contains a cycle.
    #[error("cyclic dependency detected at component \"{key}\"")]
    CyclicDependency {
        /// A key that lies on the cycle.
        key: ComponentKey,
    },

    /// No construction function is registered for a key and no default exists.
    #[error("no handler registered for component \"{key}\"")]
    MissingHandler {
        /// Key without a handler.
        key: ComponentKey,
    },

    /// A second default handler was registered.
    #[error("a default handler is already registered")]
    DuplicateDefaultRegistration,

    /// A construction function received arguments it cannot use.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the argument problem.
        message: String,
    },

    /// A construction function failed.
    #[error("failed to construct component \"{key}\": {source}")]
    Construction {
        /// Key being constructed.
        key: ComponentKey,
        /// Error returned by the construction function.
        source: BoxError,
    },

    /// JSON text could not be parsed.
    #[error("JSON parse error: {source}")]
    Json {
        /// Underlying parse error.
        #[from]
        source: serde_json::Error,
    },

    /// TOML text could not be parsed.
    #[error("TOML parse error: {source}")]
    Toml {
        /// Underlying parse error.
        #[from]
        source: toml::de::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RiggingError>;
