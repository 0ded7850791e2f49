//! # rigging-sdk
//!
//! Public SDK for building runtime systems from declarative configuration.
//!
//! Provides two entry points:
//! - [`System`](system::System): Builds every requested component and exposes the results by key.
//! - [`SystemBuilder`](builder::SystemBuilder): Fluent API for choosing the source,
//!   keys, and loader options.
//!
//! # Example
//!
//! ```rust
//! use rigging_compose::{Args, Configuration, Initializer, Value};
//! use rigging_sdk::system::System;
//!
//! let mut initializer = Initializer::new();
//! let _ = initializer.register("greeting", |args: Args| {
//!     let name = args.value()?.as_str().unwrap_or("world");
//!     Ok(Value::from(format!("hello, {name}")))
//! });
//!
//! let config = Configuration::new().with("greeting", "rigging");
//! let system = System::from_config(config, &initializer, None).expect("build");
//! assert_eq!(system["greeting"], Value::from("hello, rigging"));
//! ```

pub mod builder;
pub mod system;

pub use builder::SystemBuilder;
pub use system::System;
