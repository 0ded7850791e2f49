//! Builds the quadratic-discriminant system from TOML text.
//!
//! Run with `RUST_LOG=debug` to see the resolved build order.

use anyhow::Context;
use rigging_compose::{Args, Initializer, Value};
use rigging_sdk::SystemBuilder;

const SYSTEM: &str = r##"
denominator = 1
bsqr = 4

[numerator]
minuend = "#p/ref bsqr"
subtrahend = "#p/ref ac4"

[result]
numerator = "#p/ref numerator"
denominator = "#p/ref denominator"

[ac4]
a = 1
c = 2

[unused]
ignored = "#p/ref nowhere"
"##;

fn initializer() -> Initializer {
    let mut i = Initializer::new();
    let _ = i
        .register("ac4", |args: Args| {
            Ok(Value::from(args.integer("a")? * args.integer("c")? * 4))
        })
        .register("bsqr", |args: Args| {
            let b = args.value()?.as_i64().ok_or("bsqr expects an integer")?;
            Ok(Value::from(b * b))
        })
        .register("denominator", |args: Args| {
            let a = args.value()?.as_i64().ok_or("denominator expects an integer")?;
            Ok(Value::from(2 * a))
        })
        .register("numerator", |args: Args| {
            Ok(Value::from(args.integer("minuend")? - args.integer("subtrahend")?))
        })
        .register("result", |args: Args| {
            Ok(Value::from(args.integer("numerator")? / args.integer("denominator")?))
        });
    i
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let system = SystemBuilder::from_toml(SYSTEM)
        .keys(["result"])
        .build(&initializer())
        .context("building quadratic system")?;

    for (key, value) in system.components().iter() {
        tracing::info!(key = %key, value = ?value, "built");
    }
    let result = system
        .get("result")
        .and_then(Value::as_i64)
        .context("result was not an integer")?;
    tracing::info!(result, "(b^2 - 4ac) / 2a");
    Ok(())
}
