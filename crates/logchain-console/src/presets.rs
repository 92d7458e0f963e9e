//! Ready-made modes and emitters for command line tools.

use console::Style;
use logchain::{EmitterOptions, Logger, ModeOptions, Result};
use serde_json::Value;

use crate::palette::{gray, styled, Styling};

/// Emitters installed by [`install`]: name, priority and colour.
///
/// Lower priorities are more severe.
pub const EMITTERS: &[(&str, i32, fn(Style) -> Style)] = &[
    ("log", logchain::DEFAULT_PRIORITY, Style::bold),
    ("subhead", logchain::DEFAULT_PRIORITY, Style::bold),
    ("inform", logchain::DEFAULT_PRIORITY, gray),
    ("info", 5, Style::cyan),
    ("warn", 1, Style::yellow),
    ("error", 0, Style::red),
    ("success", logchain::DEFAULT_PRIORITY, Style::green),
];

/// Prepends `[debug]: ` to the first argument.
pub fn debug_prefix(value: Value) -> Value {
    match value {
        Value::Array(mut items) => {
            match items.first_mut() {
                Some(Value::String(first)) => first.insert_str(0, "[debug]: "),
                Some(other) => *other = Value::String(format!("[debug]: {other}")),
                None => items.push(Value::String("[debug]:".to_string())),
            }
            Value::Array(items)
        }
        Value::String(s) => Value::String(format!("[debug]: {s}")),
        other => Value::String(format!("[debug]: {other}")),
    }
}

pub fn install(logger: &Logger) -> Result<()> {
    install_with(logger, Styling::Auto)
}

/// Registers the `verbose`, `debug` and `not` modes and the coloured
/// emitters. `log` is replaced by a bold variant.
pub fn install_with(logger: &Logger, styling: Styling) -> Result<()> {
    logger
        .add_mode("verbose")?
        .add_mode_with("debug", ModeOptions::new().transform(debug_prefix))?
        .add_mode_with("not", ModeOptions::new().kind("toggle"))?;

    for (name, priority, build) in EMITTERS {
        let options = EmitterOptions::new()
            .priority(*priority)
            .transform_rc(styled(styling.apply(build(Style::new()))));
        logger.add_emitter_with(name, options)?;
    }
    tracing::debug!(emitters = EMITTERS.len(), "installed presets");
    Ok(())
}
