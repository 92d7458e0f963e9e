//! Console-backed style transforms.
//!
//! Styles in logchain are plain `Value -> Value` functions. The ones here wrap
//! a [`console::Style`] and apply it to every string inside the value, so they
//! work on a single message as well as on an argument array. Non-string
//! values pass through untouched.

use std::rc::Rc;

use console::Style;
use logchain::{Logger, Result, Transform};
use serde_json::Value;

/// Whether ANSI codes are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Styling {
    /// Let `console` decide from the terminal and environment.
    #[default]
    Auto,
    /// Always emit ANSI codes.
    Always,
    /// Never emit ANSI codes.
    Never,
}

impl Styling {
    pub fn apply(self, style: Style) -> Style {
        match self {
            Styling::Auto => style,
            Styling::Always => style.force_styling(true),
            Styling::Never => style.force_styling(false),
        }
    }
}

pub(crate) fn gray(style: Style) -> Style {
    style.black().bright()
}

/// Built-in styles: name and how to derive them from an empty style.
pub const PALETTE: &[(&str, fn(Style) -> Style)] = &[
    ("black", Style::black),
    ("red", Style::red),
    ("green", Style::green),
    ("yellow", Style::yellow),
    ("blue", Style::blue),
    ("magenta", Style::magenta),
    ("cyan", Style::cyan),
    ("white", Style::white),
    ("gray", gray),
    ("bold", Style::bold),
    ("dim", Style::dim),
    ("italic", Style::italic),
    ("underline", Style::underlined),
    ("inverse", Style::reverse),
    ("strikethrough", Style::strikethrough),
    ("bg_black", Style::on_black),
    ("bg_red", Style::on_red),
    ("bg_green", Style::on_green),
    ("bg_yellow", Style::on_yellow),
    ("bg_blue", Style::on_blue),
    ("bg_magenta", Style::on_magenta),
    ("bg_cyan", Style::on_cyan),
    ("bg_white", Style::on_white),
];

/// Applies `f` to every string in `value`, recursing into arrays.
pub fn map_strings<F>(value: Value, f: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_strings(v, f)).collect()),
        other => other,
    }
}

/// Wraps a console style as a logchain transform.
pub fn styled(style: Style) -> Transform {
    Rc::new(move |value| map_strings(value, &|s: &str| style.apply_to(s).to_string()))
}

/// Looks up a built-in style by name.
pub fn lookup(name: &str) -> Option<Style> {
    PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, build)| build(Style::new()))
}

/// Registers every built-in style on `logger`.
pub fn install(logger: &Logger) -> Result<()> {
    install_with(logger, Styling::Auto)
}

pub fn install_with(logger: &Logger, styling: Styling) -> Result<()> {
    for (name, build) in PALETTE {
        let transform = styled(styling.apply(build(Style::new())));
        logger.insert_style(logchain::Style::from_transform(*name, transform)?);
    }
    tracing::debug!(count = PALETTE.len(), ?styling, "installed console palette");
    Ok(())
}
