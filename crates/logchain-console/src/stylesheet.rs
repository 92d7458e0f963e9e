//! YAML stylesheets.
//!
//! A stylesheet maps style names to dotted console style strings:
//!
//! ```yaml
//! title: cyan.bold
//! muted: black.bright
//! alert: white.on_red
//! ```
//!
//! Every part of a dotted string is validated before anything is registered,
//! since `console::Style::from_dotted_str` silently ignores unknown parts.

use std::path::{Path, PathBuf};

use console::Style;
use indexmap::IndexMap;
use logchain::{LogError, Logger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::{styled, Styling};

const COLORS: &[&str] = &[
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

const ATTRIBUTES: &[&str] = &[
    "bright",
    "on_bright",
    "bold",
    "dim",
    "italic",
    "underlined",
    "blink",
    "blink_fast",
    "reverse",
    "hidden",
    "strikethrough",
];

#[derive(Debug, Error)]
pub enum StyleSheetError {
    #[error("failed to parse stylesheet{}: {message}", display_path(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("style \"{style}\" has unknown attribute \"{attribute}\"")]
    UnknownAttribute { style: String, attribute: String },

    #[error("style \"{style}\" is empty")]
    Empty { style: String },

    #[error("failed to read stylesheet: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Register(#[from] LogError),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

fn is_known_part(part: &str) -> bool {
    let color = part.strip_prefix("on_").unwrap_or(part);
    COLORS.contains(&color) || ATTRIBUTES.contains(&part) || color.parse::<u8>().is_ok()
}

/// Named console styles, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    styles: IndexMap<String, String>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a style definition.
    pub fn define(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.styles.insert(name.into(), spec.into());
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, StyleSheetError> {
        Self::parse(yaml, None)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleSheetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, Some(path.to_path_buf()))
    }

    fn parse(yaml: &str, path: Option<PathBuf>) -> Result<Self, StyleSheetError> {
        let sheet: StyleSheet = serde_yaml::from_str(yaml).map_err(|e| StyleSheetError::Parse {
            path,
            message: e.to_string(),
        })?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Checks every dotted part of every definition.
    pub fn validate(&self) -> Result<(), StyleSheetError> {
        for (name, spec) in &self.styles {
            let parts: Vec<&str> = spec.split('.').filter(|p| !p.is_empty()).collect();
            if parts.is_empty() {
                return Err(StyleSheetError::Empty { style: name.clone() });
            }
            if let Some(bad) = parts.iter().find(|p| !is_known_part(p)) {
                return Err(StyleSheetError::UnknownAttribute {
                    style: name.clone(),
                    attribute: bad.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<Style> {
        self.styles.get(name).map(|spec| Style::from_dotted_str(spec))
    }

    pub fn install(&self, logger: &Logger) -> Result<(), StyleSheetError> {
        self.install_with(logger, Styling::Auto)
    }

    /// Registers each style on `logger`, replacing same-named styles.
    pub fn install_with(&self, logger: &Logger, styling: Styling) -> Result<(), StyleSheetError> {
        self.validate()?;
        for (name, spec) in &self.styles {
            let style = styling.apply(Style::from_dotted_str(spec));
            logger.insert_style(logchain::Style::from_transform(name.as_str(), styled(style))?);
        }
        tracing::debug!(count = self.styles.len(), "installed stylesheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const YAML: &str = "title: cyan.bold\nmuted: black.bright\nalert: white.on_red\npick: '208'\n";

    #[test]
    fn test_from_yaml_keeps_order() {
        let sheet = StyleSheet::from_yaml(YAML).unwrap();
        assert_eq!(
            sheet.names().collect::<Vec<_>>(),
            vec!["title", "muted", "alert", "pick"]
        );
        assert!(sheet.get("title").is_some());
        assert!(sheet.get("nope").is_none());
    }

    #[test]
    fn test_unknown_attribute() {
        let err = StyleSheet::from_yaml("title: cyan.sparkly\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "style \"title\" has unknown attribute \"sparkly\""
        );
    }

    #[test]
    fn test_empty_definition() {
        let err = StyleSheet::new().define("blank", "").validate().unwrap_err();
        assert!(matches!(err, StyleSheetError::Empty { .. }));
    }

    #[test]
    fn test_parse_error_mentions_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"title: [unclosed\n").unwrap();
        let err = StyleSheet::from_file(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to parse stylesheet "));
        assert!(message.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = StyleSheet::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, StyleSheetError::Io(_)));
    }

    #[test]
    fn test_install_forced() {
        let logger = Logger::new();
        StyleSheet::from_yaml(YAML)
            .unwrap()
            .install_with(&logger, Styling::Always)
            .unwrap();

        assert_eq!(logger.style_names(), vec!["title", "muted", "alert", "pick"]);
        let out = logger.apply_style("title", json!("hello")).unwrap();
        let text = out.as_str().unwrap();
        assert_ne!(text, "hello");
        assert_eq!(console::strip_ansi_codes(text), "hello");
    }
}
