//! Declarative logger setup.
//!
//! Modes and emitters carry no code unless a transform is attached, so most
//! of a logger's vocabulary can live in a YAML file:
//!
//! ```yaml
//! modes:
//!   - name: verbose
//!   - name: not
//!     type: toggle
//! emitters:
//!   - name: info
//!     priority: 5
//!   - name: error
//!     level: 0
//! enabled: [verbose]
//! ```
//!
//! `level` is accepted as an alias of `priority`. Styles need transforms and
//! are configured by the console crate's stylesheet instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{EmitterOptions, Mode, ModeOptions};
use crate::error::{LogError, Result};
use crate::flags::ModeFlags;
use crate::logger::Logger;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub name: Option<String>,
    #[serde(alias = "level")]
    pub priority: Option<i32>,
}

impl ModeConfig {
    fn options(&self) -> Result<(&str, ModeOptions)> {
        let name = self.name.as_deref().ok_or(LogError::MissingName)?;
        let mut options = ModeOptions::new();
        if let Some(kind) = &self.kind {
            options = options.kind(kind.as_str());
        }
        Ok((name, options))
    }
}

impl EmitterConfig {
    fn options(&self) -> Result<(&str, EmitterOptions)> {
        let name = self.name.as_deref().ok_or(LogError::MissingName)?;
        let mut options = EmitterOptions::new();
        if let Some(priority) = self.priority {
            options = options.priority(priority);
        }
        Ok((name, options))
    }
}

/// Modes, emitters and enabled flags for a logger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub modes: Vec<ModeConfig>,
    pub emitters: Vec<EmitterConfig>,
    pub enabled: Vec<String>,
}

impl LoggerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LogError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Registers every mode and emitter on `logger`, in file order.
    ///
    /// Every entry is checked before the first registration, so a bad entry
    /// leaves `logger` untouched.
    pub fn apply(&self, logger: &Logger) -> Result<()> {
        let modes = self
            .modes
            .iter()
            .map(ModeConfig::options)
            .collect::<Result<Vec<_>>>()?;
        let emitters = self
            .emitters
            .iter()
            .map(EmitterConfig::options)
            .collect::<Result<Vec<_>>>()?;
        for (name, options) in &modes {
            Mode::new(options.clone().name(*name))?;
        }

        for (name, options) in modes {
            logger.add_mode_with(name, options)?;
        }
        for (name, options) in emitters {
            logger.add_emitter_with(name, options)?;
        }
        tracing::debug!(
            modes = self.modes.len(),
            emitters = self.emitters.len(),
            "applied logger config"
        );
        Ok(())
    }

    /// The `enabled` list as mode flags.
    pub fn flags(&self) -> ModeFlags {
        self.enabled.iter().cloned().collect()
    }
}

impl Logger {
    /// Builds a logger (with the default `log` emitter) from a config.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let logger = Logger::new();
        config.apply(&logger)?;
        Ok(logger)
    }
}
