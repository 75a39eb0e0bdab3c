//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file passed with `--config` (TOML, YAML or JSON by extension)
//! 3. Environment variables: `NIGHTINGALE_*` prefix

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::TreeOptions;

/// Settings for trees built by the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Whether imported items keep parent links in sync (clones always do)
    pub observe_children: bool,
    /// Whether deep clones copy the extension property bag
    pub clone_properties: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        let options = TreeOptions::default();
        Self {
            observe_children: options.observe_children,
            clone_properties: options.clone_properties,
        }
    }
}

impl From<&TreeSettings> for TreeOptions {
    fn from(settings: &TreeSettings) -> Self {
        Self {
            observe_children: settings.observe_children,
            clone_properties: settings.clone_properties,
        }
    }
}

impl TreeSettings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional settings file; it must exist when given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("observe_children", defaults.observe_children)
            .map_err(config_err)?
            .set_default("clone_properties", defaults.clone_properties)
            .map_err(config_err)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("NIGHTINGALE")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions::from(self)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
