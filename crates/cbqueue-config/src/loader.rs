//! Configuration loader with multi-source merging

use crate::{CbqueueConfig, ConfigError, Paths};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    /// Replaces the process environment when set.
    env_vars: Option<config::Map<String, String>>,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "CBQ".to_string(),
            env_vars: None,
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "CBQ")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Read the environment layer from `vars` instead of the process
    /// environment. Keys still need the configured prefix.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Skip ~/.config/cbqueue/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<CbqueueConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = CbqueueConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2-4. User, project and local files, each overriding the last
        for file in Paths::new().file_layers(&self.project_dir, self.include_user_config) {
            builder = builder.add_source(
                config::File::from(file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (CBQ_QUEUE__CAPACITY, CBQ_DEMO__PRODUCERS, ...)
        // Field names contain underscores, so sections are split on "__".
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(self.env_vars),
        );

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        let cbqueue_config: CbqueueConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        cbqueue_config.validate()?;

        Ok(cbqueue_config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default(self) -> CbqueueConfig {
        self.load().unwrap_or_default()
    }

    /// Load a single TOML file, bypassing the layered sources
    pub fn load_file(path: impl AsRef<Path>) -> Result<CbqueueConfig, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CbqueueConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
