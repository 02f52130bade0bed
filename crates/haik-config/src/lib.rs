//! Configuration management for haik.
//!
//! Parses `haik.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [markdown]
//! hard_wrap = false
//! code_class_prefix = "language-"
//! gfm = true
//!
//! [plugins]
//! param_separator = "---"
//! max_depth = 10
//! disabled = ["section"]
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override soft line break handling.
    pub hard_wrap: Option<bool>,
    /// Override the fenced code class prefix.
    pub code_class_prefix: Option<String>,
    /// Override the plugin nesting limit.
    pub max_depth: Option<usize>,
    /// Plugins to disable in addition to those in the file.
    pub disabled_plugins: Vec<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "haik.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base markdown rendering.
    pub markdown: MarkdownConfig,
    /// Plugin invocation settings.
    pub plugins: PluginsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Base markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Render soft line breaks as `<br>`.
    pub hard_wrap: bool,
    /// Prefix for the class of fenced code blocks.
    pub code_class_prefix: String,
    /// GitHub-flavoured extensions (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            hard_wrap: false,
            code_class_prefix: String::new(),
            gfm: true,
        }
    }
}

/// Plugin invocation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Line separating a block body from its parameter section.
    pub param_separator: String,
    /// How deep plugins may render nested markdown.
    pub max_depth: usize,
    /// Plugin ids that are not registered.
    pub disabled: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            param_separator: "---".to_owned(),
            max_depth: 10,
            disabled: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `haik.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and take precedence over
    /// config file values. The merged configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(hard_wrap) = settings.hard_wrap {
            self.markdown.hard_wrap = hard_wrap;
        }
        if let Some(prefix) = &settings.code_class_prefix {
            self.markdown.code_class_prefix.clone_from(prefix);
        }
        if let Some(max_depth) = settings.max_depth {
            self.plugins.max_depth = max_depth;
        }
        for id in &settings.disabled_plugins {
            if !self.plugins.disabled.contains(id) {
                self.plugins.disabled.push(id.clone());
            }
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugins.param_separator.trim().is_empty() {
            return Err(ConfigError::Validation(
                "plugins.param_separator cannot be empty".to_owned(),
            ));
        }
        if self.plugins.param_separator.contains('\n') {
            return Err(ConfigError::Validation(
                "plugins.param_separator must be a single line".to_owned(),
            ));
        }
        if self.plugins.max_depth == 0 {
            return Err(ConfigError::Validation(
                "plugins.max_depth must be greater than 0".to_owned(),
            ));
        }
        if self.plugins.disabled.iter().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "plugins.disabled cannot contain empty ids".to_owned(),
            ));
        }
        Ok(())
    }
}
