//! Configuration loader
//!
//! Loads the dispatcher configuration from YAML, following a hierarchy:
//! Explicit path → Project → User → Built-in preset.
//!
//! A file that does not exist is skipped. A file that exists but cannot be read
//! or parsed is a configuration error, so a typo never silently falls through to
//! a different configuration.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::templates::PresetManager;
use crate::error::{NotifyError, Result};
use crate::types::NotificationConfig;

/// Project configuration path, relative to the worktree
pub const PROJECT_CONFIG_PATH: &str = ".opencode/warcraft-notifications.yaml";

/// Environment variable overriding the user configuration directory
pub const HOME_ENV: &str = "WARCRAFT_NOTIFICATIONS_HOME";

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A path given explicitly by the caller
    Explicit(PathBuf),

    /// The worktree's project configuration
    Project(PathBuf),

    /// The user's configuration
    User(PathBuf),

    /// The built-in preset
    BuiltIn,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "explicit ({})", path.display()),
            ConfigSource::Project(path) => write!(f, "project ({})", path.display()),
            ConfigSource::User(path) => write!(f, "user ({})", path.display()),
            ConfigSource::BuiltIn => write!(f, "built-in"),
        }
    }
}

/// A configuration together with its source
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed configuration
    pub config: NotificationConfig,

    /// Where it came from
    pub source: ConfigSource,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the configuration for a worktree
    ///
    /// Tries, in order:
    /// 1. Project configuration (`<worktree>/.opencode/warcraft-notifications.yaml`)
    /// 2. User configuration (`<config dir>/warcraft-notifications/config.yaml`)
    /// 3. The built-in `warcraft` preset
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but is unreadable or invalid YAML.
    pub fn load(worktree: &Path) -> Result<LoadedConfig> {
        let project_path = worktree.join(PROJECT_CONFIG_PATH);
        if let Some(config) = Self::load_if_exists(&project_path)? {
            info!(path = %project_path.display(), "Loaded project configuration");
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::Project(project_path),
            });
        }

        if let Some(user_path) = Self::user_config_path() {
            if let Some(config) = Self::load_if_exists(&user_path)? {
                info!(path = %user_path.display(), "Loaded user configuration");
                return Ok(LoadedConfig {
                    config,
                    source: ConfigSource::User(user_path),
                });
            }
        }

        debug!("No configuration file found, using built-in preset");
        Ok(LoadedConfig {
            config: PresetManager::default_preset(),
            source: ConfigSource::BuiltIn,
        })
    }

    /// Load a configuration from an explicit path
    ///
    /// # Errors
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is an error here.
    pub fn load_explicit(path: &Path) -> Result<LoadedConfig> {
        let config = Self::load_from_path(path)?;
        Ok(LoadedConfig {
            config,
            source: ConfigSource::Explicit(path.to_path_buf()),
        })
    }

    /// User configuration path
    ///
    /// `$WARCRAFT_NOTIFICATIONS_HOME/config.yaml` when the variable is set,
    /// otherwise `<platform config dir>/warcraft-notifications/config.yaml`.
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.is_empty() {
                return Some(PathBuf::from(home).join("config.yaml"));
            }
        }

        dirs::config_dir().map(|dir| dir.join("warcraft-notifications").join("config.yaml"))
    }

    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<NotificationConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            NotifyError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_yaml(&content).map_err(|e| match e {
            NotifyError::Configuration(msg) => {
                NotifyError::configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    fn load_if_exists(path: &Path) -> Result<Option<NotificationConfig>> {
        if !path.exists() {
            debug!(path = %path.display(), "Configuration file not found");
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Parse YAML configuration content
    ///
    /// An empty document is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid YAML or unknown action types.
    pub fn parse_yaml(content: &str) -> Result<NotificationConfig> {
        if content.trim().is_empty() {
            return Ok(NotificationConfig::default());
        }

        serde_yaml::from_str(content)
            .map_err(|e| NotifyError::configuration(format!("Invalid YAML: {}", e)))
    }
}
