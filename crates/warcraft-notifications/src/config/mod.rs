//! Configuration loading and validation
//!
//! Configuration resolves through a hierarchy: Explicit → Project → User →
//! Built-in preset. Files are YAML; see [`NotificationConfig`](crate::NotificationConfig)
//! for the format.

pub mod loader;
pub mod templates;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource, LoadedConfig, HOME_ENV, PROJECT_CONFIG_PATH};
pub use templates::{PresetManager, DEFAULT_PRESET};
pub use validator::ConfigValidator;
