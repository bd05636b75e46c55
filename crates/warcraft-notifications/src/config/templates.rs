//! Built-in configuration presets
//!
//! Presets are complete configurations used when no configuration file is
//! found, or when one is requested by name. The `warcraft` preset announces the
//! four lifecycle events the host emits most often and stays silent for
//! everything else.

use std::collections::BTreeMap;

use crate::error::{NotifyError, Result};
use crate::types::{
    ActionDefinition, EventEntry, LogDefinition, LogLevel, NotificationConfig,
};

/// Name of the preset used when nothing else is configured
pub const DEFAULT_PRESET: &str = "warcraft";

/// Preset manager for built-in configurations
pub struct PresetManager;

impl PresetManager {
    /// All built-in presets keyed by name
    pub fn get_builtin_presets() -> BTreeMap<&'static str, NotificationConfig> {
        let mut presets = BTreeMap::new();
        presets.insert(DEFAULT_PRESET, Self::create_warcraft_preset());
        presets.insert("silent", NotificationConfig::default());
        presets
    }

    /// Look up a preset by name
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the available presets if `name` is unknown.
    pub fn get_preset(name: &str) -> Result<NotificationConfig> {
        let mut presets = Self::get_builtin_presets();
        presets.remove(name).ok_or_else(|| {
            let available = Self::get_builtin_presets()
                .keys()
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            NotifyError::configuration(format!(
                "Unknown preset '{}' (available: {})",
                name, available
            ))
        })
    }

    /// The default preset
    pub fn default_preset() -> NotificationConfig {
        Self::create_warcraft_preset()
    }

    /// Create the warcraft preset
    ///
    /// One log action per lifecycle event.
    fn create_warcraft_preset() -> NotificationConfig {
        let routes = [
            (
                "session.created",
                "announceSessionCreated",
                "🎮 New session started - Ready for battle!",
                LogLevel::Info,
            ),
            (
                "session.error",
                "announceSessionError",
                "⚠️ Session error - Something needs attention!",
                LogLevel::Warn,
            ),
            (
                "file.edited",
                "announceFileEdited",
                "✏️ File edited - Progress made!",
                LogLevel::Info,
            ),
            (
                "command.executed",
                "announceCommandExecuted",
                "⚡ Command executed - Work complete!",
                LogLevel::Info,
            ),
        ];

        let mut config = NotificationConfig::default();

        for (kind, action, message, level) in routes {
            config.events.push(EventEntry::new(kind, [action]));
            config.actions.insert(
                action.to_string(),
                ActionDefinition::Log(LogDefinition {
                    message: message.to_string(),
                    level,
                }),
            );
        }

        config
    }
}
