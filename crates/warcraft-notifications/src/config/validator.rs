//! Configuration validation
//!
//! Validates a [`NotificationConfig`] before a registry is built from it, so that
//! every configuration problem surfaces from `initialize` and never from dispatch.

use std::collections::HashSet;

use crate::error::{NotifyError, Result};
use crate::types::{
    ActionDefinition, CommandDefinition, LogDefinition, NotificationConfig, Settings,
    SoundDefinition,
};

/// Configuration validator
///
/// Validates that:
/// - Every entry has a non-empty kind and a non-empty action list
/// - No kind appears twice
/// - Every action reference resolves
/// - Action definitions are well-formed
/// - Settings are in range
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration on its own
    ///
    /// Action references must resolve against the configuration's own
    /// `actions` table.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    pub fn validate(config: &NotificationConfig) -> Result<()> {
        Self::validate_with(config, |_| false)
    }

    /// Validate a configuration, treating names accepted by `is_external` as
    /// resolvable in addition to the configuration's own definitions
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    pub fn validate_with(
        config: &NotificationConfig,
        is_external: impl Fn(&str) -> bool,
    ) -> Result<()> {
        Self::validate_settings(&config.settings)?;

        for (name, definition) in &config.actions {
            Self::validate_action(name, definition)?;
        }

        let resolves = |name: &str| config.actions.contains_key(name) || is_external(name);

        let mut seen = HashSet::new();
        for (index, entry) in config.events.iter().enumerate() {
            let kind = entry.kind.as_deref().ok_or_else(|| {
                NotifyError::configuration(format!("Entry #{} is missing 'kind'", index + 1))
            })?;
            Self::validate_kind(index, kind)?;

            let actions = entry.actions.as_ref().ok_or_else(|| {
                NotifyError::configuration(format!(
                    "Entry '{}' is missing 'actions'",
                    kind
                ))
            })?;
            if actions.is_empty() {
                return Err(NotifyError::configuration(format!(
                    "Entry '{}' must list at least one action",
                    kind
                )));
            }

            if !seen.insert(kind) {
                return Err(NotifyError::configuration(format!(
                    "Duplicate entry for kind '{}'",
                    kind
                )));
            }

            for action in actions {
                if action.trim().is_empty() {
                    return Err(NotifyError::configuration(format!(
                        "Entry '{}' contains an empty action reference",
                        kind
                    )));
                }
                if !resolves(action) {
                    return Err(NotifyError::configuration(format!(
                        "Entry '{}' references unknown action '{}'",
                        kind, action
                    )));
                }
            }
        }

        if let Some(fallback) = &config.on_unmatched {
            if !resolves(fallback) {
                return Err(NotifyError::configuration(format!(
                    "on_unmatched references unknown action '{}'",
                    fallback
                )));
            }
        }

        Ok(())
    }

    /// Kinds are free-form host strings but must be non-empty and free of whitespace
    fn validate_kind(index: usize, kind: &str) -> Result<()> {
        if kind.is_empty() {
            return Err(NotifyError::configuration(format!(
                "Entry #{} has an empty 'kind'",
                index + 1
            )));
        }
        if kind.chars().any(char::is_whitespace) {
            return Err(NotifyError::configuration(format!(
                "Invalid event kind '{}': kinds cannot contain whitespace",
                kind
            )));
        }
        Ok(())
    }

    fn validate_settings(settings: &Settings) -> Result<()> {
        if settings.action_timeout_ms == 0 {
            return Err(NotifyError::configuration(
                "settings.action_timeout_ms must be greater than 0",
            ));
        }
        if settings.shutdown_timeout_ms == 0 {
            return Err(NotifyError::configuration(
                "settings.shutdown_timeout_ms must be greater than 0",
            ));
        }
        if let Some(player) = &settings.sound_player {
            if player.trim().is_empty() {
                return Err(NotifyError::configuration(
                    "settings.sound_player cannot be empty",
                ));
            }
        }
        Ok(())
    }

    fn validate_action(name: &str, definition: &ActionDefinition) -> Result<()> {
        if name.trim().is_empty() {
            return Err(NotifyError::configuration("Action name cannot be empty"));
        }

        match definition {
            ActionDefinition::Log(def) => Self::validate_log_action(name, def),
            ActionDefinition::Command(def) => Self::validate_command_action(name, def),
            ActionDefinition::Sound(def) => Self::validate_sound_action(name, def),
        }
    }

    fn validate_log_action(name: &str, def: &LogDefinition) -> Result<()> {
        if def.message.is_empty() {
            return Err(NotifyError::configuration(format!(
                "Log action '{}': message cannot be empty",
                name
            )));
        }
        Ok(())
    }

    fn validate_command_action(name: &str, def: &CommandDefinition) -> Result<()> {
        if def.command.trim().is_empty() {
            return Err(NotifyError::configuration(format!(
                "Command action '{}': command cannot be empty",
                name
            )));
        }
        if def.timeout_ms == Some(0) {
            return Err(NotifyError::configuration(format!(
                "Command action '{}': timeout must be greater than 0",
                name
            )));
        }
        Ok(())
    }

    fn validate_sound_action(name: &str, def: &SoundDefinition) -> Result<()> {
        if def.file.trim().is_empty() {
            return Err(NotifyError::configuration(format!(
                "Sound action '{}': file cannot be empty",
                name
            )));
        }
        if let Some(player) = &def.player {
            if player.trim().is_empty() {
                return Err(NotifyError::configuration(format!(
                    "Sound action '{}': player cannot be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}
