//! Name → action resolution

use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::debug;

use super::{
    runner::{CommandAction, LogAction, SoundAction},
    sink::{MessageSink, TracingSink},
    NotificationAction,
};
use crate::{
    error::{NotifyError, Result},
    types::{ActionDefinition, Settings},
};

/// Catalog of runnable actions keyed by identifier
///
/// Holds actions registered in code plus actions built from configuration
/// definitions. Log actions built here write to the catalog's message sink.
#[derive(Clone)]
pub struct ActionCatalog {
    actions: BTreeMap<String, Arc<dyn NotificationAction>>,
    sink: Arc<dyn MessageSink>,
}

impl ActionCatalog {
    /// Create an empty catalog writing messages to `tracing`
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink::new()))
    }

    /// Create an empty catalog writing messages to `sink`
    pub fn with_sink(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            actions: BTreeMap::new(),
            sink,
        }
    }

    /// Register an action under `name`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name is empty or already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        action: Arc<dyn NotificationAction>,
    ) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NotifyError::configuration("Action name cannot be empty"));
        }
        if self.actions.contains_key(&name) {
            return Err(NotifyError::configuration(format!(
                "Action '{}' is defined more than once",
                name
            )));
        }

        debug!(action = %name, "Registered action");
        self.actions.insert(name, action);
        Ok(())
    }

    /// Build and register actions from configuration definitions
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a definition name collides with an
    /// action already in the catalog.
    pub fn add_definitions(
        &mut self,
        definitions: &BTreeMap<String, ActionDefinition>,
        settings: &Settings,
    ) -> Result<()> {
        for (name, definition) in definitions {
            let action = self.build(name, definition, settings);
            self.register(name.clone(), action)?;
        }
        Ok(())
    }

    fn build(
        &self,
        name: &str,
        definition: &ActionDefinition,
        settings: &Settings,
    ) -> Arc<dyn NotificationAction> {
        match definition {
            ActionDefinition::Log(def) => Arc::new(LogAction::new(name, def, self.sink.clone())),
            ActionDefinition::Command(def) => Arc::new(CommandAction::new(name, def)),
            ActionDefinition::Sound(def) => Arc::new(SoundAction::new(name, def, settings)),
        }
    }

    /// Look up an action by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn NotificationAction>> {
        self.actions.get(name).cloned()
    }

    /// Whether an action is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered action names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCatalog")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
