//! Event registry: the immutable kind → actions mapping
//!
//! The registry is built once from a validated configuration and never changes
//! afterwards. Lookups for unknown kinds yield an empty action list, not an error.
//!
//! # Examples
//!
//! ```ignore
//! use warcraft_notifications::{registry::EventRegistry, ActionCatalog, NotificationConfig};
//!
//! let registry = EventRegistry::build(&config, &catalog)?;
//! for registered in registry.actions_for("session.error") {
//!     println!("{}", registered.name);
//! }
//! assert!(registry.actions_for("unknown.kind").is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use serde::Serialize;

use crate::{
    error::{NotifyError, Result},
    executor::{ActionCatalog, NotificationAction},
    types::NotificationConfig,
};

/// An action bound into the registry under its configured name
#[derive(Clone)]
pub struct RegisteredAction {
    /// Action identifier from the configuration
    pub name: String,

    /// The runnable action
    pub action: Arc<dyn NotificationAction>,
}

impl fmt::Debug for RegisteredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAction")
            .field("name", &self.name)
            .finish()
    }
}

/// Listing view of one registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// Event kind
    pub kind: String,

    /// Action identifiers in execution order
    pub actions: Vec<String>,
}

/// Immutable mapping from event kind to ordered actions
#[derive(Debug, Default)]
pub struct EventRegistry {
    routes: HashMap<String, Vec<RegisteredAction>>,
    kinds: Vec<String>,
    fallback: Option<RegisteredAction>,
}

impl EventRegistry {
    /// Build a registry from a configuration, resolving action names in `catalog`
    ///
    /// The configuration is expected to have been validated; this still refuses
    /// malformed entries, duplicate kinds and unresolved names rather than
    /// building a partial registry.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on the first entry that cannot be bound.
    pub fn build(config: &NotificationConfig, catalog: &ActionCatalog) -> Result<Self> {
        let resolve = |name: &str| -> Result<RegisteredAction> {
            catalog
                .get(name)
                .map(|action| RegisteredAction {
                    name: name.to_string(),
                    action,
                })
                .ok_or_else(|| {
                    NotifyError::configuration(format!("Action '{}' does not resolve", name))
                })
        };

        let mut registry = EventRegistry::default();

        for entry in &config.events {
            let kind = entry
                .kind
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| NotifyError::configuration("Entry is missing 'kind'"))?;
            let names = entry
                .actions
                .as_ref()
                .filter(|a| !a.is_empty())
                .ok_or_else(|| {
                    NotifyError::configuration(format!("Entry '{}' is missing 'actions'", kind))
                })?;

            if registry.routes.contains_key(kind) {
                return Err(NotifyError::configuration(format!(
                    "Duplicate entry for kind '{}'",
                    kind
                )));
            }

            let actions = names
                .iter()
                .map(|name| resolve(name.as_str()))
                .collect::<Result<Vec<_>>>()?;

            registry.kinds.push(kind.to_string());
            registry.routes.insert(kind.to_string(), actions);
        }

        registry.fallback = config
            .on_unmatched
            .as_deref()
            .map(resolve)
            .transpose()?;

        Ok(registry)
    }

    /// Actions for `kind` in registration order; empty for unknown kinds
    pub fn actions_for(&self, kind: &str) -> &[RegisteredAction] {
        self.routes.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fallback action for unmatched kinds, if configured
    pub fn fallback(&self) -> Option<&RegisteredAction> {
        self.fallback.as_ref()
    }

    /// Whether `kind` has an entry
    pub fn contains(&self, kind: &str) -> bool {
        self.routes.contains_key(kind)
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    /// Entries in declaration order, for display
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.kinds
            .iter()
            .map(|kind| RegistryEntry {
                kind: kind.clone(),
                actions: self
                    .actions_for(kind)
                    .iter()
                    .map(|a| a.name.clone())
                    .collect(),
            })
            .collect()
    }

    /// Every distinct action bound in the registry, including the fallback
    ///
    /// Actions referenced by several kinds appear once.
    pub fn unique_actions(&self) -> Vec<RegisteredAction> {
        let mut seen = HashSet::new();
        self.kinds
            .iter()
            .flat_map(|kind| self.actions_for(kind).iter())
            .chain(self.fallback.iter())
            .filter(|registered| seen.insert(registered.name.clone()))
            .cloned()
            .collect()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kind is registered
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
