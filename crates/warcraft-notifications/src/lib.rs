//! Warcraft Notifications
//!
//! Event notification dispatcher for a development-tool host runtime.
//!
//! # Overview
//!
//! The host emits lifecycle events (session created, session error, file edited,
//! command executed). The dispatcher maps each event kind to an ordered list of
//! notification actions and runs them. Kinds with no entry are ignored, or routed
//! to an optional fallback action.
//!
//! # Architecture
//!
//! The system consists of five main components:
//!
//! 1. **Event Registry** (`registry`): Immutable kind → actions mapping
//! 2. **Dispatcher** (`dispatcher`): Routes events and owns the shutdown lifecycle
//! 3. **Actions** (`executor`): Log, command and sound actions plus the catalog
//! 4. **Configuration** (`config`): Loads, validates and presets configurations
//! 5. **Plugin** (`plugin`): The host-facing `load` / `event` boundary
//!
//! # Quick Start
//!
//! ```ignore
//! use warcraft_notifications::{ActionCatalog, Dispatcher, Event, EventEntry, NotificationConfig};
//!
//! let config = NotificationConfig {
//!     events: vec![EventEntry::new("session-error", ["playAlertSound", "logWarning"])],
//!     ..Default::default()
//! };
//!
//! let dispatcher = Dispatcher::initialize(config, catalog)?;
//! let result = dispatcher.dispatch(&Event::new("session-error")).await;
//! assert_eq!(result.success_count(), 2);
//!
//! dispatcher.shutdown().await;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration
//!
//! Configurations are YAML files (`.opencode/warcraft-notifications.yaml`):
//!
//! ```yaml
//! events:
//!   - kind: session.error
//!     actions: [playAlertSound, logWarning]
//! actions:
//!   playAlertSound:
//!     type: sound
//!     file: sounds/alert.wav
//!   logWarning:
//!     type: log
//!     level: warn
//!     message: "Session error in {{project}}"
//! ```
//!
//! # Variable Substitution
//!
//! Action messages and arguments accept `{{kind}}`, `{{project}}`, `{{worktree}}`,
//! `{{received_at}}`, `{{payload}}` and `{{payload.<path>}}`.
//!
//! # Error Handling
//!
//! Only configuration errors are returned to the caller. Action failures are
//! recorded in the [`DispatchResult`] and never stop the remaining actions.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod plugin;
pub mod registry;
pub mod types;

// Re-export public types
pub use cli::{NotifyCli, NotifyCommand};
pub use config::{ConfigLoader, ConfigSource, ConfigValidator, LoadedConfig, PresetManager};
pub use dispatcher::{Dispatcher, EventDispatcher, ShutdownReport};
pub use error::{NotifyError, Result};
pub use executor::{
    ActionCatalog, ActionContext, CommandAction, LogAction, MemorySink, MessageSink,
    NotificationAction, SoundAction, TracingSink,
};
pub use plugin::{
    HostEvent, HostEventInput, NotificationsPlugin, PluginContext, PluginHooks, Project,
};
pub use registry::{EventRegistry, RegisteredAction, RegistryEntry};
pub use types::{
    ActionDefinition, ActionResult, ActionStatus, CommandDefinition, DispatchOutcome,
    DispatchResult, Event, EventEntry, HostInfo, LogDefinition, LogLevel, NotificationConfig,
    Settings, SoundDefinition,
};
