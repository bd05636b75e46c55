//! Host plugin boundary
//!
//! The host runtime loads the plugin with a [`PluginContext`] and receives a set
//! of hooks back. Every host event is forwarded to [`PluginHooks::event`], which
//! routes it through the [`Dispatcher`].
//!
//! Host messages are JSON:
//!
//! ```json
//! {"event": {"type": "session.error", "properties": {"sessionID": "abc"}}}
//! ```

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::ConfigLoader,
    dispatcher::{Dispatcher, EventDispatcher, ShutdownReport},
    error::Result,
    executor::ActionCatalog,
    types::{DispatchResult, Event, HostInfo, NotificationConfig},
};

/// Project as described by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: String,
}

/// Context handed to the plugin when the host loads it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginContext {
    /// Current project
    pub project: Project,

    /// Worktree root
    pub worktree: PathBuf,
}

impl PluginContext {
    fn host_info(&self) -> HostInfo {
        HostInfo {
            project_id: self.project.id.clone(),
            worktree: self.worktree.display().to_string(),
        }
    }
}

/// Host event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEventInput {
    /// The event itself
    pub event: HostEvent,
}

/// An event as the host emits it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: String,

    /// Host-defined properties, passed through as the event payload
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl From<HostEvent> for Event {
    fn from(event: HostEvent) -> Self {
        Event::new(event.kind).with_payload(event.properties)
    }
}

/// Plugin entry point
pub struct NotificationsPlugin;

impl NotificationsPlugin {
    /// Load the plugin for a host session
    ///
    /// Configuration resolves from the worktree, then the user config, then the
    /// built-in preset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resolved configuration is invalid.
    pub fn load(ctx: PluginContext) -> Result<PluginHooks> {
        let loaded = ConfigLoader::load(&ctx.worktree)?;
        debug!(source = %loaded.source, "Resolved configuration");
        Self::load_with(ctx, loaded.config, ActionCatalog::new())
    }

    /// Load the plugin with an explicit configuration and action catalog
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate against `catalog`.
    pub fn load_with(
        ctx: PluginContext,
        config: NotificationConfig,
        catalog: ActionCatalog,
    ) -> Result<PluginHooks> {
        info!(
            project = %ctx.project.id,
            worktree = %ctx.worktree.display(),
            "Plugin initialized"
        );

        let dispatcher = Dispatcher::initialize(config, catalog)?.with_host(ctx.host_info());
        Ok(PluginHooks::new(Arc::new(dispatcher)))
    }
}

/// Hooks returned to the host
#[derive(Clone)]
pub struct PluginHooks {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl PluginHooks {
    /// Wrap a dispatcher
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handle one host event
    pub async fn event(&self, input: HostEventInput) -> DispatchResult {
        info!(event_kind = %input.event.kind, "Event received");
        let event = Event::from(input.event);
        self.dispatcher.dispatch(&event).await
    }

    /// Handle one host event given as a JSON message
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the message is not a host event envelope.
    pub async fn event_json(&self, message: &str) -> Result<DispatchResult> {
        let input: HostEventInput = serde_json::from_str(message)?;
        Ok(self.event(input).await)
    }

    /// Shut the dispatcher down
    pub async fn shutdown(&self) -> ShutdownReport {
        self.dispatcher.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{PresetManager, PROJECT_CONFIG_PATH},
        executor::MemorySink,
        types::{ActionDefinition, DispatchOutcome, EventEntry, LogDefinition, LogLevel},
    };

    fn context() -> PluginContext {
        PluginContext {
            project: Project {
                id: "proj-1".to_string(),
            },
            worktree: PathBuf::from("/work/tree"),
        }
    }

    fn echo_config() -> NotificationConfig {
        let mut config = NotificationConfig {
            events: vec![EventEntry::new("session.error", ["echo"])],
            ..Default::default()
        };
        config.actions.insert(
            "echo".to_string(),
            ActionDefinition::Log(LogDefinition {
                message: "{{kind}} {{project}} {{payload.sessionID}}".to_string(),
                level: LogLevel::Info,
            }),
        );
        config
    }

    #[test]
    fn test_host_event_deserializes_type_as_kind() {
        let input: HostEventInput = serde_json::from_str(
            r#"{"event": {"type": "file.edited", "properties": {"file": "a.rs"}}}"#,
        )
        .unwrap();

        assert_eq!(input.event.kind, "file.edited");
        assert_eq!(input.event.properties["file"], "a.rs");
    }

    #[test]
    fn test_host_event_properties_default() {
        let input: HostEventInput =
            serde_json::from_str(r#"{"event": {"type": "session.idle"}}"#).unwrap();
        assert!(input.event.properties.is_null());
    }

    #[tokio::test]
    async fn test_event_json_routes_by_type() {
        let sink = MemorySink::new();
        let hooks = NotificationsPlugin::load_with(
            context(),
            echo_config(),
            ActionCatalog::with_sink(Arc::new(sink.clone())),
        )
        .unwrap();

        let result = hooks
            .event_json(r#"{"event": {"type": "session.error", "properties": {"sessionID": "s9"}}}"#)
            .await
            .unwrap();

        assert_eq!(result.outcome, DispatchOutcome::Dispatched);
        assert_eq!(sink.texts(), vec!["session.error proj-1 s9".to_string()]);
    }

    #[tokio::test]
    async fn test_event_json_rejects_malformed_message() {
        let hooks =
            NotificationsPlugin::load_with(context(), echo_config(), ActionCatalog::new()).unwrap();

        assert!(hooks.event_json(r#"{"kind": "session.error"}"#).await.is_err());
    }

    #[tokio::test]
    async fn test_default_preset_ignores_unlisted_kinds() {
        let sink = MemorySink::new();
        let hooks = NotificationsPlugin::load_with(
            context(),
            PresetManager::default_preset(),
            ActionCatalog::with_sink(Arc::new(sink.clone())),
        )
        .unwrap();

        let result = hooks
            .event(HostEventInput {
                event: HostEvent {
                    kind: "tool.execute.after".to_string(),
                    properties: serde_json::Value::Null,
                },
            })
            .await;

        assert!(result.is_no_action());
        assert!(sink.messages().is_empty());
        hooks.shutdown().await;
    }

    #[tokio::test]
    async fn test_load_reads_project_config_from_worktree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "events: []\n").unwrap();
        let ctx = PluginContext {
            project: Project::default(),
            worktree: dir.path().to_path_buf(),
        };

        let hooks = NotificationsPlugin::load(ctx).unwrap();
        let result = hooks
            .event_json(r#"{"event": {"type": "session.created"}}"#)
            .await
            .unwrap();

        assert!(result.is_no_action());
    }
}
