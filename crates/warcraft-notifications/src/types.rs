//! Core data types for the notification dispatcher
//!
//! This module defines events, the configuration model that maps event kinds to
//! named actions, and the per-event dispatch results.
//!
//! # Examples
//!
//! A configuration routing session errors to two actions:
//!
//! ```ignore
//! use warcraft_notifications::*;
//!
//! let config = NotificationConfig {
//!     events: vec![EventEntry::new(
//!         "session.error",
//!         ["playAlertSound", "logWarning"],
//!     )],
//!     ..Default::default()
//! };
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An event emitted by the host runtime
///
/// Events are immutable once created. The payload is host-defined and is never
/// interpreted by the dispatcher, only exposed to placeholder substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind (e.g., "session.created", "file.edited")
    pub kind: String,

    /// Opaque host payload
    #[serde(default)]
    pub payload: serde_json::Value,

    /// When the event was received (RFC 3339)
    pub received_at: String,
}

impl Event {
    /// Create an event with an empty payload, stamped with the current time
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: serde_json::Value::Null,
            received_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach a payload to the event
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Identity of the host session the dispatcher serves
///
/// Exposed to actions as `{{project}}` and `{{worktree}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Project identifier supplied by the host
    pub project_id: String,

    /// Worktree path supplied by the host
    pub worktree: String,
}

/// Dispatcher configuration
///
/// Maps event kinds to ordered lists of action identifiers. Action identifiers
/// resolve against `actions` and against actions registered in code on the
/// [`ActionCatalog`](crate::executor::ActionCatalog).
///
/// Expected YAML format:
///
/// ```yaml
/// events:
///   - kind: session.error
///     actions: [playAlertSound, logWarning]
/// on_unmatched: null
/// actions:
///   playAlertSound:
///     type: sound
///     file: sounds/alert.wav
///   logWarning:
///     type: log
///     level: warn
///     message: "Session error - Something needs attention!"
/// settings:
///   action_timeout_ms: 10000
///   shutdown_timeout_ms: 2000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Event routing entries, in declaration order
    #[serde(default)]
    pub events: Vec<EventEntry>,

    /// Optional fallback action for kinds with no entry
    #[serde(default)]
    pub on_unmatched: Option<String>,

    /// Named action definitions
    #[serde(default)]
    pub actions: BTreeMap<String, ActionDefinition>,

    /// Runtime settings
    #[serde(default)]
    pub settings: Settings,
}

/// One routing entry: an event kind and the actions it triggers
///
/// Both fields are optional at the serde level so that a malformed entry is
/// reported as a configuration error naming the entry, not as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Event kind this entry matches
    #[serde(default)]
    pub kind: Option<String>,

    /// Ordered action identifiers
    #[serde(default)]
    pub actions: Option<Vec<String>>,
}

impl EventEntry {
    /// Create a well-formed entry
    pub fn new<I, S>(kind: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: Some(kind.into()),
            actions: Some(actions.into_iter().map(Into::into).collect()),
        }
    }
}

/// Definition of a named action in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionDefinition {
    /// Emit a message through the message sink
    #[serde(rename = "log")]
    Log(LogDefinition),

    /// Spawn an external command
    #[serde(rename = "command")]
    Command(CommandDefinition),

    /// Play a sound file through an external player
    #[serde(rename = "sound")]
    Sound(SoundDefinition),
}

impl ActionDefinition {
    /// Short label for the action type
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionDefinition::Log(_) => "log",
            ActionDefinition::Command(_) => "command",
            ActionDefinition::Sound(_) => "sound",
        }
    }
}

/// Log action configuration
///
/// The message supports `{{kind}}`, `{{project}}`, `{{worktree}}` and
/// `{{payload.<key>}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDefinition {
    /// Message template
    pub message: String,

    /// Severity of the message
    #[serde(default)]
    pub level: LogLevel,
}

/// Command action configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Command to execute
    pub command: String,

    /// Command arguments (supports placeholders)
    #[serde(default)]
    pub args: Vec<String>,

    /// Optional timeout in milliseconds, replaces `settings.action_timeout_ms` for this action
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Sound action configuration
///
/// No audio is decoded in-process; the file is handed to a player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundDefinition {
    /// Path to the sound file
    pub file: String,

    /// Player command, defaults to `settings.sound_player` or the platform player
    #[serde(default)]
    pub player: Option<String>,

    /// Extra player arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,
}

/// Message severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Per-action timeout in milliseconds
    #[serde(default = "default_action_timeout_ms")]
    pub action_timeout_ms: u64,

    /// Shutdown grace period in milliseconds
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,

    /// Default player command for sound actions
    #[serde(default)]
    pub sound_player: Option<String>,
}

fn default_action_timeout_ms() -> u64 {
    10_000
}

fn default_shutdown_timeout_ms() -> u64 {
    2_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            action_timeout_ms: default_action_timeout_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            sound_player: None,
        }
    }
}

/// Result of dispatching a single event
///
/// # Examples
///
/// ```ignore
/// DispatchResult {
///     event_kind: "session.error".to_string(),
///     outcome: DispatchOutcome::Dispatched,
///     actions: vec![/* one ActionResult per action */],
///     duration_ms: 3,
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Kind of the dispatched event
    pub event_kind: String,

    /// What the dispatcher did with the event
    pub outcome: DispatchOutcome,

    /// Per-action results, in execution order
    pub actions: Vec<ActionResult>,

    /// Total dispatch duration in milliseconds
    pub duration_ms: u64,
}

impl DispatchResult {
    /// Result for an event that triggered nothing
    pub fn no_action(event_kind: impl Into<String>) -> Self {
        Self {
            event_kind: event_kind.into(),
            outcome: DispatchOutcome::NoAction,
            actions: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Whether no action ran for this event
    pub fn is_no_action(&self) -> bool {
        self.outcome == DispatchOutcome::NoAction
    }

    /// Number of actions that succeeded
    pub fn success_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.status == ActionStatus::Success)
            .count()
    }

    /// Number of actions that did not succeed
    pub fn failure_count(&self) -> usize {
        self.actions.len() - self.success_count()
    }

    /// Names of the actions that ran, in order
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.action.as_str()).collect()
    }
}

/// What the dispatcher did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The event kind matched an entry and its actions ran
    Dispatched,

    /// No entry matched and the fallback action ran
    Fallback,

    /// No entry matched and no fallback is configured
    NoAction,

    /// The dispatcher was shut down and ignored the event
    ShutDown,
}

/// Result of running one action for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Action identifier
    pub action: String,

    /// Execution status
    pub status: ActionStatus,

    /// Optional output from the action
    pub output: Option<String>,

    /// Optional error message
    pub error: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Status of an action run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Action completed successfully
    Success,

    /// Action returned an error
    Failed,

    /// Action exceeded its timeout
    Timeout,

    /// Action was cancelled by shutdown
    Cancelled,
}
