//! Notification actions and the catalog that resolves them by name

pub mod catalog;
pub mod runner;
pub mod sink;
pub mod substitution;

pub use catalog::ActionCatalog;
pub use runner::{CommandAction, LogAction, SoundAction};
pub use sink::{MemorySink, MessageSink, TracingSink, MESSAGE_PREFIX};
pub use substitution::VariableSubstitutor;

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Event, HostInfo},
};

/// What an action sees while it runs
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// Event being dispatched
    pub event: &'a Event,

    /// Host session identity
    pub host: &'a HostInfo,
}

/// A named, side-effecting response to an event
///
/// Actions keep no state between runs: firing the same action twice yields two
/// independent notifications. Implementations must be cancel-safe, since the
/// dispatcher drops a run that exceeds its timeout or outlives shutdown.
///
/// # Examples
///
/// ```ignore
/// struct Beep;
///
/// #[async_trait]
/// impl NotificationAction for Beep {
///     async fn run(&self, ctx: &ActionContext<'_>) -> Result<String> {
///         Ok(format!("beep for {}", ctx.event.kind))
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationAction: Send + Sync {
    /// Run the action for one event, returning a short description of what happened
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<String>;

    /// Timeout for one run in milliseconds, replacing `settings.action_timeout_ms`
    fn timeout_ms(&self) -> Option<u64> {
        None
    }

    /// Release resources held by the action
    ///
    /// Called once per action when the dispatcher shuts down.
    async fn shutdown(&self) {}
}
