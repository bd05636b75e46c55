//! Event dispatcher for triggering notification actions

pub mod event;

pub use event::{Dispatcher, ShutdownReport};

use async_trait::async_trait;

use crate::types::{DispatchResult, Event};

/// Trait for dispatching events to notification actions
///
/// The dispatcher is responsible for:
/// 1. Receiving events from the host one at a time
/// 2. Looking up the actions registered for the event kind
/// 3. Running them in registration order
/// 4. Recording each action's outcome without letting failures escape
///
/// # Examples
///
/// ```ignore
/// let dispatcher = Dispatcher::initialize(config, catalog)?;
/// let result = dispatcher.dispatch(&Event::new("session.error")).await;
/// assert_eq!(result.outcome, DispatchOutcome::Dispatched);
/// dispatcher.shutdown().await;
/// ```
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Dispatch an event to its actions
    ///
    /// Never fails: unknown kinds yield a "no action" result and action failures
    /// are recorded per action.
    async fn dispatch(&self, event: &Event) -> DispatchResult;

    /// Stop accepting events and release action resources
    ///
    /// Runs once; concurrent and repeated calls observe the same report.
    async fn shutdown(&self) -> ShutdownReport;
}
