//! Error types for the notification dispatcher
//!
//! All errors use the `thiserror` crate. Only configuration errors ever reach the
//! caller of [`Dispatcher::initialize`](crate::Dispatcher::initialize); action
//! failures are folded into the [`DispatchResult`](crate::DispatchResult) so the
//! host's own event loop is never disrupted by a broken notification.
//!
//! # Error Handling Patterns
//!
//! 1. **Configuration Errors**: duplicate kinds, unresolved action references and
//!    malformed entries are rejected before any event is accepted.
//!
//! 2. **Action Errors**: a failed action is logged and recorded per event, and the
//!    remaining actions for that event still run (failure isolation).
//!
//! 3. **Timeouts**: actions that exceed their timeout are dropped and recorded as
//!    timed out. In-flight actions that outlive the shutdown grace period are
//!    cancelled and logged.
//!
//! # Examples
//!
//! ```ignore
//! match Dispatcher::initialize(config, catalog) {
//!     Ok(dispatcher) => dispatcher,
//!     Err(NotifyError::Configuration(msg)) => eprintln!("Bad config: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur in the notification dispatcher
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Invalid dispatcher configuration
    ///
    /// Common causes:
    /// - Two entries for the same event kind
    /// - An action identifier that is not defined
    /// - An entry without a kind or without actions
    /// - Malformed YAML
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A single notification action failed
    ///
    /// Recorded in the dispatch result, never propagated to the host.
    #[error("Action '{action}' failed: {message}")]
    Action {
        /// Name of the action that failed
        action: String,
        /// What went wrong
        message: String,
    },

    /// A notification action exceeded its timeout
    ///
    /// The u64 contains the timeout duration in milliseconds.
    #[error("Action '{action}' timed out after {timeout_ms}ms")]
    ActionTimeout {
        /// Name of the action that timed out
        action: String,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// In-flight actions did not finish within the shutdown grace period
    ///
    /// Logged during shutdown; shutdown proceeds regardless.
    #[error("Shutdown timed out after {0}ms with actions still in flight")]
    ShutdownTimeout(u64),

    /// JSON error
    ///
    /// Wraps `serde_json::Error` for host message parsing failures.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl NotifyError {
    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        NotifyError::Configuration(message.into())
    }

    /// Build an action error
    pub fn action(action: impl Into<String>, message: impl Into<String>) -> Self {
        NotifyError::Action {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Whether this error is fatal to dispatcher initialization
    pub fn is_configuration(&self) -> bool {
        matches!(self, NotifyError::Configuration(_))
    }
}

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;
