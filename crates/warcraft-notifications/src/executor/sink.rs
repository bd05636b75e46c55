//! Message sinks for user-facing notifications
//!
//! Log actions never print directly. They hand the rendered message to an
//! injected [`MessageSink`], which keeps notification output observable in tests
//! and lets the host decide where messages go.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, trace, warn};

use crate::error::{NotifyError, Result};
use crate::types::LogLevel;

/// Prefix used on every message emitted through [`TracingSink`]
pub const MESSAGE_PREFIX: &str = "[Warcraft Notifications]";

/// Destination for notification messages
pub trait MessageSink: Send + Sync {
    /// Emit a message at the given level
    fn emit(&self, level: LogLevel, message: &str) -> Result<()>;
}

/// Sink that forwards messages to `tracing` under the `notify` target
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink
    pub fn new() -> Self {
        Self
    }
}

impl MessageSink for TracingSink {
    fn emit(&self, level: LogLevel, message: &str) -> Result<()> {
        match level {
            LogLevel::Trace => trace!(target: "warcraft_notifications::notify", "{} {}", MESSAGE_PREFIX, message),
            LogLevel::Debug => debug!(target: "warcraft_notifications::notify", "{} {}", MESSAGE_PREFIX, message),
            LogLevel::Info => info!(target: "warcraft_notifications::notify", "{} {}", MESSAGE_PREFIX, message),
            LogLevel::Warn => warn!(target: "warcraft_notifications::notify", "{} {}", MESSAGE_PREFIX, message),
            LogLevel::Error => error!(target: "warcraft_notifications::notify", "{} {}", MESSAGE_PREFIX, message),
        }
        Ok(())
    }
}

/// Sink that records messages in memory
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages, oldest first
    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Recorded message texts only
    pub fn texts(&self) -> Vec<String> {
        self.messages().into_iter().map(|(_, text)| text).collect()
    }
}

impl MessageSink for MemorySink {
    fn emit(&self, level: LogLevel, message: &str) -> Result<()> {
        let mut messages = self
            .messages
            .lock()
            .map_err(|e| NotifyError::action("sink", format!("Failed to acquire lock: {}", e)))?;
        messages.push((level, message.to_string()));
        Ok(())
    }
}
