//! CLI commands for registry inspection
//!
//! Lists the kinds a configuration registers and shows what a given kind would
//! trigger, as a table or as JSON.

pub mod commands;
pub mod formatter;

pub use commands::{
    inspect_kind, inspect_kind_json, list_entries, list_entries_json, NotifyCommand,
};
pub use formatter::{
    format_entries_json, format_entries_table, format_kind_json, format_kind_table, KindView,
};

use crate::{error::Result, registry::EventRegistry};

/// Registry inspection CLI interface
pub struct NotifyCli<'a> {
    registry: &'a EventRegistry,
}

impl<'a> NotifyCli<'a> {
    /// Create a CLI over a built registry
    pub fn new(registry: &'a EventRegistry) -> Self {
        Self { registry }
    }

    /// Execute a command
    pub fn execute(&self, command: NotifyCommand) -> Result<String> {
        let fallback = self.registry.fallback().map(|f| f.name.as_str());

        match command {
            NotifyCommand::List { format } => {
                let entries = self.registry.entries();
                match format.as_deref() {
                    Some("json") => format_entries_json(&entries, fallback),
                    _ => Ok(format_entries_table(&entries, fallback)),
                }
            }
            NotifyCommand::Inspect { kind, format } => {
                let view = self.resolve(kind);
                match format.as_deref() {
                    Some("json") => format_kind_json(&view),
                    _ => Ok(format_kind_table(&view)),
                }
            }
        }
    }

    fn resolve(&self, kind: String) -> KindView {
        let matched = self.registry.actions_for(&kind);
        if !matched.is_empty() {
            let actions = matched.iter().map(|a| a.name.clone()).collect();
            return KindView {
                kind,
                actions,
                fallback: false,
            };
        }

        match self.registry.fallback() {
            Some(fallback) => KindView {
                kind,
                actions: vec![fallback.name.clone()],
                fallback: true,
            },
            None => KindView {
                kind,
                actions: Vec::new(),
                fallback: false,
            },
        }
    }
}
