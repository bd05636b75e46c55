//! Registry inspection commands

/// Registry inspection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCommand {
    /// List every registered kind
    List {
        /// Output format (table or json)
        format: Option<String>,
    },

    /// Show what a single kind triggers
    Inspect {
        /// Event kind
        kind: String,

        /// Output format (table or json)
        format: Option<String>,
    },
}

/// List the registry
pub fn list_entries() -> NotifyCommand {
    NotifyCommand::List { format: None }
}

/// List the registry as JSON
pub fn list_entries_json() -> NotifyCommand {
    NotifyCommand::List {
        format: Some("json".to_string()),
    }
}

/// Inspect one kind
pub fn inspect_kind(kind: impl Into<String>) -> NotifyCommand {
    NotifyCommand::Inspect {
        kind: kind.into(),
        format: None,
    }
}

/// Inspect one kind as JSON
pub fn inspect_kind_json(kind: impl Into<String>) -> NotifyCommand {
    NotifyCommand::Inspect {
        kind: kind.into(),
        format: Some("json".to_string()),
    }
}
