//! Output formatting for registry commands

use serde::Serialize;

use crate::error::Result;
use crate::registry::RegistryEntry;

/// What an inspected kind resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindView {
    /// Event kind
    pub kind: String,

    /// Actions that would run, in order
    pub actions: Vec<String>,

    /// Whether the actions come from `on_unmatched`
    pub fallback: bool,
}

/// Format a single kind as a table
pub fn format_kind_table(view: &KindView) -> String {
    let actions = if view.actions.is_empty() {
        "(none)".to_string()
    } else {
        view.actions.join(" → ")
    };

    let mut output = String::new();
    output.push_str(&format!("Kind:     {}\n", view.kind));
    output.push_str(&format!("Actions:  {}\n", actions));
    if view.fallback {
        output.push_str("Source:   on_unmatched\n");
    }

    output
}

/// Format registry entries as a table
pub fn format_entries_table(entries: &[RegistryEntry], fallback: Option<&str>) -> String {
    if entries.is_empty() && fallback.is_none() {
        return "No event kinds registered".to_string();
    }

    let mut output = String::new();
    output.push_str("Kind                           | Actions\n");
    output.push_str("-------------------------------|------------------------------\n");

    for entry in entries {
        let kind = if entry.kind.chars().count() > 30 {
            format!("{}...", entry.kind.chars().take(27).collect::<String>())
        } else {
            entry.kind.clone()
        };

        output.push_str(&format!("{:<30} | {}\n", kind, entry.actions.join(", ")));
    }

    if let Some(fallback) = fallback {
        output.push_str(&format!("{:<30} | {}\n", "(unmatched)", fallback));
    }

    output
}

/// Format a single kind as JSON
pub fn format_kind_json(view: &KindView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Format registry entries as JSON
pub fn format_entries_json(entries: &[RegistryEntry], fallback: Option<&str>) -> Result<String> {
    #[derive(Serialize)]
    struct Listing<'a> {
        events: &'a [RegistryEntry],
        on_unmatched: Option<&'a str>,
    }

    Ok(serde_json::to_string_pretty(&Listing {
        events: entries,
        on_unmatched: fallback,
    })?)
}
