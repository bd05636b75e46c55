//! Placeholder substitution for action templates
//!
//! Messages and command arguments may reference the event being dispatched:
//!
//! | placeholder | value |
//! |---|---|
//! | `{{kind}}` | event kind |
//! | `{{project}}` | host project id |
//! | `{{worktree}}` | host worktree |
//! | `{{received_at}}` | event receive time |
//! | `{{payload}}` | whole payload as JSON |
//! | `{{payload.a.b}}` | nested payload field |
//!
//! Placeholders that do not resolve are left untouched, so a notification never
//! fails because the host omitted an optional field.
//!
//! # Examples
//!
//! ```ignore
//! let event = Event::new("file.edited").with_payload(json!({"file": "src/main.rs"}));
//! let ctx = ActionContext { event: &event, host: &HostInfo::default() };
//! let text = VariableSubstitutor::substitute("Edited {{payload.file}}", &ctx);
//! assert_eq!(text, "Edited src/main.rs");
//! ```

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use super::ActionContext;

/// Placeholder substitution engine
pub struct VariableSubstitutor;

impl VariableSubstitutor {
    /// Replace every resolvable `{{name}}` placeholder in `template`
    pub fn substitute(template: &str, ctx: &ActionContext<'_>) -> String {
        get_placeholder_regex()
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                Self::lookup_variable(name, ctx).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Substitute every element of an argument list
    pub fn substitute_all(templates: &[String], ctx: &ActionContext<'_>) -> Vec<String> {
        templates
            .iter()
            .map(|t| Self::substitute(t, ctx))
            .collect()
    }

    fn lookup_variable(name: &str, ctx: &ActionContext<'_>) -> Option<String> {
        match name {
            "kind" => Some(ctx.event.kind.clone()),
            "project" => Some(ctx.host.project_id.clone()),
            "worktree" => Some(ctx.host.worktree.clone()),
            "received_at" => Some(ctx.event.received_at.clone()),
            "payload" => Some(Self::value_to_string(&ctx.event.payload)),
            other => {
                let path = other.strip_prefix("payload.")?;
                Self::lookup_in_value(path, &ctx.event.payload).map(Self::value_to_string)
            }
        }
    }

    fn lookup_in_value<'v>(path: &str, value: &'v Value) -> Option<&'v Value> {
        path.split('.').try_fold(value, |current, part| match current {
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => current.get(part),
        })
    }

    fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => value.to_string(),
        }
    }
}

/// Compiled once; matches `{{name}}` and `{{nested.path}}` with optional padding
fn get_placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_\.\-]*)\s*\}\}").expect("Invalid regex")
    })
}
