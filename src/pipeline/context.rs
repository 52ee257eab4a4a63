// file: src/pipeline/context.rs
// description: renders a batch of user records as plain indented prompt text
// reference: raw json would leak quote characters into the prompt, so values are flattened

use crate::models::UserRecord;
use serde_json::Value;

pub const EMPTY_CONTEXT: &str = "No user data available.";

pub struct ContextFormatter;

impl ContextFormatter {
    /// ```text
    /// User:
    ///   name: John
    ///   surname: Doe
    /// ```
    pub fn format(batch: &[UserRecord]) -> String {
        if batch.is_empty() {
            return EMPTY_CONTEXT.to_string();
        }

        let mut lines = Vec::with_capacity(batch.len() * 8);
        for user in batch {
            lines.push("User:".to_string());
            for (key, value) in user.fields() {
                lines.push(format!("  {}: {}", key, render_value(value)));
            }
        }
        lines.join("\n")
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, render_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
