//! Execute-anonymous results.

use serde_json::Value;

use crate::text::{decode_api_text, none_value, separator};

/// Reads `compiled` from either a SOAP result (`"true"`/`"false"`) or a REST
/// result (boolean).
fn compiled_flag(result: &Value) -> Option<bool> {
    match result.get("compiled")? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

/// Formats an execute-anonymous result.
///
/// A compiled run shows its debug log. A compile failure shows the problem
/// and its position above a separator, followed by the debug log. The result
/// is XML-unescaped and percent-decoded.
pub fn format_execute_anonymous(result: &Value) -> String {
    let debug_log = none_value(result.get("debugLog"));

    let view = match compiled_flag(result) {
        Some(true) => debug_log.into_owned(),
        Some(false) => format!(
            "{} at line {} column {}\n{}\n{}",
            none_value(result.get("compileProblem")),
            none_value(result.get("line")),
            none_value(result.get("column")),
            separator(),
            debug_log
        ),
        None => String::new(),
    };

    decode_api_text(&view)
}
