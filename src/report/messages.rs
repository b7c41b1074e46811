//! Salesforce API error messages.

use serde_json::Value;

use crate::text::{decode_api_text, none_value};

/// Formats an API error result (`errorCode` + `message`) for display.
///
/// The error code line is omitted when the result carries none. The message
/// is XML-unescaped and percent-decoded.
pub fn format_error_message(result: &Value) -> String {
    let mut message = String::new();
    if let Some(code) = result.get("errorCode") {
        message.push_str("Error Code: ");
        message.push_str(&none_value(Some(code)));
        message.push('\n');
    }

    message.push_str("Error Message: ");
    message.push_str(&decode_api_text(&none_value(result.get("message"))));
    message
}
