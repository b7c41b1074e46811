//! Text helpers shared by every report and export.
//!
//! Salesforce hands back strings that are still XML-escaped and sometimes
//! percent-encoded; reports pad cells to fixed widths the way `printf`-style
//! `%-30s` does.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Separator line used between report sections (100 dashes).
pub const SEPARATOR_WIDTH: usize = 100;

/// Returns the 100-dash separator without a trailing newline.
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Undoes XML entity escaping and percent-encoding in API-provided text.
///
/// `&amp;` is replaced last so that `&amp;lt;` decodes to `&lt;` rather than `<`.
/// Invalid percent sequences are left as-is; invalid UTF-8 is replaced lossily.
pub fn decode_api_text(s: &str) -> String {
    let unescaped = s
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");

    percent_decode_str(&unescaped).decode_utf8_lossy().into_owned()
}

/// Renders a JSON value as display text.
///
/// `null` (and a missing value) become the empty string, strings are used
/// verbatim, other scalars use their JSON text and nested values are
/// rendered as compact JSON.
pub fn none_value(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Left-aligns `s` in a field of `width` characters (`%-Ns`). Never truncates.
pub fn pad_left_aligned(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Right-aligns `s` in a field of `width` characters (`%Ns`). Never truncates.
pub fn pad_right_aligned(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// Upper-cases the first character and lower-cases the rest.
///
/// `"recordTypeId"` becomes `"Recordtypeid"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
