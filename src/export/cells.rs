//! Cell rendering for metadata exports.
//!
//! Metadata converted from XML mixes scalars, nested elements and repeated
//! elements. Every shape is flattened into a single multi-line CSV cell.

use serde_json::Value;

use crate::text::{capitalize, decode_api_text, none_value};

/// Column that holds the sobject name instead of a metadata value.
pub const SOBJECT_COLUMN: &str = "sobject";

/// Flattens any value to space-separated text.
fn flat_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(flat_text).collect::<Vec<_>>().join(" "),
        Value::Object(fields) => fields.values().map(flat_text).collect::<Vec<_>>().join(" "),
        other => none_value(Some(other)).into_owned(),
    }
}

/// Renders one metadata value as a CSV cell.
///
/// - missing or `null` → empty
/// - list of elements → one line per element, its values space-joined
/// - list of scalars → space-joined
/// - element → one `key: value` line per child (`key: ' '` when empty)
/// - scalar → its text, with `\r\n` replaced by `", "`
///
/// The result is XML-unescaped and percent-decoded.
pub fn render_metadata_cell(value: Option<&Value>) -> String {
    let rendered = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::Array(items)) => match items.first() {
            None => String::new(),
            Some(Value::Object(_)) => items.iter().map(flat_text).collect::<Vec<_>>().join("\n"),
            Some(_) => items.iter().map(flat_text).collect::<Vec<_>>().join(" "),
        },
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(key, child)| match child {
                Value::Null => format!("{}: ' '", key),
                other => format!("{}: {}", key, flat_text(other)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Some(scalar) => none_value(Some(scalar)).replace("\r\n", ", "),
    };

    decode_api_text(&rendered)
}

/// Capitalized header row for `columns`.
pub fn header_row(columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| capitalize(c)).collect()
}

/// Builds the CSV rows for a metadata section.
///
/// A section holding a single element (an object rather than a list) yields
/// one row. The `sobject` column is filled with `sobject`; keys absent from
/// an element render as empty cells.
pub fn metadata_rows(columns: &[String], metadata: &Value, sobject: &str) -> Vec<Vec<String>> {
    let items: Vec<&Value> = match metadata {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![metadata],
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| {
                    if column == SOBJECT_COLUMN {
                        sobject.to_string()
                    } else {
                        render_metadata_cell(item.get(column.as_str()))
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scalar_cells() {
        assert_eq!(render_metadata_cell(None), "");
        assert_eq!(render_metadata_cell(Some(&Value::Null)), "");
        assert_eq!(render_metadata_cell(Some(&json!("true"))), "true");
        assert_eq!(
            render_metadata_cell(Some(&json!("line one\r\nline two"))),
            "line one, line two"
        );
        assert_eq!(
            render_metadata_cell(Some(&json!("ISPICKVAL(Type, &quot;Customer&quot;)"))),
            "ISPICKVAL(Type, \"Customer\")"
        );
    }

    #[test]
    fn list_of_elements_one_line_each() {
        let criteria = json!([
            {"field": "Account.Type", "operation": "equals", "value": "Customer"},
            {"field": "Account.Rating", "operation": "equals", "value": "Hot"}
        ]);
        assert_eq!(
            render_metadata_cell(Some(&criteria)),
            "Account.Type equals Customer\nAccount.Rating equals Hot"
        );
    }

    #[test]
    fn list_of_scalars_space_joined() {
        assert_eq!(
            render_metadata_cell(Some(&json!(["Id", "Name", "OwnerId"]))),
            "Id Name OwnerId"
        );
        assert_eq!(render_metadata_cell(Some(&json!([]))), "");
    }

    #[test]
    fn element_renders_key_value_lines() {
        let actions = json!({"name": "Set_Status", "type": "FieldUpdate", "comment": null});
        assert_eq!(
            render_metadata_cell(Some(&actions)),
            "name: Set_Status\ntype: FieldUpdate\ncomment: ' '"
        );
    }

    #[test]
    fn nested_element_values_are_flattened() {
        let recipients = json!({"recipient": {"type": "owner"}, "field": "OwnerId"});
        assert_eq!(
            render_metadata_cell(Some(&recipients)),
            "recipient: owner\nfield: OwnerId"
        );
    }

    #[test]
    fn rows_from_single_element() {
        let rule = json!({"fullName": "Rule_A", "active": "true"});
        let rows = metadata_rows(&cols(&["sobject", "fullName", "active", "formula"]), &rule, "Account");
        assert_eq!(rows, vec![vec!["Account", "Rule_A", "true", ""]]);
    }

    #[test]
    fn rows_from_list_and_sobject_position() {
        let rules = json!([{"fullName": "A"}, {"fullName": "B"}]);
        let rows = metadata_rows(&cols(&["fullName", "sobject"]), &rules, "Lead");
        assert_eq!(rows, vec![vec!["A", "Lead"], vec!["B", "Lead"]]);
    }

    #[test]
    fn rows_from_null_section_are_empty() {
        assert!(metadata_rows(&cols(&["sobject"]), &Value::Null, "Case").is_empty());
    }

    #[test]
    fn headers_are_capitalized() {
        assert_eq!(
            header_row(&cols(&["sobject", "fullName"])),
            vec!["Sobject", "Fullname"]
        );
    }
}
