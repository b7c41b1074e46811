//! SOQL query results as fixed-width text tables.

use serde_json::Value;

use crate::text::{none_value, pad_left_aligned, separator};

/// Returned when a query matched no records.
pub const NO_QUERY_RESULT: &str = "No query result.";

const COLUMN_WIDTH: usize = 30;

/// Returns the records of a (sub)query result, if `value` is one.
fn query_records(value: &Value) -> Option<&Vec<Value>> {
    value.get("records").and_then(Value::as_array)
}

/// Renders a single cell.
///
/// Subquery results show their row count (their rows get their own table);
/// parent lookups show their field values.
fn render_cell(value: Option<&Value>) -> String {
    match value {
        Some(nested @ Value::Object(fields)) => {
            if query_records(nested).is_some() {
                format!("{} records", none_value(nested.get("totalSize")))
            } else {
                fields
                    .iter()
                    .filter(|(key, _)| key.as_str() != "attributes")
                    .map(|(_, v)| render_cell(Some(v)))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
        other => none_value(other).into_owned(),
    }
}

/// Appends the table for one query result. Returns false if it has no records.
fn push_records_table(result: &Value, out: &mut String) -> bool {
    let Some(records) = query_records(result) else {
        return false;
    };
    let Some(first) = records.first() else {
        return false;
    };

    let keys: Vec<&String> = first
        .as_object()
        .map(|fields| fields.keys().filter(|k| k.as_str() != "attributes").collect())
        .unwrap_or_default();

    let columns: String = keys
        .iter()
        .map(|key| pad_left_aligned(key, COLUMN_WIDTH))
        .collect();

    let sobject_type = none_value(first.get("attributes").and_then(|a| a.get("type")));
    out.push_str(&format!(
        "{} totalSize: \t{}\n",
        sobject_type,
        none_value(result.get("totalSize"))
    ));
    out.push_str(&separator());
    out.push('\n');
    out.push_str(&columns);
    out.push('\n');
    out.push_str(&"-".repeat(columns.chars().count()));
    out.push('\n');

    for record in records {
        let row: String = keys
            .iter()
            .map(|key| pad_left_aligned(&render_cell(record.get(key.as_str())), COLUMN_WIDTH))
            .collect();
        out.push_str(&row);
        out.push('\n');
    }

    true
}

/// Formats a SOQL query result as text.
///
/// The parent records form the first table. Each non-empty subquery result
/// of each parent record follows as its own table and a blank line.
pub fn format_query_result(result: &Value) -> String {
    if result.get("totalSize").and_then(Value::as_u64) == Some(0) {
        return NO_QUERY_RESULT.to_string();
    }

    let mut view = String::new();
    if !push_records_table(result, &mut view) {
        return NO_QUERY_RESULT.to_string();
    }

    let parents = query_records(result).map(Vec::as_slice).unwrap_or_default();
    for parent in parents {
        let Some(fields) = parent.as_object() else {
            continue;
        };
        for (key, value) in fields {
            if key == "attributes" || !value.is_object() {
                continue;
            }
            if push_records_table(value, &mut view) {
                view.push('\n');
            }
        }
    }

    view
}
