//! SObject describe results as a text report.
//!
//! Three sections: record types, child relationships and fields. Each is a
//! fixed-width table introduced by a count line between separators.

use std::cmp::Ordering;

use serde_json::Value;

use crate::text::{capitalize, none_value, pad_left_aligned, separator};

/// A report column: describe key and display width.
struct Column {
    key: &'static str,
    width: usize,
}

const RECORD_TYPE_COLUMNS: &[Column] = &[
    Column { key: "available", width: 10 },
    Column { key: "recordTypeId", width: 20 },
    Column { key: "name", width: 35 },
    Column { key: "defaultRecordTypeMapping", width: 15 },
];

const CHILD_RELATIONSHIP_COLUMNS: &[Column] = &[
    Column { key: "field", width: 35 },
    Column { key: "relationshipName", width: 35 },
    Column { key: "childSObject", width: 30 },
    Column { key: "cascadeDelete", width: 12 },
];

const FIELD_COLUMNS: &[Column] = &[
    Column { key: "label", width: 40 },
    Column { key: "name", width: 40 },
    Column { key: "type", width: 15 },
    Column { key: "length", width: 2 },
];

fn column_title(key: &str) -> String {
    match key {
        "defaultRecordTypeMapping" => capitalize("default"),
        other => capitalize(other),
    }
}

fn push_table(out: &mut String, title: &str, columns: &[Column], rows: &[&Value]) {
    out.push_str(&separator());
    out.push('\n');
    out.push_str(&format!("{}: \t{}\n", title, rows.len()));
    out.push_str(&separator());
    out.push('\n');

    let header: String = columns
        .iter()
        .map(|c| pad_left_aligned(&column_title(c.key), c.width))
        .collect();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');

    for row in rows {
        let line: String = columns
            .iter()
            .map(|c| pad_left_aligned(&none_value(row.get(c.key)), c.width))
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
}

fn array_items<'a>(describe: &'a Value, key: &str) -> Vec<&'a Value> {
    describe
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

/// Orders describe entries by their `label`.
pub(crate) fn by_label(a: &&Value, b: &&Value) -> Ordering {
    none_value(a.get("label")).cmp(&none_value(b.get("label")))
}

/// Formats an sobject describe result as text.
///
/// Fields are sorted by label. Missing sections render as empty tables.
pub fn format_sobject_describe(describe: &Value) -> String {
    let mut view = format!("{} Describe:\n", none_value(describe.get("name")));

    let record_types = array_items(describe, "recordTypeInfos");
    push_table(&mut view, "Record Type Info", RECORD_TYPE_COLUMNS, &record_types);
    view.push('\n');

    let relationships = array_items(describe, "childRelationships");
    push_table(
        &mut view,
        "ChildRelationships Info",
        CHILD_RELATIONSHIP_COLUMNS,
        &relationships,
    );
    view.push('\n');

    let mut fields = array_items(describe, "fields");
    fields.sort_by(by_label);
    push_table(&mut view, "Total Fields", FIELD_COLUMNS, &fields);

    view
}
