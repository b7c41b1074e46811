//! Layout describe exports.
//!
//! Only the picklist values available to the record type are exported; edit
//! and view layout sections are not.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::error::AppError;
use crate::text::none_value;

/// Written instead of a CSV when the layout has no record type picklists.
pub const NO_PICKLIST_FIELD: &str = "No available picklist field.";

const HEADERS: [&str; 2] = ["Picklist Field", "Available Values"];

/// Normalizes a single element or a list into a list.
fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

fn picklists_for_record_type(layout: &Value) -> Option<&Value> {
    let mappings = layout.get("recordTypeMappings")?;
    let mapping = match mappings {
        Value::Array(items) => items.first()?,
        single => single,
    };
    mapping
        .get("picklistsForRecordType")
        .filter(|picklists| !picklists.is_null())
}

/// Writes the record type picklist values of a layout describe result.
///
/// Produces a fully quoted CSV with one row per picklist field and its
/// available values joined by newlines. If the layout carries no picklists,
/// writes [`NO_PICKLIST_FIELD`] instead. Returns the number of picklist rows.
pub fn write_layout_picklists<W: Write>(mut writer: W, layout: &Value) -> Result<usize, AppError> {
    let Some(picklists) = picklists_for_record_type(layout) else {
        writer.write_all(NO_PICKLIST_FIELD.as_bytes())?;
        writer.flush()?;
        return Ok(0);
    };

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    let picklists = as_list(picklists);
    for picklist in &picklists {
        let values: Vec<String> = picklist
            .get("picklistValues")
            .map(as_list)
            .unwrap_or_default()
            .into_iter()
            .map(|value| none_value(value.get("value")).into_owned())
            .collect();

        csv_writer.write_record([
            none_value(picklist.get("picklistName")).into_owned(),
            values.join("\n"),
        ])?;
    }
    csv_writer.flush()?;

    Ok(picklists.len())
}
