//! Generic record lists (e.g. custom field query results) as CSV.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::error::AppError;
use crate::text::{capitalize, none_value};

/// Message shown instead of a CSV when there are no records.
pub const NO_CUSTOM_FIELDS: &str = "No Custom Fields";

/// Outcome of [`write_records_csv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsCsv {
    /// Header plus this many data rows were written.
    Written(usize),
    /// Nothing was written; carries the message to show instead.
    Empty(&'static str),
}

/// Writes flat records as a fully quoted CSV.
///
/// Columns are the keys of the first record, capitalized for the header.
/// Keys missing from later records and `null` values render as empty cells.
pub fn write_records_csv<W: Write>(writer: W, records: &[Value]) -> Result<RecordsCsv, AppError> {
    let Some(first) = records.first() else {
        return Ok(RecordsCsv::Empty(NO_CUSTOM_FIELDS));
    };

    let keys: Vec<&String> = first
        .as_object()
        .map(|fields| fields.keys().collect())
        .unwrap_or_default();

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv_writer.write_record(keys.iter().map(|key| capitalize(key)))?;
    for record in records {
        csv_writer.write_record(
            keys.iter()
                .map(|key| none_value(record.get(key.as_str())).into_owned()),
        )?;
    }
    csv_writer.flush()?;

    Ok(RecordsCsv::Written(records.len()))
}
