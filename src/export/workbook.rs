//! SObject field workbooks.
//!
//! A workbook lists every field of an sobject describe, one row per field,
//! with the columns chosen in `workbook_field_describe_columns`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::export::atomic_writer::{AtomicCsvWriter, Quoting};
use crate::export::cells::header_row;
use crate::report::describe::by_label;
use crate::text::none_value;

/// Directory (relative to the workspace) holding generated workbooks.
pub const WORKBOOK_DIR: &str = "describe/sobject workbooks";

/// Renders one field describe attribute as a workbook cell.
fn workbook_cell(key: &str, value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => match key {
            "picklistValues" => items
                .iter()
                .map(|item| none_value(item.get("value")).into_owned())
                .collect::<Vec<_>>()
                .join("\n"),
            "referenceTo" => none_value(items.first()).into_owned(),
            _ => items
                .iter()
                .map(|item| none_value(Some(item)).into_owned())
                .collect::<Vec<_>>()
                .join(" "),
        },
        other => none_value(other).replace("\r\n", ", "),
    }
}

/// Writes the field workbook of an sobject describe result.
///
/// The file is `<workspace>/describe/sobject workbooks/<sobject>.csv`, every
/// cell is quoted and the rows are sorted by field label. Returns the
/// workbook directory.
///
/// # Errors
///
/// Returns `AppError::CsvExport` if the describe result has no sobject name
/// or the file cannot be written.
pub fn generate_workbook(
    describe: &Value,
    workspace: &Path,
    columns: &[String],
) -> Result<PathBuf, AppError> {
    let sobject = describe
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::CsvExport("describe result has no sobject name".into()))?;

    let output_dir = workspace.join(WORKBOOK_DIR);
    let mut writer =
        AtomicCsvWriter::create(output_dir.join(format!("{}.csv", sobject)), Quoting::All)?;
    writer.write_row(header_row(columns))?;

    let mut fields: Vec<&Value> = describe
        .get("fields")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().collect())
        .unwrap_or_default();
    fields.sort_by(by_label);

    for field in &fields {
        let row: Vec<String> = columns
            .iter()
            .map(|key| workbook_cell(key, field.get(key.as_str())))
            .collect();
        writer.write_row(row)?;
    }

    writer.finish()?;
    info!("[EXPORT] {} workbook is generated ({} fields)", sobject, fields.len());
    Ok(output_dir)
}
