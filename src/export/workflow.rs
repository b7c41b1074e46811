//! Workflow metadata exports.
//!
//! A retrieved `<sobject>.workflow` file holds five kinds of components. Each
//! kind present in the file is written to its own CSV under
//! `<workspace>/describe/workflows`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::export::atomic_writer::{AtomicCsvWriter, Quoting};
use crate::export::cells::{header_row, metadata_rows};
use crate::metadata::xml_to_value;
use crate::settings::ToolingSettings;

/// The component kinds of a workflow file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowSection {
    Rules,
    FieldUpdates,
    EmailAlerts,
    OutboundMessages,
    Tasks,
}

impl WorkflowSection {
    pub const ALL: [WorkflowSection; 5] = [
        WorkflowSection::Rules,
        WorkflowSection::FieldUpdates,
        WorkflowSection::EmailAlerts,
        WorkflowSection::OutboundMessages,
        WorkflowSection::Tasks,
    ];

    /// Element name of this section inside `<Workflow>`.
    pub fn xml_key(self) -> &'static str {
        match self {
            WorkflowSection::Rules => "rules",
            WorkflowSection::FieldUpdates => "fieldUpdates",
            WorkflowSection::EmailAlerts => "alerts",
            WorkflowSection::OutboundMessages => "outboundMessages",
            WorkflowSection::Tasks => "tasks",
        }
    }

    /// Suffix of the output file name (`<sobject> <suffix>.csv`).
    pub fn file_suffix(self) -> &'static str {
        match self {
            WorkflowSection::Rules => "workflow rule",
            WorkflowSection::FieldUpdates => "workflow field update",
            WorkflowSection::EmailAlerts => "email alert",
            WorkflowSection::OutboundMessages => "outbound message",
            WorkflowSection::Tasks => "task",
        }
    }

    /// Columns configured for this section.
    pub fn columns(self, settings: &ToolingSettings) -> &[String] {
        match self {
            WorkflowSection::Rules => &settings.workflow_rule_columns,
            WorkflowSection::FieldUpdates => &settings.workflow_field_update_columns,
            WorkflowSection::EmailAlerts => &settings.workflow_email_alert_columns,
            WorkflowSection::OutboundMessages => &settings.workflow_outbound_message_columns,
            WorkflowSection::Tasks => &settings.workflow_task_columns,
        }
    }
}

/// Reads a retrieved metadata file, returning `None` if it does not exist.
pub(crate) fn read_metadata_file(path: &Path) -> Result<Option<Value>, AppError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(xml_to_value(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Writes one metadata section to `path` with capitalized headers.
fn write_section_csv(
    path: &Path,
    columns: &[String],
    metadata: &Value,
    sobject: &str,
) -> Result<PathBuf, AppError> {
    let mut writer = AtomicCsvWriter::create(path, Quoting::Minimal)?;
    writer.write_row(header_row(columns))?;
    for row in metadata_rows(columns, metadata, sobject) {
        writer.write_row(row)?;
    }
    writer.finish()
}

/// Exports the workflow components of `sobject` to CSV files.
///
/// Returns the written files in section order. A missing workflow file, or a
/// file without any of the sections, writes nothing.
///
/// # Errors
///
/// Returns `AppError::XmlInvalid` if the workflow file is malformed and
/// `AppError::CsvExport` if a CSV cannot be written.
pub fn export_workflow_metadata(
    settings: &ToolingSettings,
    sobject: &str,
) -> Result<Vec<PathBuf>, AppError> {
    let source = settings
        .workflow_source_dir()
        .join(format!("{}.workflow", sobject));

    let Some(document) = read_metadata_file(&source)? else {
        info!("[EXPORT] No workflow file for {}", sobject);
        return Ok(Vec::new());
    };
    let Some(workflow) = document.get("Workflow") else {
        return Ok(Vec::new());
    };

    let output_dir = settings.workflow_output_dir();
    let mut written = Vec::new();

    for section in WorkflowSection::ALL {
        let metadata = match workflow.get(section.xml_key()) {
            Some(Value::Null) | None => continue,
            Some(metadata) => metadata,
        };

        let path = output_dir.join(format!("{} {}.csv", sobject, section.file_suffix()));
        written.push(write_section_csv(
            &path,
            section.columns(settings),
            metadata,
            sobject,
        )?);
    }

    info!(
        "[EXPORT] Exported {} workflow sections for {}",
        written.len(),
        sobject
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ACCOUNT_WORKFLOW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Workflow xmlns="http://soap.sforce.com/2006/04/metadata">
    <fieldUpdates>
        <fullName>Set_Rating</fullName>
        <field>Rating</field>
        <literalValue>Hot</literalValue>
        <name>Set Rating</name>
        <operation>Literal</operation>
    </fieldUpdates>
    <rules>
        <fullName>Hot Accounts</fullName>
        <actions>
            <name>Set_Rating</name>
            <type>FieldUpdate</type>
        </actions>
        <active>true</active>
        <criteriaItems>
            <field>Account.AnnualRevenue</field>
            <operation>greaterThan</operation>
            <value>1000000</value>
        </criteriaItems>
        <triggerType>onCreateOnly</triggerType>
    </rules>
    <rules>
        <fullName>Cold Accounts</fullName>
        <active>false</active>
        <criteriaItems>
            <field>Account.Rating</field>
            <operation>equals</operation>
            <value>Cold</value>
        </criteriaItems>
        <criteriaItems>
            <field>Account.Type</field>
            <operation>equals</operation>
            <value>Prospect</value>
        </criteriaItems>
        <formula>ISPICKVAL(Rating, &quot;Cold&quot;)</formula>
        <triggerType>onAllChanges</triggerType>
    </rules>
</Workflow>"#;

    fn workspace_with_workflow(sobject: &str, xml: &str) -> (TempDir, ToolingSettings) {
        let dir = TempDir::new().unwrap();
        let settings = ToolingSettings::new(dir.path());
        let source_dir = settings.workflow_source_dir();
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join(format!("{}.workflow", sobject)), xml).unwrap();
        (dir, settings)
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn exports_present_sections_only() {
        let (_dir, settings) = workspace_with_workflow("Account", ACCOUNT_WORKFLOW);

        let written = export_workflow_metadata(&settings, "Account").unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "Account workflow rule.csv",
                "Account workflow field update.csv"
            ]
        );
        assert!(written
            .iter()
            .all(|p| p.starts_with(settings.workflow_output_dir())));
    }

    #[test]
    fn rule_rows_flatten_nested_elements() {
        let (_dir, mut settings) = workspace_with_workflow("Account", ACCOUNT_WORKFLOW);
        settings.workflow_rule_columns = ["sobject", "fullName", "active", "criteriaItems", "formula", "actions"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let written = export_workflow_metadata(&settings, "Account").unwrap();
        let rows = read_rows(&written[0]);

        assert_eq!(
            rows[0],
            vec!["Sobject", "Fullname", "Active", "Criteriaitems", "Formula", "Actions"]
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Account");
        assert_eq!(rows[1][1], "Hot Accounts");
        // A single <criteriaItems> is an element: one `key: value` line per child.
        assert_eq!(
            rows[1][3],
            "field: Account.AnnualRevenue\noperation: greaterThan\nvalue: 1000000"
        );
        assert_eq!(rows[1][4], "");
        assert_eq!(rows[1][5], "name: Set_Rating\ntype: FieldUpdate");
        // Repeated <criteriaItems> are a list: one line per item.
        assert_eq!(
            rows[2][3],
            "Account.Rating equals Cold\nAccount.Type equals Prospect"
        );
        assert_eq!(rows[2][4], "ISPICKVAL(Rating, \"Cold\")");
        assert_eq!(rows[2][5], "");
    }

    #[test]
    fn single_field_update_is_one_row() {
        let (_dir, settings) = workspace_with_workflow("Account", ACCOUNT_WORKFLOW);
        let written = export_workflow_metadata(&settings, "Account").unwrap();
        let rows = read_rows(&written[1]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "Set_Rating");
    }

    #[test]
    fn missing_workflow_file_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let settings = ToolingSettings::new(dir.path());
        let written = export_workflow_metadata(&settings, "Contact").unwrap();
        assert!(written.is_empty());
        assert!(!settings.workflow_output_dir().exists());
    }

    #[test]
    fn malformed_workflow_is_xml_error() {
        let (_dir, settings) = workspace_with_workflow("Lead", "<Workflow><rules></Workflow>");
        let err = export_workflow_metadata(&settings, "Lead").unwrap_err();
        assert!(matches!(err, AppError::XmlInvalid(_)));
    }

    #[test]
    fn sections_cover_every_settings_list() {
        let settings = ToolingSettings::new("/ws");
        for section in WorkflowSection::ALL {
            assert!(!section.columns(&settings).is_empty());
            assert!(!section.file_suffix().is_empty());
        }
    }
}
