//! Plugin settings: workspace location and the column lists of every CSV export.
//!
//! Settings are stored as JSON (the `toolingapi.sublime-settings` shape). Every
//! column list has a default so a file that only names the workspace still loads.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Settings consumed by the metadata and describe exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolingSettings {
    /// Root of the local workspace (holds `metadata/` and `describe/`).
    pub workspace: PathBuf,
    #[serde(default = "default_validation_rule_columns")]
    pub validation_rule_columns: Vec<String>,
    #[serde(default = "default_workflow_rule_columns")]
    pub workflow_rule_columns: Vec<String>,
    #[serde(default = "default_workflow_field_update_columns")]
    pub workflow_field_update_columns: Vec<String>,
    #[serde(default = "default_workflow_email_alert_columns")]
    pub workflow_email_alert_columns: Vec<String>,
    #[serde(default = "default_workflow_outbound_message_columns")]
    pub workflow_outbound_message_columns: Vec<String>,
    #[serde(default = "default_workflow_task_columns")]
    pub workflow_task_columns: Vec<String>,
    #[serde(default = "default_workbook_field_describe_columns")]
    pub workbook_field_describe_columns: Vec<String>,
}

impl ToolingSettings {
    /// Creates settings for `workspace` with default column lists.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            validation_rule_columns: default_validation_rule_columns(),
            workflow_rule_columns: default_workflow_rule_columns(),
            workflow_field_update_columns: default_workflow_field_update_columns(),
            workflow_email_alert_columns: default_workflow_email_alert_columns(),
            workflow_outbound_message_columns: default_workflow_outbound_message_columns(),
            workflow_task_columns: default_workflow_task_columns(),
            workbook_field_describe_columns: default_workbook_field_describe_columns(),
        }
    }

    /// Parses settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SettingsInvalid` if the JSON is malformed or the
    /// workspace is missing or empty.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let settings: ToolingSettings = serde_json::from_str(json)?;
        if settings.workspace.as_os_str().is_empty() {
            return Err(AppError::SettingsInvalid("workspace must not be empty".into()));
        }
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::SettingsInvalid(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings = Self::from_json(&content)?;
        info!("[SETTINGS] Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Directory holding retrieved `*.workflow` files.
    pub fn workflow_source_dir(&self) -> PathBuf {
        self.workspace.join("metadata/unpackaged/workflows")
    }

    /// Directory holding retrieved `*.object` files.
    pub fn object_source_dir(&self) -> PathBuf {
        self.workspace.join("metadata/unpackaged/objects")
    }

    /// Output directory for workflow CSVs.
    pub fn workflow_output_dir(&self) -> PathBuf {
        self.workspace.join("describe/workflows")
    }

    /// Output directory for the validation rule CSV.
    pub fn validation_rule_output_dir(&self) -> PathBuf {
        self.workspace.join("describe/validation rules")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_validation_rule_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "active",
        "description",
        "errorConditionFormula",
        "errorDisplayField",
        "errorMessage",
    ])
}

fn default_workflow_rule_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "active",
        "description",
        "triggerType",
        "criteriaItems",
        "booleanFilter",
        "formula",
        "actions",
        "workflowTimeTriggers",
    ])
}

fn default_workflow_field_update_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "name",
        "description",
        "field",
        "operation",
        "formula",
        "literalValue",
        "lookupValue",
        "notifyAssignee",
        "reevaluateOnChange",
        "protected",
    ])
}

fn default_workflow_email_alert_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "description",
        "recipients",
        "ccEmails",
        "senderType",
        "template",
        "protected",
    ])
}

fn default_workflow_outbound_message_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "name",
        "description",
        "endpointUrl",
        "fields",
        "apiVersion",
        "includeSessionId",
        "integrationUser",
        "useDeadLetterQueue",
        "protected",
    ])
}

fn default_workflow_task_columns() -> Vec<String> {
    columns(&[
        "sobject",
        "fullName",
        "subject",
        "assignedTo",
        "assignedToType",
        "dueDateOffset",
        "offsetFromField",
        "priority",
        "status",
        "notifyAssignee",
        "description",
        "protected",
    ])
}

fn default_workbook_field_describe_columns() -> Vec<String> {
    columns(&[
        "label",
        "name",
        "type",
        "length",
        "precision",
        "scale",
        "nillable",
        "unique",
        "externalId",
        "defaultValueFormula",
        "calculatedFormula",
        "referenceTo",
        "picklistValues",
        "inlineHelpText",
    ])
}
