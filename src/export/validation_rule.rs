//! Validation rule export across several sobjects.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::export::atomic_writer::{AtomicCsvWriter, Quoting};
use crate::export::cells::{header_row, metadata_rows};
use crate::export::workflow::read_metadata_file;
use crate::settings::ToolingSettings;

/// File name of the combined validation rule export.
pub const VALIDATION_RULE_FILE: &str = "validation rules.csv";

/// Exports the validation rules of every sobject in `sobjects` to a single CSV.
///
/// Rules are read from `<workspace>/metadata/unpackaged/objects/<sobject>.object`.
/// Sobjects without an object file or without validation rules contribute no
/// rows. The header is always written, so the file exists even when no rules
/// were found.
pub fn export_validation_rules<S: AsRef<str>>(
    settings: &ToolingSettings,
    sobjects: &[S],
) -> Result<PathBuf, AppError> {
    let columns = &settings.validation_rule_columns;
    let path = settings
        .validation_rule_output_dir()
        .join(VALIDATION_RULE_FILE);

    let mut writer = AtomicCsvWriter::create(&path, Quoting::Minimal)?;
    writer.write_row(header_row(columns))?;

    let source_dir = settings.object_source_dir();
    for sobject in sobjects {
        let sobject = sobject.as_ref();
        let source = source_dir.join(format!("{}.object", sobject));

        let Some(document) = read_metadata_file(&source)? else {
            debug!("[EXPORT] No object file for {}", sobject);
            continue;
        };
        let rules = document
            .get("CustomObject")
            .and_then(|object| object.get("validationRules"))
            .unwrap_or(&Value::Null);

        for row in metadata_rows(columns, rules, sobject) {
            writer.write_row(row)?;
        }
    }

    let rows = writer.rows_written() - 1;
    let path = writer.finish()?;
    info!("[EXPORT] Exported {} validation rules", rows);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ACCOUNT_OBJECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <validationRules>
        <fullName>Require_Phone</fullName>
        <active>true</active>
        <errorConditionFormula>ISBLANK(Phone)</errorConditionFormula>
        <errorDisplayField>Phone</errorDisplayField>
        <errorMessage>Phone is required</errorMessage>
    </validationRules>
    <validationRules>
        <fullName>Positive_Revenue</fullName>
        <active>false</active>
        <errorConditionFormula>AnnualRevenue &lt; 0</errorConditionFormula>
        <errorMessage>Revenue can&apos;t be negative</errorMessage>
    </validationRules>
</CustomObject>"#;

    const CONTACT_OBJECT: &str = r#"<CustomObject>
    <validationRules>
        <fullName>Email_Format</fullName>
        <active>true</active>
        <errorConditionFormula>NOT(CONTAINS(Email, &quot;@&quot;))</errorConditionFormula>
        <errorMessage>Bad email</errorMessage>
    </validationRules>
</CustomObject>"#;

    fn workspace(objects: &[(&str, &str)]) -> (TempDir, ToolingSettings) {
        let dir = TempDir::new().unwrap();
        let settings = ToolingSettings::new(dir.path());
        let source_dir = settings.object_source_dir();
        fs::create_dir_all(&source_dir).unwrap();
        for (name, xml) in objects {
            fs::write(source_dir.join(format!("{}.object", name)), xml).unwrap();
        }
        (dir, settings)
    }

    fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
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
    fn combines_rules_of_all_sobjects() {
        let (_dir, settings) = workspace(&[
            ("Account", ACCOUNT_OBJECT),
            ("Contact", CONTACT_OBJECT),
            ("Lead", "<CustomObject><label>Lead</label></CustomObject>"),
        ]);

        let path =
            export_validation_rules(&settings, &["Account", "Missing", "Lead", "Contact"]).unwrap();
        assert!(path.ends_with("describe/validation rules/validation rules.csv"));

        let rows = read_rows(&path);
        assert_eq!(
            rows[0],
            vec![
                "Sobject",
                "Fullname",
                "Active",
                "Description",
                "Errorconditionformula",
                "Errordisplayfield",
                "Errormessage"
            ]
        );
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][0..2], ["Account", "Require_Phone"]);
        assert_eq!(rows[2][4], "AnnualRevenue < 0");
        assert_eq!(rows[2][5], "");
        assert_eq!(rows[2][6], "Revenue can't be negative");
        assert_eq!(rows[3][0], "Contact");
        assert_eq!(rows[3][4], "NOT(CONTAINS(Email, \"@\"))");
    }

    #[test]
    fn no_rules_still_writes_header() {
        let (_dir, settings) = workspace(&[]);
        let path = export_validation_rules::<&str>(&settings, &[]).unwrap();
        assert_eq!(read_rows(&path).len(), 1);
    }

    #[test]
    fn rerun_replaces_previous_export() {
        let (_dir, settings) = workspace(&[("Contact", CONTACT_OBJECT)]);
        export_validation_rules(&settings, &["Contact"]).unwrap();
        let path = export_validation_rules(&settings, &["Contact"]).unwrap();
        assert_eq!(read_rows(&path).len(), 2);
    }
}
