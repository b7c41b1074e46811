//! CSV exports of describe results and retrieved metadata.
//!
//! File exports go through [`AtomicCsvWriter`], so a failed export never
//! leaves a truncated CSV in the workspace. Writer-based exports
//! ([`write_records_csv`], [`write_layout_picklists`]) leave file handling to
//! the caller.

mod atomic_writer;
pub mod cells;
pub mod layout;
pub mod records;
pub mod validation_rule;
pub mod workbook;
pub mod workflow;

pub use atomic_writer::{AtomicCsvWriter, Quoting};
pub use cells::{metadata_rows, render_metadata_cell};
pub use layout::{write_layout_picklists, NO_PICKLIST_FIELD};
pub use records::{write_records_csv, RecordsCsv, NO_CUSTOM_FIELDS};
pub use validation_rule::export_validation_rules;
pub use workbook::generate_workbook;
pub use workflow::{export_workflow_metadata, WorkflowSection};
