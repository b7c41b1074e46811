//! Formatting and CSV export helpers for Salesforce Tooling API results.
//!
//! Callers pass parsed API responses (`serde_json::Value`) or retrieved
//! metadata files and get back display text or CSV files:
//!
//! - [`report`] renders describe, query, test and execute-anonymous results
//!   as fixed-width text
//! - [`export`] writes workbooks, workflow and validation rule CSVs
//! - [`component`] derives component identity from local file paths
//! - [`metadata`] converts metadata XML into JSON trees

pub mod component;
pub mod error;
pub mod export;
pub mod metadata;
pub mod report;
pub mod settings;
pub mod text;

pub use component::{ComponentAttribute, ComponentIdentity, ComponentRegistry};
pub use error::{AppError, ErrorPresentation};
pub use settings::ToolingSettings;
