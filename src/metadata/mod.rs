//! Retrieved metadata handling.
//!
//! Converts metadata XML (`*.object`, `*.workflow`, SOAP results) into JSON
//! trees consumed by the CSV exports and text reports.

pub mod xml;

pub use xml::{unique_element_value, xml_to_value};
