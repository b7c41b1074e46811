//! Plain-text reports for the editor output panel.
//!
//! Each formatter takes a parsed API response and returns the text to show.

pub mod describe;
pub mod execute_anonymous;
pub mod messages;
pub mod query;
pub mod test_result;

pub use describe::format_sobject_describe;
pub use execute_anonymous::format_execute_anonymous;
pub use messages::format_error_message;
pub use query::{format_query_result, NO_QUERY_RESULT};
pub use test_result::format_test_results;
