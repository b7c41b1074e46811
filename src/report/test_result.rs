//! Apex test run results.

use serde_json::Value;

use crate::text::{none_value, pad_left_aligned, pad_right_aligned, separator};

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 30;

fn push_row(out: &mut String, label: &str, value: &str) {
    out.push_str(&pad_right_aligned(label, LABEL_WIDTH));
    out.push_str("    ");
    out.push_str(&pad_left_aligned(value, VALUE_WIDTH));
    out.push('\n');
}

/// Formats the records of an `ApexTestResult` query as a text report.
///
/// The report is prefixed with the Apex class name of the last result,
/// followed by one separated block per test method.
pub fn format_test_results(results: &[Value]) -> String {
    let mut class_name = String::new();
    let mut body = String::from(" Test Result\n");

    for result in results {
        class_name = none_value(result.get("ApexClass").and_then(|c| c.get("Name"))).into_owned();

        body.push_str(&separator());
        body.push('\n');
        push_row(&mut body, "MethodName: ", &none_value(result.get("MethodName")));
        push_row(&mut body, "TestTimestamp: ", &none_value(result.get("TestTimestamp")));
        push_row(&mut body, "ApexClass: ", &class_name);
        push_row(&mut body, "Pass/Fail: ", &none_value(result.get("Outcome")));
        push_row(&mut body, "Error Message: ", &none_value(result.get("Message")));
        push_row(&mut body, "Stack Trace: ", &none_value(result.get("StackTrace")));
    }

    class_name + &body
}
