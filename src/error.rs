use serde::Serialize;
use thiserror::Error;

/// Patterns (lowercase) that indicate sensitive data not safe for UI display.
/// Used by `contains_sensitive()` for case-insensitive matching.
pub(crate) const SENSITIVE_PATTERNS: &[&str] = &[
    "bearer ",
    "sessionid",
    "session_id",
    "access_token",
    "authorization:",
];

/// Returns true if the message contains any sensitive pattern (case-insensitive).
fn contains_sensitive(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Sanitizes a message for UI display.
/// If sensitive content is detected, returns the fallback instead.
fn sanitize_message(msg: &str, fallback: &str) -> String {
    if contains_sensitive(msg) {
        fallback.into()
    } else {
        msg.to_string()
    }
}

/// User-friendly error presentation for the editor.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPresentation {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Settings ──────────────────────────────────────────────────────────────
    #[error("Invalid settings: {0}")]
    SettingsInvalid(String),

    // ── Components ────────────────────────────────────────────────────────────
    #[error("Component {component_type}{name} not found in component metadata")]
    ComponentNotFound {
        component_type: String,
        name: String,
    },

    // ── Metadata / XML ────────────────────────────────────────────────────────
    #[error("Invalid XML: {0}")]
    XmlInvalid(String),

    // ── File / CSV ────────────────────────────────────────────────────────────
    #[error("CSV export error: {0}")]
    CsvExport(String),

    #[error("File error: {0}")]
    Io(String),
}

impl AppError {
    /// Converts the error into a user-friendly presentation suitable for display.
    /// Never leaks session ids, tokens, or authorization headers.
    pub fn to_presentation(&self) -> ErrorPresentation {
        match self {
            AppError::SettingsInvalid(msg) => ErrorPresentation {
                title: "Invalid Settings".into(),
                message: sanitize_message(msg, "The plugin settings could not be read."),
                action: Some("Check your toolingapi settings file".into()),
            },

            AppError::ComponentNotFound { .. } => ErrorPresentation {
                title: "Component Not Found".into(),
                message: "This component is not in the local component metadata.".into(),
                action: Some("Download all components first".into()),
            },

            AppError::XmlInvalid(msg) => ErrorPresentation {
                title: "Invalid Metadata".into(),
                message: sanitize_message(msg, "The metadata file is not valid XML."),
                action: Some("Retrieve the metadata again".into()),
            },

            AppError::CsvExport(msg) => ErrorPresentation {
                title: "Export Failed".into(),
                message: format!("Could not write the CSV file: {}", sanitize_message(msg, "write error")),
                action: Some("Check the workspace directory and try again".into()),
            },

            AppError::Io(_) => ErrorPresentation {
                title: "File Error".into(),
                message: "A workspace file could not be read or written.".into(),
                action: Some("Check file permissions and try again".into()),
            },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::CsvExport(e.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(e: quick_xml::Error) -> Self {
        AppError::XmlInvalid(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::SettingsInvalid(e.to_string())
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_presentation().serialize(serializer)
    }
}
