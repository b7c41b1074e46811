//! Component identity derived from local file paths.
//!
//! A component lives at `<workspace>/<Type>/<Name>.<ext>`, e.g.
//! `D:\Workspace\project\ApexClass\AccountChartController.cls`. Both `\` and
//! `/` are accepted as separators so Windows paths resolve on any host.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Path helpers
// ─────────────────────────────────────────────────────────────────────────────

const SEPARATORS: [char; 2] = ['\\', '/'];

/// Name and type of a component, derived from its file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIdentity {
    /// File name without extension (`AccountChartController`).
    pub name: String,
    /// Name of the containing directory (`ApexClass`).
    pub component_type: String,
}

impl ComponentIdentity {
    /// Derives the identity of the component at `file_name`.
    pub fn from_path(file_name: &str) -> Self {
        Self {
            name: component_name(file_name),
            component_type: component_type(file_name),
        }
    }

    /// Key used in the component metadata file: type immediately followed by name.
    pub fn registry_key(&self) -> String {
        format!("{}{}", self.component_type, self.name)
    }
}

/// Returns the component name: the file name with its last extension removed.
///
/// A file without an extension keeps its whole name.
pub fn component_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(SEPARATORS)
        .next()
        .unwrap_or(file_name);

    match base.rfind('.') {
        Some(dot) => base[..dot].to_string(),
        None => base.to_string(),
    }
}

/// Returns the component type: the name of the directory holding the file.
///
/// Returns an empty string when the path has no parent directory.
pub fn component_type(file_name: &str) -> String {
    let mut parts = file_name.rsplit(SEPARATORS);
    parts.next();
    parts.next().unwrap_or("").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Component registry
// ─────────────────────────────────────────────────────────────────────────────

/// Server-side location of a downloaded component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAttribute {
    pub component_url: String,
    pub component_id: String,
}

/// Component metadata persisted after downloading all components, keyed by
/// `<type><name>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentAttribute>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registry from its JSON representation.
    ///
    /// Entries that lack a url or id are ignored.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let components = raw
            .into_iter()
            .filter_map(|(key, value)| {
                serde_json::from_value::<ComponentAttribute>(value)
                    .ok()
                    .map(|attr| (key, attr))
            })
            .collect();
        Ok(Self { components })
    }

    /// Loads the registry from the component metadata file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::SettingsInvalid(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json(&content)?;
        info!(
            "[COMPONENT] Loaded {} components from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Registers or replaces a component.
    pub fn insert(&mut self, identity: &ComponentIdentity, attribute: ComponentAttribute) {
        self.components.insert(identity.registry_key(), attribute);
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Looks up the attribute of the component at `file_name`.
    pub fn get(&self, file_name: &str) -> Option<&ComponentAttribute> {
        let identity = ComponentIdentity::from_path(file_name);
        self.components.get(&identity.registry_key())
    }

    /// Returns `(component_url, component_id)` for the component at `file_name`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ComponentNotFound` if the component has not been
    /// downloaded into the registry.
    pub fn url_and_id(&self, file_name: &str) -> Result<(String, String), AppError> {
        let identity = ComponentIdentity::from_path(file_name);
        let attribute = self
            .components
            .get(&identity.registry_key())
            .ok_or_else(|| AppError::ComponentNotFound {
                component_type: identity.component_type.clone(),
                name: identity.name.clone(),
            })?;

        debug!(
            "[COMPONENT] Resolved {} {}",
            identity.component_type, identity.name
        );
        Ok((
            attribute.component_url.clone(),
            attribute.component_id.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_PATH: &str =
        r"D:\ForcedotcomWorkspace\pro-exercise-20130625\ApexClass\AccountChartController.cls";

    #[test]
    fn name_and_type_from_windows_path() {
        assert_eq!(component_name(WINDOWS_PATH), "AccountChartController");
        assert_eq!(component_type(WINDOWS_PATH), "ApexClass");
    }

    #[test]
    fn name_and_type_from_unix_path() {
        let path = "/home/dev/project/ApexTrigger/AccountTrigger.trigger";
        assert_eq!(component_name(path), "AccountTrigger");
        assert_eq!(component_type(path), "ApexTrigger");
    }

    #[test]
    fn name_without_extension() {
        assert_eq!(component_name(r"C:\ws\ApexPage\Landing"), "Landing");
        assert_eq!(component_name("Landing"), "Landing");
    }

    #[test]
    fn dot_in_directory_is_not_an_extension() {
        assert_eq!(component_name("/ws/v1.2/ApexClass/Foo"), "Foo");
    }

    #[test]
    fn only_last_extension_is_removed() {
        assert_eq!(component_name("/ws/StaticResource/lib.min.js"), "lib.min");
    }

    #[test]
    fn type_of_bare_file_is_empty() {
        assert_eq!(component_type("Foo.cls"), "");
    }

    #[test]
    fn registry_resolves_url_and_id() {
        let registry = ComponentRegistry::from_json(
            r#"{
                "ApexClassAccountChartController": {
                    "component_url": "/services/data/v29.0/sobjects/ApexClass/01p90000001",
                    "component_id": "01p90000001"
                },
                "broken": {"component_id": "x"}
            }"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        let (url, id) = registry.url_and_id(WINDOWS_PATH).unwrap();
        assert_eq!(url, "/services/data/v29.0/sobjects/ApexClass/01p90000001");
        assert_eq!(id, "01p90000001");
    }

    #[test]
    fn missing_component_is_not_found() {
        let registry = ComponentRegistry::new();
        let err = registry.url_and_id(WINDOWS_PATH).unwrap_err();
        match err {
            AppError::ComponentNotFound {
                component_type,
                name,
            } => {
                assert_eq!(component_type, "ApexClass");
                assert_eq!(name, "AccountChartController");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn insert_then_get() {
        let mut registry = ComponentRegistry::new();
        let identity = ComponentIdentity::from_path("/ws/ApexPage/Home.page");
        registry.insert(
            &identity,
            ComponentAttribute {
                component_url: "/apex/Home".into(),
                component_id: "066000000000001".into(),
            },
        );
        assert_eq!(identity.registry_key(), "ApexPageHome");
        assert_eq!(
            registry.get("/other/ApexPage/Home.page").map(|a| a.component_id.as_str()),
            Some("066000000000001")
        );
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("component_metadata.sublime-settings");
        std::fs::write(
            &path,
            r#"{"ApexTriggerT": {"component_url": "/u", "component_id": "01q"}}"#,
        )
        .unwrap();

        let registry = ComponentRegistry::load(&path).unwrap();
        assert!(!registry.is_empty());
        assert_eq!(
            registry.url_and_id("ApexTrigger/T.trigger").unwrap(),
            ("/u".to_string(), "01q".to_string())
        );
    }
}
