//! The JSON artifact consumed by the viewer.
//!
//! Shape: `{ dataset: { revision: { field: { entity_name: record } } } }`.
//! Parsing is strict at the root (the document must be valid JSON and an
//! object) and lenient below it: a dataset whose value is not an object is
//! reported as absent rather than rejected.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{Result, TypeError};

/// One dataset: revision label to per-field records, in document order.
pub type RevisionMap = Map<String, Value>;

/// A parsed artifact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Artifact {
    root: Map<String, Value>,
}

impl Artifact {
    /// Wrap an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(TypeError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse artifact text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Read and parse an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TypeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            datasets = artifact.root.len(),
            revisions = artifact.revision_labels().len(),
            "artifact loaded"
        );
        Ok(artifact)
    }

    /// Dataset names in document order.
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// The first dataset in document order, used when none is named.
    pub fn default_dataset(&self) -> Option<&str> {
        self.dataset_names().next()
    }

    /// Look up a dataset. Absent or non-object datasets yield `None`.
    pub fn dataset(&self, name: &str) -> Option<&RevisionMap> {
        self.root.get(name).and_then(Value::as_object)
    }

    /// Every revision label across all datasets, first occurrence order.
    pub fn revision_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for dataset in self.root.values().filter_map(Value::as_object) {
            for label in dataset.keys() {
                if !labels.contains(&label.as_str()) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Artifact {
        Artifact::from_value(json!({
            "mainnet": {
                "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
                "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "2"] } }
            },
            "minimal": {
                "PHASE0": {},
                "BELLATRIX": {}
            },
            "broken": 42
        }))
        .unwrap()
    }

    #[test]
    fn datasets_in_document_order() {
        let artifact = sample();
        let names: Vec<&str> = artifact.dataset_names().collect();
        assert_eq!(names, vec!["mainnet", "minimal", "broken"]);
        assert_eq!(artifact.default_dataset(), Some("mainnet"));
    }

    #[test]
    fn non_object_dataset_is_absent() {
        let artifact = sample();
        assert!(artifact.dataset("broken").is_none());
        assert!(artifact.dataset("missing").is_none());
        assert!(artifact.dataset("mainnet").is_some());
    }

    #[test]
    fn revision_order_is_preserved() {
        let artifact = Artifact::from_json_str(
            r#"{"m": {"DENEB": {}, "PHASE0": {}, "ALTAIR": {}}}"#,
        )
        .unwrap();
        let revisions: Vec<&String> = artifact.dataset("m").unwrap().keys().collect();
        assert_eq!(revisions, vec!["DENEB", "PHASE0", "ALTAIR"]);
    }

    #[test]
    fn revision_labels_deduplicated() {
        let artifact = sample();
        assert_eq!(artifact.revision_labels(), vec!["PHASE0", "ALTAIR", "BELLATRIX"]);
    }

    #[test]
    fn root_must_be_object() {
        let err = Artifact::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, TypeError::NotAnObject("array")));
    }

    #[test]
    fn invalid_json_fails_closed() {
        let err = Artifact::from_json_str("{\"mainnet\": ").unwrap_err();
        assert!(matches!(err, TypeError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"mainnet": {"PHASE0": {}}}"#).unwrap();
        let artifact = Artifact::load(&path).unwrap();
        assert!(!artifact.is_empty());
        assert_eq!(artifact.revision_labels(), vec!["PHASE0"]);
    }

    #[test]
    fn load_missing_file() {
        let err = Artifact::load(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(matches!(err, TypeError::Io { .. }));
    }
}
