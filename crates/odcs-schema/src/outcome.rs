//! # Validation Outcome
//!
//! The result of validating one contract against one schema. Violations
//! are expected output, not errors: a run that finds ten problems is a
//! successful run that produced an invalid verdict.

use std::fmt;

use serde_json::Value;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Property name inside a mapping.
    Key(String),
    /// Position inside a sequence.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path from the document root to the offending node. Empty means root.
    pub path: Vec<PathSegment>,
    /// Human-readable description from the schema validator.
    pub message: String,
}

impl Violation {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Build a violation from a JSON Pointer into `instance`.
    ///
    /// Pointer tokens are unescaped (`~1` → `/`, `~0` → `~`). A numeric token
    /// becomes an [`PathSegment::Index`] only when the node it steps into is
    /// an array, so a mapping key such as `"2024"` stays a key.
    pub fn from_pointer(instance: &Value, pointer: &str, message: impl Into<String>) -> Self {
        Self::new(pointer_segments(instance, pointer), message)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

fn pointer_segments(instance: &Value, pointer: &str) -> Vec<PathSegment> {
    if pointer.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut node = Some(instance);
    for raw in pointer.strip_prefix('/').unwrap_or(pointer).split('/') {
        let token = raw.replace("~1", "/").replace("~0", "~");
        let segment = match (node, token.parse::<usize>()) {
            (Some(Value::Array(_)), Ok(index)) => PathSegment::Index(index),
            _ => PathSegment::Key(token),
        };
        node = match (&segment, node) {
            (PathSegment::Index(i), Some(Value::Array(items))) => items.get(*i),
            (PathSegment::Key(k), Some(Value::Object(map))) => map.get(k),
            _ => None,
        };
        segments.push(segment);
    }
    segments
}

/// The verdict of one validation run.
///
/// Only the violation list is stored; validity is derived from it, so an
/// outcome can never claim to be valid while carrying violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn valid() -> Self {
        Self::default()
    }

    /// An outcome from an ordered list of violations. An empty list is valid.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in validator traversal order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validity_tracks_violations() {
        assert!(ValidationOutcome::valid().is_valid());
        assert!(ValidationOutcome::from_violations(Vec::new()).is_valid());

        let outcome = ValidationOutcome::from_violations(vec![Violation::new(
            Vec::new(),
            r#""status" is a required property"#,
        )]);
        assert!(!outcome.is_valid());
        assert_eq!(outcome.len(), 1);
    }

    #[test]
    fn empty_pointer_is_root() {
        let v = Violation::from_pointer(&json!({}), "", "msg");
        assert!(v.is_root());
    }

    #[test]
    fn pointer_distinguishes_indices_from_keys() {
        let doc = json!({
            "schema": [
                {"name": "t", "properties": [{"name": "id"}, {"name": "amount"}]}
            ],
            "customProperties": {"2024": {"x": 1}}
        });

        let v = Violation::from_pointer(&doc, "/schema/0/properties/1/logicalType", "msg");
        assert_eq!(
            v.path,
            vec![
                PathSegment::Key("schema".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("properties".to_string()),
                PathSegment::Index(1),
                PathSegment::Key("logicalType".to_string()),
            ]
        );

        let v = Violation::from_pointer(&doc, "/customProperties/2024/x", "msg");
        assert_eq!(v.path[1], PathSegment::Key("2024".to_string()));
    }

    #[test]
    fn pointer_tokens_are_unescaped() {
        let doc = json!({"a/b": {"c~d": 1}});
        let v = Violation::from_pointer(&doc, "/a~1b/c~0d", "msg");
        assert_eq!(
            v.path,
            vec![
                PathSegment::Key("a/b".to_string()),
                PathSegment::Key("c~d".to_string()),
            ]
        );
    }

    #[test]
    fn leading_empty_key_is_kept() {
        let doc = json!({"": {"x": 1}});
        let v = Violation::from_pointer(&doc, "//x", "msg");
        assert_eq!(
            v.path,
            vec![
                PathSegment::Key(String::new()),
                PathSegment::Key("x".to_string()),
            ]
        );
    }

    #[test]
    fn pointer_past_missing_node_falls_back_to_keys() {
        let v = Violation::from_pointer(&json!({}), "/missing/0", "msg");
        assert_eq!(
            v.path,
            vec![
                PathSegment::Key("missing".to_string()),
                PathSegment::Key("0".to_string()),
            ]
        );
    }
}
