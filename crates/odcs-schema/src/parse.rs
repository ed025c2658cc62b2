//! # Structured Text Parsing
//!
//! Contracts are YAML; schemas are JSON but YAML is accepted too. Both end
//! up as a `serde_json::Value` tree, which is what the validator consumes.

use serde_json::Value;

/// Parse YAML text (a superset of JSON) into a JSON value tree.
///
/// An empty document parses as `null`. Merge keys (`<<: *anchor`) are
/// expanded before conversion.
pub fn parse_yaml(text: &str) -> Result<Value, String> {
    let mut yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    yaml.apply_merge().map_err(|e| e.to_string())?;
    yaml_to_json_value(&yaml)
}

/// Parse schema text: strict JSON first, YAML as a fallback.
///
/// When both parsers reject the input the JSON diagnostic is reported,
/// since schemas are published as JSON.
pub fn parse_schema_text(text: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(json_err) => match parse_yaml(text) {
            // A bare YAML scalar means the text was neither JSON nor a
            // YAML mapping; keep the JSON diagnostic.
            Ok(value @ (Value::Object(_) | Value::Bool(_))) => Ok(value),
            _ => Err(json_err.to_string()),
        },
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// YAML has a richer type system than JSON (tags, non-string keys), but
/// contracts only use the JSON-compatible subset. Tags are dropped; scalar
/// keys are stringified.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_contract_converts_to_json_tree() {
        let yaml_str = r#"
apiVersion: v3.1.0
kind: DataContract
version: 1.0.0
schema:
  - name: orders
    properties:
      - name: id
        primaryKey: true
        primaryKeyPosition: 1
"#;
        let value = parse_yaml(yaml_str).unwrap();
        assert_eq!(value["apiVersion"], "v3.1.0");
        // Two dots: stays a string, not a float.
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["schema"][0]["name"], "orders");
        assert_eq!(value["schema"][0]["properties"][0]["primaryKey"], true);
        assert_eq!(value["schema"][0]["properties"][0]["primaryKeyPosition"], 1);
    }

    #[test]
    fn empty_yaml_is_null() {
        assert_eq!(parse_yaml("").unwrap(), Value::Null);
    }

    #[test]
    fn malformed_yaml_reports_diagnostic() {
        let err = parse_yaml("kind: [unclosed").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let value = parse_yaml("1: one\ntrue: yes\n").unwrap();
        assert_eq!(value["1"], "one");
        assert_eq!(value["true"], "yes");
    }

    #[test]
    fn merge_keys_expand_into_sequence_items() {
        let yaml_str = r#"
base: &column
  name: id
  required: true
properties:
  - <<: *column
    logicalType: integer
  - <<: *column
    name: order_id
"#;
        let value = parse_yaml(yaml_str).unwrap();
        let first = &value["properties"][0];
        assert_eq!(first["name"], "id");
        assert_eq!(first["required"], true);
        assert_eq!(first["logicalType"], "integer");
        assert!(first.get("<<").is_none());
        // Explicit keys win over merged ones.
        assert_eq!(value["properties"][1]["name"], "order_id");
    }

    #[test]
    fn invalid_merge_value_reports_diagnostic() {
        let err = parse_yaml("item:\n  <<: 5\n").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn tags_are_dropped() {
        let value = parse_yaml("id: !custom abc\n").unwrap();
        assert_eq!(value["id"], "abc");
    }

    #[test]
    fn schema_text_accepts_json() {
        let value = parse_schema_text(r#"{"type": "object", "required": ["id"]}"#).unwrap();
        assert_eq!(value["required"][0], "id");
    }

    #[test]
    fn schema_text_accepts_yaml_mapping() {
        let value = parse_schema_text("type: object\nrequired: [id]\n").unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"][0], "id");
    }

    #[test]
    fn schema_text_rejects_garbage_with_json_diagnostic() {
        let err = parse_schema_text("{ not json").unwrap_err();
        assert!(err.contains("line"), "expected serde_json diagnostic, got: {err}");
    }

    #[test]
    fn schema_text_rejects_bare_scalar() {
        assert!(parse_schema_text("just some words").is_err());
    }
}
