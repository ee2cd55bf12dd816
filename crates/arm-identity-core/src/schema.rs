//! Schema-side shapes of the `identity` block.
//!
//! [`IdentityBlock`] is what the configuration layer hands to
//! [`expand`](crate::expand); [`FlattenedIdentity`] is what
//! [`flatten`](crate::flatten) hands back. Both serialize as
//! `{"type": ..., "identity_ids": [...]}`.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::IdentityError;
use crate::identity_type::IdentityType;

/// One `identity` block as written by the user.
///
/// `identity_ids` is a set: duplicates collapse and iteration order is
/// unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityBlock {
    #[serde(rename = "type")]
    pub identity_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub identity_ids: HashSet<String>,
}

impl IdentityBlock {
    pub fn new<I, S>(identity_type: impl Into<String>, identity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identity_type: identity_type.into(),
            identity_ids: identity_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a block from an untyped configuration value.
    ///
    /// `path` locates the block in error messages (e.g. `identity.0`).
    pub fn from_value(value: &Value, path: &str) -> Result<Self, IdentityError> {
        let obj = value
            .as_object()
            .ok_or_else(|| IdentityError::schema(path, "expected an object"))?;

        let type_path = format!("{path}.type");
        let identity_type = match obj.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(IdentityError::schema(
                    type_path,
                    format!("expected a string, found {}", json_kind(other)),
                ))
            }
            None => return Err(IdentityError::schema(type_path, "`type` is required")),
        };

        let ids_path = format!("{path}.identity_ids");
        let identity_ids = match obj.get("identity_ids") {
            None | Some(Value::Null) => HashSet::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(IdentityError::schema(
                        format!("{ids_path}.{i}"),
                        format!("expected a string, found {}", json_kind(other)),
                    )),
                })
                .collect::<Result<HashSet<_>, _>>()?,
            Some(other) => {
                return Err(IdentityError::schema(
                    ids_path,
                    format!("expected an array of strings, found {}", json_kind(other)),
                ))
            }
        };

        Ok(Self {
            identity_type,
            identity_ids,
        })
    }
}

/// One flattened `identity` block, ready to be written back to state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedIdentity {
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub identity_ids: Vec<String>,
}

impl From<FlattenedIdentity> for IdentityBlock {
    fn from(flat: FlattenedIdentity) -> Self {
        IdentityBlock::new(flat.identity_type.as_str(), flat.identity_ids)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashSet<String>>::deserialize(deserializer)?.unwrap_or_default())
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

    #[test]
    fn test_from_value_collapses_duplicates() {
        let value = json!({
            "type": "UserAssigned",
            "identity_ids": ["/a", "/b", "/a"]
        });
        let block = IdentityBlock::from_value(&value, "identity.0").unwrap();
        assert_eq!(block.identity_type, "UserAssigned");
        assert_eq!(block.identity_ids.len(), 2);
        assert!(block.identity_ids.contains("/a"));
        assert!(block.identity_ids.contains("/b"));
    }

    #[test]
    fn test_from_value_null_ids_is_empty() {
        let block =
            IdentityBlock::from_value(&json!({"type": "None", "identity_ids": null}), "identity.0")
                .unwrap();
        assert!(block.identity_ids.is_empty());

        let block = IdentityBlock::from_value(&json!({"type": "None"}), "identity.0").unwrap();
        assert!(block.identity_ids.is_empty());
    }

    #[test]
    fn test_from_value_rejects_malformed_shapes() {
        let cases = [
            (json!("UserAssigned"), "identity.0"),
            (json!({}), "identity.0.type"),
            (json!({"type": 7}), "identity.0.type"),
            (
                json!({"type": "UserAssigned", "identity_ids": "/a"}),
                "identity.0.identity_ids",
            ),
            (
                json!({"type": "UserAssigned", "identity_ids": ["/a", false]}),
                "identity.0.identity_ids.1",
            ),
        ];

        for (value, expected_path) in cases {
            match IdentityBlock::from_value(&value, "identity.0") {
                Err(IdentityError::SchemaError { path, .. }) => {
                    assert_eq!(path, expected_path, "input: {value}")
                }
                other => panic!("expected schema error for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_serde_deserialize_block() {
        let block: IdentityBlock =
            serde_json::from_value(json!({"type": "UserAssigned", "identity_ids": null})).unwrap();
        assert_eq!(block, IdentityBlock::new("UserAssigned", Vec::<String>::new()));
    }

    #[test]
    fn test_flattened_identity_serializes_schema_keys() {
        let flat = FlattenedIdentity {
            identity_type: IdentityType::UserAssigned,
            identity_ids: vec!["/x".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&flat).unwrap(),
            json!({"type": "UserAssigned", "identity_ids": ["/x"]})
        );
    }
}
