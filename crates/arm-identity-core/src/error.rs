//! Error types for identity conversion.

use thiserror::Error;

use crate::resource_id::ParseIdError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("parsing {raw:?} as a User Assigned Identity ID: {source}")]
    Parse {
        raw: String,
        #[source]
        source: ParseIdError,
    },

    #[error("JSON encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl IdentityError {
    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by the shape or content of the user's configuration
    /// (`Validation` and `SchemaError`).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::SchemaError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_raw_value() {
        let err = IdentityError::Parse {
            raw: "not-a-valid-id".to_string(),
            source: ParseIdError::NotAbsolute,
        };
        let msg = err.to_string();
        assert!(msg.contains("\"not-a-valid-id\""), "got: {msg}");
        assert!(msg.contains("User Assigned Identity ID"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_schema_error_is_validation() {
        let err = IdentityError::schema("identity.0.type", "expected a string");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Schema error at identity.0.type: expected a string"
        );
    }
}
