//! User-assigned identity resource IDs.
//!
//! A user-assigned identity is addressed by a Resource Manager ID of the form
//!
//! ```text
//! /subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.ManagedIdentity/userAssignedIdentities/{userAssignedIdentityName}
//! ```
//!
//! The API is not consistent about the casing of the static segments
//! (`resourcegroups`, `microsoft.managedidentity`, ...), so IDs read back from
//! it are parsed with [`UserAssignedIdentityId::parse_insensitively`] and
//! re-emitted in canonical form via `Display`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("ID was empty")]
    Empty,

    #[error("ID must start with `/`")]
    NotAbsolute,

    #[error("expected {expected} segments but found {found}")]
    SegmentCount { expected: usize, found: usize },

    #[error("expected segment {position} to be {expected:?} but found {found:?}")]
    UnexpectedSegment {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("segment {name:?} was empty")]
    EmptyValue { name: &'static str },
}

/// One position in the ID template.
enum Segment {
    Static(&'static str),
    Value(&'static str),
}

const TEMPLATE: [Segment; 8] = [
    Segment::Static("subscriptions"),
    Segment::Value("subscriptionId"),
    Segment::Static("resourceGroups"),
    Segment::Value("resourceGroupName"),
    Segment::Static("providers"),
    Segment::Static("Microsoft.ManagedIdentity"),
    Segment::Static("userAssignedIdentities"),
    Segment::Value("userAssignedIdentityName"),
];

/// A structured user-assigned identity ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserAssignedIdentityId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub user_assigned_identity_name: String,
}

impl UserAssignedIdentityId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        user_assigned_identity_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            user_assigned_identity_name: user_assigned_identity_name.into(),
        }
    }

    /// Parse an ID whose static segments are in canonical casing.
    pub fn parse(input: &str) -> Result<Self, ParseIdError> {
        parse_segments(input, false)
    }

    /// Parse an ID, matching static segments without regard to ASCII case.
    ///
    /// User-supplied values (subscription, resource group, name) are kept
    /// exactly as written.
    pub fn parse_insensitively(input: &str) -> Result<Self, ParseIdError> {
        parse_segments(input, true)
    }
}

fn parse_segments(input: &str, insensitive: bool) -> Result<UserAssignedIdentityId, ParseIdError> {
    if input.is_empty() {
        return Err(ParseIdError::Empty);
    }
    let body = input.strip_prefix('/').ok_or(ParseIdError::NotAbsolute)?;
    let body = body.strip_suffix('/').unwrap_or(body);

    let segments: Vec<&str> = body.split('/').collect();
    if segments.len() != TEMPLATE.len() {
        return Err(ParseIdError::SegmentCount {
            expected: TEMPLATE.len(),
            found: segments.len(),
        });
    }

    for (position, (segment, found)) in TEMPLATE.iter().zip(&segments).enumerate() {
        match segment {
            Segment::Static(expected) => {
                let matches = if insensitive {
                    expected.eq_ignore_ascii_case(found)
                } else {
                    expected == found
                };
                if !matches {
                    return Err(ParseIdError::UnexpectedSegment {
                        position,
                        expected: *expected,
                        found: (*found).to_string(),
                    });
                }
            }
            Segment::Value(name) if found.is_empty() => {
                return Err(ParseIdError::EmptyValue { name: *name });
            }
            Segment::Value(_) => {}
        }
    }

    // Length was checked against TEMPLATE above.
    Ok(UserAssignedIdentityId::new(segments[1], segments[3], segments[7]))
}

impl fmt::Display for UserAssignedIdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ManagedIdentity/userAssignedIdentities/{}",
            self.subscription_id, self.resource_group_name, self.user_assigned_identity_name
        )
    }
}

impl FromStr for UserAssignedIdentityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for UserAssignedIdentityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UserAssignedIdentityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_insensitively(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/rg1/providers/Microsoft.ManagedIdentity/userAssignedIdentities/identity1";

    #[test]
    fn test_parse_canonical() {
        let id = UserAssignedIdentityId::parse(CANONICAL).unwrap();
        assert_eq!(id.subscription_id, "12345678-1234-9876-4563-123456789012");
        assert_eq!(id.resource_group_name, "rg1");
        assert_eq!(id.user_assigned_identity_name, "identity1");
        assert_eq!(id.to_string(), CANONICAL);
    }

    #[test]
    fn test_parse_insensitively_canonicalizes_static_segments() {
        let raw = "/SUBSCRIPTIONS/sub/resourcegroups/MyGroup/Providers/microsoft.managedidentity/USERASSIGNEDIDENTITIES/Ident";
        let id = UserAssignedIdentityId::parse_insensitively(raw).unwrap();
        assert_eq!(id.resource_group_name, "MyGroup");
        assert_eq!(id.user_assigned_identity_name, "Ident");
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub/resourceGroups/MyGroup/providers/Microsoft.ManagedIdentity/userAssignedIdentities/Ident"
        );
    }

    #[test]
    fn test_strict_parse_rejects_wrong_casing() {
        let raw = CANONICAL.replace("resourceGroups", "resourcegroups");
        let err = UserAssignedIdentityId::parse(&raw).unwrap_err();
        assert_eq!(
            err,
            ParseIdError::UnexpectedSegment {
                position: 2,
                expected: "resourceGroups",
                found: "resourcegroups".to_string(),
            }
        );
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let raw = format!("{CANONICAL}/");
        let id = UserAssignedIdentityId::parse(&raw).unwrap();
        assert_eq!(id.to_string(), CANONICAL);
    }

    #[test]
    fn test_malformed_ids() {
        assert_eq!(
            UserAssignedIdentityId::parse_insensitively(""),
            Err(ParseIdError::Empty)
        );
        assert_eq!(
            UserAssignedIdentityId::parse_insensitively("not-a-valid-id"),
            Err(ParseIdError::NotAbsolute)
        );
        assert_eq!(
            UserAssignedIdentityId::parse_insensitively("/subscriptions/sub"),
            Err(ParseIdError::SegmentCount {
                expected: 8,
                found: 2
            })
        );
        let wrong_provider = CANONICAL.replace("Microsoft.ManagedIdentity", "Microsoft.Compute");
        assert!(matches!(
            UserAssignedIdentityId::parse_insensitively(&wrong_provider),
            Err(ParseIdError::UnexpectedSegment { position: 5, .. })
        ));
        let empty_rg = CANONICAL.replace("/rg1/", "//");
        assert_eq!(
            UserAssignedIdentityId::parse_insensitively(&empty_rg),
            Err(ParseIdError::EmptyValue {
                name: "resourceGroupName"
            })
        );
    }

    #[test]
    fn test_serde_round_trip_canonicalizes() {
        let raw = CANONICAL.replace("userAssignedIdentities", "userassignedidentities");
        let id: UserAssignedIdentityId = serde_json::from_value(serde_json::json!(raw)).unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!(CANONICAL));
    }
}
