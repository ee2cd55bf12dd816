//! The user-assigned identity list and its expand / flatten conversions.
//!
//! [`UserAssignedList`] sits between the schema layer and the API client:
//! [`expand`] builds it from the user's `identity` block, its `Serialize` impl
//! produces the request body, and [`flatten`] turns an API response back into
//! schema blocks.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::config::{ExpandOptions, ExtraBlocks};
use crate::error::IdentityError;
use crate::identity_type::IdentityType;
use crate::resource_id::UserAssignedIdentityId;
use crate::schema::{FlattenedIdentity, IdentityBlock};

/// An identity configuration that is either `None` or `UserAssigned`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAssignedList {
    pub identity_type: IdentityType,
    /// User-assigned identity resource IDs; only sent when `identity_type`
    /// is `UserAssigned`.
    pub identity_ids: Vec<String>,
}

/// Request body shape. Only these two fields may be sent.
#[derive(Serialize)]
struct WireIdentity<'a> {
    #[serde(rename = "type")]
    identity_type: IdentityType,
    #[serde(rename = "userAssignedIdentities")]
    user_assigned_identities: &'a [String],
}

impl<'a> From<Option<&'a UserAssignedList>> for WireIdentity<'a> {
    fn from(input: Option<&'a UserAssignedList>) -> Self {
        match input {
            Some(list) if list.identity_type == IdentityType::UserAssigned => WireIdentity {
                identity_type: IdentityType::UserAssigned,
                user_assigned_identities: &list.identity_ids,
            },
            _ => WireIdentity {
                identity_type: IdentityType::None,
                user_assigned_identities: &[],
            },
        }
    }
}

impl Serialize for UserAssignedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireIdentity::from(Some(self)).serialize(serializer)
    }
}

/// Response body shape. `type` is matched case-insensitively; kinds this
/// crate does not know decode as `None`.
#[derive(Deserialize)]
struct RawWireIdentity {
    #[serde(rename = "type", default)]
    identity_type: Option<String>,
    #[serde(rename = "userAssignedIdentities", default)]
    user_assigned_identities: Option<Vec<String>>,
}

impl<'de> Deserialize<'de> for UserAssignedList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawWireIdentity::deserialize(deserializer)?;
        let identity_type = match raw.identity_type.as_deref() {
            None => IdentityType::None,
            Some(value) => IdentityType::parse_insensitively(value).unwrap_or_else(|| {
                tracing::debug!(identity_type = value, "unknown identity type; treating as None");
                IdentityType::None
            }),
        };
        Ok(UserAssignedList {
            identity_type,
            identity_ids: raw.user_assigned_identities.unwrap_or_default(),
        })
    }
}

/// Encode `input` as a request body. An absent identity encodes as
/// `{"type":"None","userAssignedIdentities":[]}`.
pub fn to_json(input: Option<&UserAssignedList>) -> Result<Vec<u8>, IdentityError> {
    Ok(serde_json::to_vec(&WireIdentity::from(input))?)
}

/// Expand the schema's `identity` blocks into a [`UserAssignedList`].
///
/// Uses [`ExpandOptions::default`]; see [`expand_with_options`].
pub fn expand(input: &[IdentityBlock]) -> Result<UserAssignedList, IdentityError> {
    expand_with_options(input, &ExpandOptions::default())
}

/// Expand the schema's `identity` blocks into a [`UserAssignedList`].
///
/// Only the first block is consulted. An empty input expands to `None`.
/// Supplying `identity_ids` with any `type` other than `UserAssigned` is a
/// validation error; the IDs themselves are not checked here.
pub fn expand_with_options(
    input: &[IdentityBlock],
    options: &ExpandOptions,
) -> Result<UserAssignedList, IdentityError> {
    expand_first(input.first(), input.len(), options)
}

/// Expand an untyped configuration value: a JSON array of blocks, or `null`.
pub fn expand_value(
    input: &Value,
    options: &ExpandOptions,
) -> Result<UserAssignedList, IdentityError> {
    match input {
        Value::Null => expand_first(None, 0, options),
        Value::Array(blocks) => {
            let first = blocks
                .first()
                .map(|block| IdentityBlock::from_value(block, "identity.0"))
                .transpose()?;
            expand_first(first.as_ref(), blocks.len(), options)
        }
        _ => Err(IdentityError::schema(
            "identity",
            "expected an array of identity blocks",
        )),
    }
}

fn expand_first(
    first: Option<&IdentityBlock>,
    block_count: usize,
    options: &ExpandOptions,
) -> Result<UserAssignedList, IdentityError> {
    if block_count > 1 {
        match options.extra_blocks {
            ExtraBlocks::Ignore => {
                tracing::warn!(
                    ignored = block_count - 1,
                    "multiple identity blocks supplied; using the first"
                );
            }
            ExtraBlocks::Reject => {
                return Err(IdentityError::schema(
                    "identity",
                    format!("at most one identity block is allowed, found {block_count}"),
                ));
            }
        }
    }

    let mut identity_type = IdentityType::None;
    let mut identity_ids = Vec::new();

    if let Some(block) = first {
        if block.identity_type == IdentityType::UserAssigned.as_str() {
            identity_type = IdentityType::UserAssigned;
        }
        identity_ids.extend(block.identity_ids.iter().cloned());
    }

    if !identity_ids.is_empty() && identity_type != IdentityType::UserAssigned {
        return Err(IdentityError::Validation {
            message: format!(
                "`identity_ids` can only be specified when `type` is set to {:?}",
                IdentityType::UserAssigned.as_str()
            ),
        });
    }

    tracing::debug!(
        identity_type = %identity_type,
        count = identity_ids.len(),
        "expanded identity block"
    );

    Ok(UserAssignedList {
        identity_type,
        identity_ids,
    })
}

/// Flatten a [`UserAssignedList`] into schema blocks.
///
/// Returns no blocks for an absent identity or any kind other than
/// `UserAssigned`. Each ID is parsed case-insensitively and re-emitted in
/// canonical form, preserving order; the first unparseable ID aborts the
/// whole flatten.
pub fn flatten(input: Option<&UserAssignedList>) -> Result<Vec<FlattenedIdentity>, IdentityError> {
    let Some(input) = input else {
        return Ok(Vec::new());
    };

    let identity_type = input.identity_type.normalized();
    if identity_type != IdentityType::UserAssigned {
        tracing::debug!(identity_type = %identity_type, "skipping flatten for identity type");
        return Ok(Vec::new());
    }

    let identity_ids = input
        .identity_ids
        .iter()
        .map(|raw| {
            UserAssignedIdentityId::parse_insensitively(raw)
                .map(|id| id.to_string())
                .map_err(|source| IdentityError::Parse {
                    raw: raw.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(vec![FlattenedIdentity {
        identity_type,
        identity_ids,
    }])
}
