//! Managed identity kinds and their Resource Manager string forms.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of managed identity attached to a resource.
///
/// Only [`IdentityType::None`] and [`IdentityType::UserAssigned`] are
/// meaningful for a [`UserAssignedList`](crate::UserAssignedList); the other
/// kinds exist so that API responses carrying them can still be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityType {
    #[default]
    None,
    SystemAssigned,
    UserAssigned,
    /// `SystemAssigned, UserAssigned`
    SystemAssignedUserAssigned,
    /// `SystemAssigned,UserAssigned` (no space), returned by older API versions.
    LegacySystemAssignedUserAssigned,
}

const ALL: [IdentityType; 5] = [
    IdentityType::None,
    IdentityType::SystemAssigned,
    IdentityType::UserAssigned,
    IdentityType::SystemAssignedUserAssigned,
    IdentityType::LegacySystemAssignedUserAssigned,
];

impl IdentityType {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityType::None => "None",
            IdentityType::SystemAssigned => "SystemAssigned",
            IdentityType::UserAssigned => "UserAssigned",
            IdentityType::SystemAssignedUserAssigned => "SystemAssigned, UserAssigned",
            IdentityType::LegacySystemAssignedUserAssigned => "SystemAssigned,UserAssigned",
        }
    }

    /// Match `input` against every known string form, ignoring ASCII case.
    pub fn parse_insensitively(input: &str) -> Option<Self> {
        ALL.into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(input))
    }

    /// Map legacy spellings onto their canonical kind.
    pub fn normalized(self) -> Self {
        match self {
            IdentityType::LegacySystemAssignedUserAssigned => {
                IdentityType::SystemAssignedUserAssigned
            }
            other => other,
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IdentityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IdentityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        IdentityType::parse_insensitively(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown identity type {raw:?}"))
        })
    }
}
