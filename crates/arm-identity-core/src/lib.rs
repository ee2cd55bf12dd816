//! # arm-identity-core
//!
//! Converts the user-assigned managed identity `identity` block between its
//! schema form and its Resource Manager wire form.
//!
//! ## Example
//!
//! ```rust
//! use arm_identity_core::{expand, flatten, to_json, IdentityBlock};
//!
//! let id = "/subscriptions/0000/resourcegroups/rg/providers/Microsoft.ManagedIdentity/userAssignedIdentities/id1";
//! let list = expand(&[IdentityBlock::new("UserAssigned", [id])]).unwrap();
//!
//! let body = String::from_utf8(to_json(Some(&list)).unwrap()).unwrap();
//! assert!(body.contains("\"userAssignedIdentities\""));
//!
//! let blocks = flatten(Some(&list)).unwrap();
//! assert!(blocks[0].identity_ids[0].contains("/resourceGroups/rg/"));
//! ```

pub mod config;
pub mod error;
pub mod identity_type;
pub mod resource_id;
pub mod schema;
pub mod user_assigned_list;

pub use config::{ExpandOptions, ExtraBlocks};
pub use error::IdentityError;
pub use identity_type::IdentityType;
pub use resource_id::{ParseIdError, UserAssignedIdentityId};
pub use schema::{FlattenedIdentity, IdentityBlock};
pub use user_assigned_list::{
    expand, expand_value, expand_with_options, flatten, to_json, UserAssignedList,
};
