//! Configuration for identity expansion.

use serde::{Deserialize, Serialize};

/// What to do when the schema input carries more than one identity block.
///
/// The schema layer is expected to cap the `identity` block at one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraBlocks {
    /// Use the first block and log a warning for the rest (default).
    #[default]
    Ignore,
    /// Fail with a schema error.
    Reject,
}

/// Options for [`expand_with_options`](crate::expand_with_options).
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `extra-blocks`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExpandOptions {
    pub extra_blocks: ExtraBlocks,
}
