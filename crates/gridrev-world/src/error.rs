//! Error types for the `gridrev-world` crate.

use gridrev_types::{GroupId, RegionId};

/// Errors that can occur during live-scene operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The region is not part of this scene.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A group with the same ID already exists in the region.
    #[error("duplicate group id: {0}")]
    DuplicateGroup(GroupId),

    /// The group does not exist in the region.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
}
