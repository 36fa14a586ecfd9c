//! Overlay entities: transient visual markers for live-vs-revision deltas.
//!
//! While diff-mode is on, every group that differs from the latest committed
//! revision is represented to privileged observers by one [`Overlay`]. The
//! full overlay set is recomputed wholesale on commit/rollback/diff-mode
//! transitions; single-entity events (attribute change, duplication, undo)
//! update or insert one overlay without touching the rest.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, RegionId};

/// How a group differs from the latest committed revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// The group exists live but not in the revision.
    Added,
    /// The group exists in both, with different attributes.
    Modified,
    /// The group exists in the revision but not live.
    Removed,
}

impl core::fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        };
        write!(f, "{s}")
    }
}

/// One delta marker tying a group to the kind of difference it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// The group the marker describes.
    pub group: GroupId,
    /// The region the group belongs to.
    pub region: RegionId,
    /// The kind of difference.
    pub kind: OverlayKind,
}
