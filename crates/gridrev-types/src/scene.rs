//! Scene content types: entity groups, region content, region descriptors.
//!
//! These are the units the revision model snapshots and diffs. An
//! [`EntityGroup`] is one linked set of primitives in a region; a
//! [`RegionContent`] is the full revisable content of one region (terrain
//! heightmap plus all groups). [`RegionInfo`] describes a region's identity
//! and position on the simulation grid, which drives adjacency.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, RegionId};

/// One scene object group: a root primitive plus its linked children.
///
/// Groups are the granularity at which diffs are computed and overlays
/// displayed. Attribute edits (move, rotate, scale) arrive as per-primitive
/// local IDs; [`has_child_prim`] resolves them back to the owning group.
///
/// [`has_child_prim`]: EntityGroup::has_child_prim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    /// Stable identity of the group.
    pub id: GroupId,
    /// Display name of the root primitive.
    pub name: String,
    /// Scene-local primitive IDs of every part in the group.
    pub local_ids: BTreeSet<u32>,
    /// Position of the root primitive in region coordinates.
    pub position: [f32; 3],
    /// Orientation of the root primitive as a quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Scale of the root primitive.
    pub scale: [f32; 3],
}

impl EntityGroup {
    /// Return whether any part of this group carries the given local ID.
    pub fn has_child_prim(&self, local_id: u32) -> bool {
        self.local_ids.contains(&local_id)
    }
}

/// The full revisable content of one region: terrain plus object groups.
///
/// This is what a commit snapshots and what a rollback restores wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionContent {
    /// Terrain heightmap samples, row-major.
    pub terrain: Vec<f32>,
    /// All object groups in the region, indexed by group ID.
    pub groups: BTreeMap<GroupId, EntityGroup>,
}

impl RegionContent {
    /// Find the group that owns the given scene-local primitive ID.
    pub fn group_by_local_id(&self, local_id: u32) -> Option<&EntityGroup> {
        self.groups.values().find(|g| g.has_child_prim(local_id))
    }
}

/// Identity and grid placement of a registered region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Stable identity of the region.
    pub id: RegionId,
    /// Human-readable region name, used in operator notices.
    pub name: String,
    /// Column of the region on the simulation grid.
    pub grid_x: i32,
    /// Row of the region on the simulation grid.
    pub grid_y: i32,
}

impl RegionInfo {
    /// Return whether `other` occupies one of the eight grid cells
    /// surrounding this region. A region is not its own neighbor.
    pub fn is_neighbor(&self, other: &Self) -> bool {
        if self.id == other.id {
            return false;
        }
        let dx = i64::from(self.grid_x) - i64::from(other.grid_x);
        let dy = i64::from(self.grid_y) - i64::from(other.grid_y);
        dx.abs() <= 1 && dy.abs() <= 1
    }
}
