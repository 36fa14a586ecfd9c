//! The live scene: current content and presences of every managed region.
//!
//! [`Scene`] holds the mutable, continuously edited state that the revision
//! model snapshots on commit and overwrites on rollback. The simulation
//! proper lives elsewhere; this structure is the content-management view of
//! it -- terrain, object groups, and which sessions are present where.

use std::collections::BTreeMap;

use gridrev_types::{EntityGroup, GroupId, RegionContent, RegionId, SessionId};
use tracing::debug;
use uuid::Uuid;

use crate::error::WorldError;

/// Live content and presences for a set of regions.
#[derive(Debug, Default)]
pub struct Scene {
    /// Current content per region.
    regions: BTreeMap<RegionId, RegionContent>,
    /// In-world presences: (region, session) -> avatar ID.
    presences: BTreeMap<RegionId, BTreeMap<SessionId, Uuid>>,
}

impl Scene {
    /// Create an empty scene.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            presences: BTreeMap::new(),
        }
    }

    /// Add a region with empty content. Adding an existing region is a
    /// no-op; its content is preserved.
    pub fn add_region(&mut self, region: RegionId) {
        self.regions.entry(region).or_default();
        self.presences.entry(region).or_default();
    }

    /// Number of managed regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// A region's current content.
    pub fn content(&self, region: RegionId) -> Option<&RegionContent> {
        self.regions.get(&region)
    }

    /// Replace a region's content wholesale. This is the rollback path.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the region is unknown.
    pub fn replace_content(
        &mut self,
        region: RegionId,
        content: RegionContent,
    ) -> Result<(), WorldError> {
        let slot = self
            .regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        debug!(%region, groups = content.groups.len(), "Replacing region content");
        *slot = content;
        Ok(())
    }

    /// Insert a new group into a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the region is unknown, or
    /// [`WorldError::DuplicateGroup`] if the group ID is already present.
    pub fn add_group(&mut self, region: RegionId, group: EntityGroup) -> Result<(), WorldError> {
        let content = self
            .regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        if content.groups.contains_key(&group.id) {
            return Err(WorldError::DuplicateGroup(group.id));
        }
        content.groups.insert(group.id, group);
        Ok(())
    }

    /// Replace an existing group's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] or [`WorldError::GroupNotFound`].
    pub fn update_group(&mut self, region: RegionId, group: EntityGroup) -> Result<(), WorldError> {
        let content = self
            .regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        let slot = content
            .groups
            .get_mut(&group.id)
            .ok_or(WorldError::GroupNotFound(group.id))?;
        *slot = group;
        Ok(())
    }

    /// Remove a group from a region, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] or [`WorldError::GroupNotFound`].
    pub fn remove_group(
        &mut self,
        region: RegionId,
        group: GroupId,
    ) -> Result<EntityGroup, WorldError> {
        let content = self
            .regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        content
            .groups
            .remove(&group)
            .ok_or(WorldError::GroupNotFound(group))
    }

    /// Overwrite a region's terrain heightmap.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the region is unknown.
    pub fn set_terrain(&mut self, region: RegionId, terrain: Vec<f32>) -> Result<(), WorldError> {
        let content = self
            .regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        content.terrain = terrain;
        Ok(())
    }

    /// Find the group owning a scene-local primitive ID, searching every
    /// region.
    pub fn group_by_local_id(&self, local_id: u32) -> Option<(RegionId, &EntityGroup)> {
        for (region, content) in &self.regions {
            if let Some(group) = content.group_by_local_id(local_id) {
                return Some((*region, group));
            }
        }
        None
    }

    /// Record a session's presence in a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the region is unknown.
    pub fn add_presence(
        &mut self,
        region: RegionId,
        session: SessionId,
        avatar: Uuid,
    ) -> Result<(), WorldError> {
        let table = self
            .presences
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?;
        table.insert(session, avatar);
        Ok(())
    }

    /// Remove a session's presence from every region it appears in.
    pub fn remove_presence(&mut self, session: SessionId) {
        for table in self.presences.values_mut() {
            table.remove(&session);
        }
    }

    /// Resolve a session's presence in a region to its avatar ID.
    pub fn presence(&self, region: RegionId, session: SessionId) -> Option<Uuid> {
        self.presences.get(&region)?.get(&session).copied()
    }
}
