//! The in-memory revision model: commit, rollback, and diff evaluation.
//!
//! [`MemoryRevisionModel`] implements the controller's revision contract
//! over append-only in-memory histories. Diffs compare a region's live
//! content (read through the scene handle) against its latest revision,
//! classifying each group as added, modified, or removed. Overlay
//! bookkeeping -- which groups currently carry a delta marker -- lives
//! here too, keyed by group.
//!
//! Terrain differences are committed and rolled back with the content but
//! carry no per-group overlay.
//!
//! Only the controller's dispatch-loop task calls the mutating methods, so
//! the model holds no internal locks.

use std::collections::BTreeMap;

use gridrev_core::traits::{ModelError, RevisionModel, SceneAccess, SceneError};
use gridrev_types::{
    EntityGroup, GroupId, Overlay, OverlayKind, RegionContent, RegionId, RevisionId,
};
use tracing::{debug, info};

use crate::revision::RevisionHistory;

/// Revision histories and overlay bookkeeping for all regions, backed by
/// a shared scene handle for live content.
#[derive(Debug)]
pub struct MemoryRevisionModel<S> {
    scene: S,
    histories: BTreeMap<RegionId, RevisionHistory>,
    overlays: BTreeMap<GroupId, Overlay>,
}

impl<S: SceneAccess> MemoryRevisionModel<S> {
    /// Create a model with empty histories over the given scene handle.
    pub const fn new(scene: S) -> Self {
        Self {
            scene,
            histories: BTreeMap::new(),
            overlays: BTreeMap::new(),
        }
    }

    /// Number of revisions committed for a region.
    pub fn revision_count(&self, region: RegionId) -> usize {
        self.histories.get(&region).map_or(0, RevisionHistory::len)
    }

    /// Compute the full delta between a region's live content and its
    /// latest revision. With no revision yet, every live group is new.
    fn diff_region(&self, region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        let live = self
            .scene
            .region_content(region)
            .ok_or(ModelError::RegionNotFound { region })?;
        let latest = self.histories.get(&region).and_then(RevisionHistory::latest);

        let mut delta = Vec::new();
        let empty = RegionContent::default();
        let committed = latest.map_or(&empty, |rev| &rev.content);

        for (id, group) in &live.groups {
            match committed.groups.get(id) {
                None => delta.push(Overlay {
                    group: *id,
                    region,
                    kind: OverlayKind::Added,
                }),
                Some(old) if old != group => delta.push(Overlay {
                    group: *id,
                    region,
                    kind: OverlayKind::Modified,
                }),
                Some(_) => {}
            }
        }
        for id in committed.groups.keys() {
            if !live.groups.contains_key(id) {
                delta.push(Overlay {
                    group: *id,
                    region,
                    kind: OverlayKind::Removed,
                });
            }
        }
        Ok(delta)
    }
}

impl<S: SceneAccess> RevisionModel for MemoryRevisionModel<S> {
    fn commit_region(
        &mut self,
        region: RegionId,
        message: &str,
    ) -> Result<RevisionId, ModelError> {
        let content = self
            .scene
            .region_content(region)
            .ok_or(ModelError::RegionNotFound { region })?;
        let history = self.histories.entry(region).or_default();
        let id = history.commit(content, message);
        info!(%region, revision = %id, seq = history.len(), "Committed region revision");
        Ok(id)
    }

    fn rollback_region(&mut self, region: RegionId) -> Result<(), ModelError> {
        let latest = self
            .histories
            .get(&region)
            .and_then(RevisionHistory::latest)
            .ok_or(ModelError::NoRevision { region })?;
        info!(%region, revision = %latest.id, "Rolling region back to latest revision");
        self.scene
            .replace_content(region, latest.content.clone())
            .map_err(|SceneError::RegionNotFound { region }| ModelError::RegionNotFound { region })
    }

    fn update_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        let delta = self.diff_region(region)?;
        self.overlays.retain(|_, overlay| overlay.region != region);
        for overlay in &delta {
            self.overlays.insert(overlay.group, *overlay);
        }
        debug!(%region, overlays = delta.len(), "Recomputed region overlays");
        Ok(delta)
    }

    fn entities_missing_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        let delta = self.diff_region(region)?;
        let mut fresh = Vec::new();
        for overlay in delta {
            if !self.overlays.contains_key(&overlay.group) {
                self.overlays.insert(overlay.group, overlay);
                fresh.push(overlay);
            }
        }
        Ok(fresh)
    }

    fn update_group_overlay(
        &mut self,
        region: RegionId,
        group: &EntityGroup,
    ) -> Result<Option<Overlay>, ModelError> {
        let latest = self.histories.get(&region).and_then(RevisionHistory::latest);
        let committed = latest.and_then(|rev| rev.content.groups.get(&group.id));

        let kind = match committed {
            None => Some(OverlayKind::Added),
            Some(old) if old != group => Some(OverlayKind::Modified),
            Some(_) => None,
        };

        match kind {
            Some(kind) => {
                let overlay = Overlay {
                    group: group.id,
                    region,
                    kind,
                };
                self.overlays.insert(group.id, overlay);
                Ok(Some(overlay))
            }
            None => {
                // The group drifted back to its committed state.
                self.overlays.remove(&group.id);
                Ok(None)
            }
        }
    }

    fn overlay_affected_by_undo(&self, target: GroupId) -> Option<Overlay> {
        self.overlays.get(&target).copied()
    }

    fn clear_all_overlays(&mut self) {
        self.overlays.clear();
    }

    fn remove_or_update_deleted(&mut self, group: &EntityGroup) {
        // If the latest revision of some region still contains the group,
        // the deletion is itself a delta; otherwise the group never made
        // it into a revision and its marker simply goes away.
        let committed_region = self.histories.iter().find_map(|(region, history)| {
            history
                .latest()
                .filter(|rev| rev.content.groups.contains_key(&group.id))
                .map(|_| *region)
        });

        match committed_region {
            Some(region) => {
                self.overlays.insert(
                    group.id,
                    Overlay {
                        group: group.id,
                        region,
                        kind: OverlayKind::Removed,
                    },
                );
            }
            None => {
                self.overlays.remove(&group.id);
            }
        }
    }

    fn current_overlays(&self) -> Vec<Overlay> {
        self.overlays.values().copied().collect()
    }
}
