//! Recording collaborators for controller tests.
//!
//! These stand in for the revision model, broadcaster, and scene, logging
//! every call so tests can assert on exact call sequences.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use gridrev_types::{
    EntityGroup, GroupId, Overlay, OverlayKind, RegionContent, RegionId, RegionInfo, RevisionId,
    SessionId,
};
use uuid::Uuid;

use crate::traits::{DiffBroadcaster, ModelError, RevisionModel, SceneAccess, SceneError};

/// One recorded call into the revision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModelCall {
    Commit(RegionId, String),
    Rollback(RegionId),
    UpdateOverlays(RegionId),
    Missing(RegionId),
    UpdateGroup(RegionId, GroupId),
    ClearAll,
    RemoveDeleted(GroupId),
}

/// A revision model that records calls and returns canned answers.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingModel {
    calls: Arc<Mutex<Vec<ModelCall>>>,
    undo_overlay: Arc<Mutex<Option<Overlay>>>,
    current: Arc<Mutex<Vec<Overlay>>>,
}

impl RecordingModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn set_undo_overlay(&self, overlay: Overlay) {
        *self.undo_overlay.lock().unwrap() = Some(overlay);
    }

    pub(crate) fn set_current_overlays(&self, overlays: Vec<Overlay>) {
        *self.current.lock().unwrap() = overlays;
    }

    fn record(&self, call: ModelCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RevisionModel for RecordingModel {
    fn commit_region(
        &mut self,
        region: RegionId,
        message: &str,
    ) -> Result<RevisionId, ModelError> {
        self.record(ModelCall::Commit(region, message.to_owned()));
        Ok(RevisionId::new())
    }

    fn rollback_region(&mut self, region: RegionId) -> Result<(), ModelError> {
        self.record(ModelCall::Rollback(region));
        Ok(())
    }

    fn update_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        self.record(ModelCall::UpdateOverlays(region));
        Ok(Vec::new())
    }

    fn entities_missing_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        self.record(ModelCall::Missing(region));
        Ok(Vec::new())
    }

    fn update_group_overlay(
        &mut self,
        region: RegionId,
        group: &EntityGroup,
    ) -> Result<Option<Overlay>, ModelError> {
        self.record(ModelCall::UpdateGroup(region, group.id));
        Ok(Some(Overlay {
            group: group.id,
            region,
            kind: OverlayKind::Modified,
        }))
    }

    fn overlay_affected_by_undo(&self, _target: GroupId) -> Option<Overlay> {
        *self.undo_overlay.lock().unwrap()
    }

    fn clear_all_overlays(&mut self) {
        self.record(ModelCall::ClearAll);
    }

    fn remove_or_update_deleted(&mut self, group: &EntityGroup) {
        self.record(ModelCall::RemoveDeleted(group.id));
    }

    fn current_overlays(&self) -> Vec<Overlay> {
        self.current.lock().unwrap().clone()
    }
}

/// A revision model whose fallible operations all fail.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FailingModel;

impl FailingModel {
    fn failure() -> ModelError {
        ModelError::Store {
            message: String::from("backing store unavailable"),
        }
    }
}

impl RevisionModel for FailingModel {
    fn commit_region(
        &mut self,
        _region: RegionId,
        _message: &str,
    ) -> Result<RevisionId, ModelError> {
        Err(Self::failure())
    }

    fn rollback_region(&mut self, _region: RegionId) -> Result<(), ModelError> {
        Err(Self::failure())
    }

    fn update_overlays(&mut self, _region: RegionId) -> Result<Vec<Overlay>, ModelError> {
        Err(Self::failure())
    }

    fn entities_missing_overlays(
        &mut self,
        _region: RegionId,
    ) -> Result<Vec<Overlay>, ModelError> {
        Err(Self::failure())
    }

    fn update_group_overlay(
        &mut self,
        _region: RegionId,
        _group: &EntityGroup,
    ) -> Result<Option<Overlay>, ModelError> {
        Err(Self::failure())
    }

    fn overlay_affected_by_undo(&self, _target: GroupId) -> Option<Overlay> {
        None
    }

    fn clear_all_overlays(&mut self) {}

    fn remove_or_update_deleted(&mut self, _group: &EntityGroup) {}

    fn current_overlays(&self) -> Vec<Overlay> {
        Vec::new()
    }
}

/// One recorded call into the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewCall {
    Notice(RegionId, String),
    Auras(usize),
    Entity(GroupId),
    Overlay(GroupId),
    HideAuras,
    HideOverlays,
    RecentChanges(usize),
    NewClient(SessionId, usize),
}

/// A broadcaster that records every call.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingView {
    calls: Arc<Mutex<Vec<ViewCall>>>,
}

impl RecordingView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DiffBroadcaster for RecordingView {
    fn display_auras(&self, overlays: &[Overlay]) {
        self.record(ViewCall::Auras(overlays.len()));
    }

    fn display_entity(&self, overlay: &Overlay) {
        self.record(ViewCall::Entity(overlay.group));
    }

    fn display_overlay(&self, group: GroupId) {
        self.record(ViewCall::Overlay(group));
    }

    fn hide_all_auras(&self) {
        self.record(ViewCall::HideAuras);
    }

    fn hide_all_overlays(&self) {
        self.record(ViewCall::HideOverlays);
    }

    fn display_recent_changes(&self, overlays: &[Overlay]) {
        self.record(ViewCall::RecentChanges(overlays.len()));
    }

    fn send_overlays_to_new_client(&self, session: SessionId, overlays: &[Overlay]) {
        self.record(ViewCall::NewClient(session, overlays.len()));
    }

    fn send_notice(&self, region: RegionId, text: &str) {
        self.record(ViewCall::Notice(region, text.to_owned()));
    }
}

/// A minimal in-memory scene for tests.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestScene {
    regions: Arc<Mutex<BTreeMap<RegionId, RegionContent>>>,
    presences: Arc<Mutex<BTreeMap<(RegionId, SessionId), Uuid>>>,
}

impl TestScene {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_group(&self, region: RegionId, group: EntityGroup) {
        let mut regions = self.regions.lock().unwrap();
        regions.entry(region).or_default().groups.insert(group.id, group);
    }

    pub(crate) fn put_presence(&self, region: RegionId, session: SessionId, avatar: Uuid) {
        self.presences.lock().unwrap().insert((region, session), avatar);
    }
}

impl SceneAccess for TestScene {
    fn group_by_local_id(&self, local_id: u32) -> Option<(RegionId, EntityGroup)> {
        let regions = self.regions.lock().unwrap();
        for (region, content) in regions.iter() {
            if let Some(group) = content.group_by_local_id(local_id) {
                return Some((*region, group.clone()));
            }
        }
        None
    }

    fn region_content(&self, region: RegionId) -> Option<RegionContent> {
        self.regions.lock().unwrap().get(&region).cloned()
    }

    fn replace_content(&self, region: RegionId, content: RegionContent) -> Result<(), SceneError> {
        self.regions.lock().unwrap().insert(region, content);
        Ok(())
    }

    fn presence(&self, region: RegionId, session: SessionId) -> Option<Uuid> {
        self.presences.lock().unwrap().get(&(region, session)).copied()
    }
}

/// Build a group with the given primitive local IDs.
pub(crate) fn make_group(name: &str, local_ids: &[u32]) -> EntityGroup {
    EntityGroup {
        id: GroupId::new(),
        name: name.to_owned(),
        local_ids: local_ids.iter().copied().collect(),
        position: [128.0, 128.0, 25.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    }
}

/// Build a region descriptor at the given grid cell.
pub(crate) fn make_region(name: &str, x: i32, y: i32) -> RegionInfo {
    RegionInfo {
        id: RegionId::new(),
        name: name.to_owned(),
        grid_x: x,
        grid_y: y,
    }
}
