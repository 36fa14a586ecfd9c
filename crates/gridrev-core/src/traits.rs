//! Contracts between the controller and its external collaborators.
//!
//! The controller never touches scene simulation, revision persistence, or
//! observer delivery directly; it drives them through these traits. The
//! dispatch loop is the sole caller of [`RevisionModel`] and
//! [`DiffBroadcaster`] for engine-initiated work, which is what lets
//! implementations stay free of internal locking on that path.

use gridrev_types::{
    EntityGroup, GroupId, Overlay, RegionContent, RegionId, RevisionId, SessionId,
};
use uuid::Uuid;

/// Errors surfaced by [`RevisionModel`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The region has no committed revision to roll back to or diff against.
    #[error("region {region} has no committed revision")]
    NoRevision {
        /// The region in question.
        region: RegionId,
    },

    /// The region is unknown to the live scene.
    #[error("region not found: {region}")]
    RegionNotFound {
        /// The missing region.
        region: RegionId,
    },

    /// The revision persistence layer failed.
    #[error("revision store error: {message}")]
    Store {
        /// Description of the failure.
        message: String,
    },
}

/// Errors surfaced by [`SceneAccess`] mutations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The region is unknown to the live scene.
    #[error("region not found: {region}")]
    RegionNotFound {
        /// The missing region.
        region: RegionId,
    },
}

/// Revision storage and diff evaluation, implemented externally to the
/// controller. Only the dispatch-loop task calls these methods.
pub trait RevisionModel: Send {
    /// Persist a new latest revision of the region, tagged with `message`.
    fn commit_region(&mut self, region: RegionId, message: &str)
    -> Result<RevisionId, ModelError>;

    /// Restore the region's live content to its latest committed revision,
    /// discarding live edits. Idempotent: a second immediate rollback is a
    /// content no-op.
    fn rollback_region(&mut self, region: RegionId) -> Result<(), ModelError>;

    /// Recompute the region's full overlay set against its latest revision,
    /// replacing any previous entries for the region. Returns the region's
    /// overlays after the recompute.
    fn update_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError>;

    /// Scan the region for live groups that differ from the latest revision
    /// but have no overlay entry yet. New entries are recorded and returned.
    fn entities_missing_overlays(&mut self, region: RegionId) -> Result<Vec<Overlay>, ModelError>;

    /// Re-evaluate a single group against the latest revision, updating or
    /// removing its overlay entry. Returns the entry if the group still
    /// differs.
    fn update_group_overlay(
        &mut self,
        region: RegionId,
        group: &EntityGroup,
    ) -> Result<Option<Overlay>, ModelError>;

    /// Look up the overlay entry for the group an undo targeted.
    fn overlay_affected_by_undo(&self, target: GroupId) -> Option<Overlay>;

    /// Drop all overlay bookkeeping, ahead of a full recompute.
    fn clear_all_overlays(&mut self);

    /// Record a group deletion. If the latest revision still contains the
    /// group its overlay becomes a removal marker; otherwise the entry is
    /// dropped. Runs regardless of overlay visibility.
    fn remove_or_update_deleted(&mut self, group: &EntityGroup);

    /// The full current overlay set, for wholesale redisplay.
    fn current_overlays(&self) -> Vec<Overlay>;
}

/// Delivery of overlay entities and notices to connected observers.
///
/// All methods are fire-and-forget: delivery failures are the
/// implementation's concern and never propagate back into the loop.
pub trait DiffBroadcaster: Send {
    /// Show difference auras for the given overlay entries.
    fn display_auras(&self, overlays: &[Overlay]);

    /// Show (or refresh) a single overlay entity.
    fn display_entity(&self, overlay: &Overlay);

    /// Refresh the overlay entity for a group, if one is being shown.
    fn display_overlay(&self, group: GroupId);

    /// Tear down all difference auras.
    fn hide_all_auras(&self);

    /// Tear down all overlay entities.
    fn hide_all_overlays(&self);

    /// Push the freshly recomputed overlay set to all observers.
    fn display_recent_changes(&self, overlays: &[Overlay]);

    /// Push the current overlay set to a newly joined observer.
    fn send_overlays_to_new_client(&self, session: SessionId, overlays: &[Overlay]);

    /// Send a plain-text notice to the given region.
    fn send_notice(&self, region: RegionId, text: &str);
}

/// Read/replace access to the live scene, shared with the simulation.
pub trait SceneAccess: Send + Sync {
    /// Find the group owning a scene-local primitive ID, searching every
    /// managed region. Returns the owning region alongside a copy of the
    /// group.
    fn group_by_local_id(&self, local_id: u32) -> Option<(RegionId, EntityGroup)>;

    /// Snapshot a region's full live content.
    fn region_content(&self, region: RegionId) -> Option<RegionContent>;

    /// Replace a region's live content wholesale (rollback path).
    fn replace_content(&self, region: RegionId, content: RegionContent) -> Result<(), SceneError>;

    /// Resolve a session's in-world presence in a region to its avatar ID.
    /// Returns `None` if the session has no presence there (for example, it
    /// disconnected between event capture and dispatch).
    fn presence(&self, region: RegionId, session: SessionId) -> Option<Uuid>;
}

/// Estate-management capability check.
pub trait EstateService: Send + Sync {
    /// Whether the avatar holds estate-manager privilege.
    fn is_manager(&self, avatar: Uuid) -> bool;
}

/// An estate service backed by a fixed set of manager avatar IDs.
///
/// Suits deployments where the manager roster comes from configuration
/// rather than a live estate database.
#[derive(Debug, Clone, Default)]
pub struct StaticEstateService {
    managers: std::collections::BTreeSet<Uuid>,
}

impl StaticEstateService {
    /// Create a service granting manager privilege to exactly these avatars.
    pub fn new(managers: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            managers: managers.into_iter().collect(),
        }
    }
}

impl EstateService for StaticEstateService {
    fn is_manager(&self, avatar: Uuid) -> bool {
        self.managers.contains(&avatar)
    }
}

/// A broadcaster that discards everything.
///
/// Lets the controller run headless -- in tests that only exercise model
/// state, or before any observer surface is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

impl NullBroadcaster {
    /// Create a new discarding broadcaster.
    pub const fn new() -> Self {
        Self
    }
}

impl DiffBroadcaster for NullBroadcaster {
    fn display_auras(&self, _overlays: &[Overlay]) {}
    fn display_entity(&self, _overlay: &Overlay) {}
    fn display_overlay(&self, _group: GroupId) {}
    fn hide_all_auras(&self) {}
    fn hide_all_overlays(&self) {}
    fn display_recent_changes(&self, _overlays: &[Overlay]) {}
    fn send_overlays_to_new_client(&self, _session: SessionId, _overlays: &[Overlay]) {}
    fn send_notice(&self, _region: RegionId, _text: &str) {}
}
