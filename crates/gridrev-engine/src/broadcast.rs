//! Broadcast-channel view surface for the controller.
//!
//! The engine binary has no in-world renderer, so overlay and notice
//! delivery becomes a stream of [`ViewUpdate`] values pushed over a tokio
//! broadcast channel. Any number of subscribers (log sinks, future network
//! frontends) can attach; with no subscribers, sends are dropped silently.

use gridrev_core::DiffBroadcaster;
use gridrev_types::{GroupId, Overlay, RegionId, SessionId};
use tokio::sync::broadcast;
use tracing::debug;

/// One view-layer update emitted by the controller.
#[derive(Debug, Clone)]
pub enum ViewUpdate {
    /// Show difference auras for these overlay entries.
    Auras(Vec<Overlay>),
    /// Show or refresh a single overlay entity.
    Entity(Overlay),
    /// Refresh the overlay entity for a group.
    OverlayRefresh(GroupId),
    /// Tear down all difference auras.
    HideAuras,
    /// Tear down all overlay entities.
    HideOverlays,
    /// The full overlay set after a recompute.
    RecentChanges(Vec<Overlay>),
    /// The current overlay set, addressed to one newly joined session.
    NewClient {
        /// The joining session.
        session: SessionId,
        /// The overlay set it should receive.
        overlays: Vec<Overlay>,
    },
    /// A plain-text notice for a region.
    Notice {
        /// The destination region.
        region: RegionId,
        /// The notice body.
        text: String,
    },
}

/// A [`DiffBroadcaster`] backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct ChatBroadcaster {
    sender: broadcast::Sender<ViewUpdate>,
}

impl ChatBroadcaster {
    /// Create a broadcaster with the given channel capacity. Lagging
    /// subscribers lose the oldest updates first.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to the update stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.sender.subscribe()
    }

    fn push(&self, update: ViewUpdate) {
        // SendError only means no subscriber is attached right now.
        let _ = self.sender.send(update);
    }
}

impl DiffBroadcaster for ChatBroadcaster {
    fn display_auras(&self, overlays: &[Overlay]) {
        debug!(count = overlays.len(), "Displaying auras");
        self.push(ViewUpdate::Auras(overlays.to_vec()));
    }

    fn display_entity(&self, overlay: &Overlay) {
        self.push(ViewUpdate::Entity(*overlay));
    }

    fn display_overlay(&self, group: GroupId) {
        self.push(ViewUpdate::OverlayRefresh(group));
    }

    fn hide_all_auras(&self) {
        self.push(ViewUpdate::HideAuras);
    }

    fn hide_all_overlays(&self) {
        self.push(ViewUpdate::HideOverlays);
    }

    fn display_recent_changes(&self, overlays: &[Overlay]) {
        debug!(count = overlays.len(), "Publishing recomputed overlay set");
        self.push(ViewUpdate::RecentChanges(overlays.to_vec()));
    }

    fn send_overlays_to_new_client(&self, session: SessionId, overlays: &[Overlay]) {
        debug!(%session, count = overlays.len(), "Sending overlays to new client");
        self.push(ViewUpdate::NewClient {
            session,
            overlays: overlays.to_vec(),
        });
    }

    fn send_notice(&self, region: RegionId, text: &str) {
        debug!(%region, text, "Region notice");
        self.push(ViewUpdate::Notice {
            region,
            text: text.to_owned(),
        });
    }
}
