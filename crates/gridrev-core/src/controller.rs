//! The controller: a single dispatch loop over the work queue.
//!
//! One controller instance runs exactly one consumer task. Producer-side
//! session callbacks enqueue [`WorkItem`]s; the loop drains them strictly
//! in arrival order and routes each to a handler. Handlers never run
//! concurrently with each other -- this single-writer discipline is what
//! lets the controller mutate [`DiffState`], the overlay bookkeeping, and
//! the revision model without any locking on that path.
//!
//! A failure while processing one item is logged and isolated; the loop
//! survives and continues with the next item. The loop exits on an explicit
//! shutdown signal or when every producer handle has been dropped.

use std::sync::Arc;

use gridrev_types::{EntityGroup, GroupId, SessionId, WorkItem};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::ControllerError;
use crate::queue::{self, WorkReceiver, WorkSender};
use crate::registry::RegionRegistry;
use crate::state::DiffState;
use crate::traits::{DiffBroadcaster, EstateService, RevisionModel, SceneAccess};

/// The content-management controller.
///
/// Owns the diff-visibility state machine and drives the revision model and
/// diff broadcaster in response to queued scene and session events. All
/// methods other than construction are intended to run on the dispatch-loop
/// task; [`process`] is public so tests and embedders can drive the loop
/// synchronously.
///
/// [`process`]: Controller::process
#[derive(Debug)]
pub struct Controller<M, V, S, E> {
    pub(crate) model: M,
    pub(crate) view: V,
    pub(crate) scene: S,
    pub(crate) estate: E,
    pub(crate) registry: Arc<RegionRegistry>,
    pub(crate) channel: i32,
    pub(crate) state: DiffState,
}

impl<M, V, S, E> Controller<M, V, S, E>
where
    M: RevisionModel,
    V: DiffBroadcaster,
    S: SceneAccess,
    E: EstateService,
{
    /// Create a controller listening for commands on `channel`.
    pub const fn new(
        model: M,
        view: V,
        scene: S,
        estate: E,
        registry: Arc<RegionRegistry>,
        channel: i32,
    ) -> Self {
        Self {
            model,
            view,
            scene,
            estate,
            registry,
            channel,
            state: DiffState::Clean,
        }
    }

    /// Current diff-visibility state.
    pub const fn state(&self) -> DiffState {
        self.state
    }

    /// Process one work item, routing by kind.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] if the revision model fails. The dispatch
    /// loop logs such failures and continues; callers driving the controller
    /// directly may do the same.
    pub fn process(&mut self, item: WorkItem) -> Result<(), ControllerError> {
        debug!(kind = item.kind(), "Dequeued work item");
        match item {
            WorkItem::AttributeChanged { local_id } => self.attribute_changed(local_id),
            WorkItem::PrimitiveAdded { owner } => self.primitive_added(owner),
            WorkItem::Duplicated { local_id } => self.duplicated(local_id),
            WorkItem::Deleted { group } => {
                self.deleted(&group);
                Ok(())
            }
            WorkItem::UndoApplied { target } => {
                self.undo_applied(target);
                Ok(())
            }
            WorkItem::SessionJoined { session } => {
                self.session_joined(session);
                Ok(())
            }
            WorkItem::Chat(event) => {
                self.handle_chat(&event);
                Ok(())
            }
        }
    }

    /// Run the dispatch loop until shutdown is signalled or the queue
    /// closes. Per-item failures are logged and do not end the loop.
    pub async fn run(mut self, mut queue: WorkReceiver, mut shutdown: watch::Receiver<bool>) {
        info!(channel = self.channel, "Dispatch loop started");
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Dispatch loop shutting down");
                    break;
                }
                item = queue.dequeue() => {
                    let Some(item) = item else {
                        info!("Work queue closed; dispatch loop exiting");
                        break;
                    };
                    let kind = item.kind();
                    if let Err(e) = self.process(item) {
                        error!(error = %e, kind, "Work item failed; continuing");
                    }
                }
            }
        }
    }

    /// A primitive was moved, rotated, or scaled: re-evaluate its owning
    /// group's overlay and refresh what observers see for it.
    fn attribute_changed(&mut self, local_id: u32) -> Result<(), ControllerError> {
        if !self.state.is_showing() {
            return Ok(());
        }
        let Some((region, group)) = self.scene.group_by_local_id(local_id) else {
            // The group can vanish between event capture and dispatch.
            warn!(local_id, "Changed primitive no longer exists; skipping");
            return Ok(());
        };
        if let Some(overlay) = self.model.update_group_overlay(region, &group)? {
            self.view.display_auras(core::slice::from_ref(&overlay));
        }
        self.view.display_overlay(group.id);
        Ok(())
    }

    /// A primitive was rezzed somewhere: scan every registered region for
    /// live entities that lack an overlay and show auras for them.
    fn primitive_added(&mut self, owner: SessionId) -> Result<(), ControllerError> {
        if !self.state.is_showing() {
            return Ok(());
        }
        debug!(%owner, "Primitive added; scanning for missing auras");
        for info in self.registry.snapshot() {
            let missing = self.model.entities_missing_overlays(info.id)?;
            self.view.display_auras(&missing);
        }
        Ok(())
    }

    /// A group was duplicated: scan only the owning region.
    fn duplicated(&mut self, local_id: u32) -> Result<(), ControllerError> {
        if !self.state.is_showing() {
            return Ok(());
        }
        let Some((region, _group)) = self.scene.group_by_local_id(local_id) else {
            warn!(local_id, "Duplicated primitive no longer exists; skipping");
            return Ok(());
        };
        let missing = self.model.entities_missing_overlays(region)?;
        self.view.display_auras(&missing);
        Ok(())
    }

    /// A group was removed from its scene. Deletion bookkeeping runs
    /// regardless of overlay visibility, so the next recompute knows the
    /// group is gone.
    fn deleted(&mut self, group: &EntityGroup) {
        debug!(group = %group.id, "Group deleted; updating bookkeeping");
        self.model.remove_or_update_deleted(group);
    }

    /// A viewer applied an undo: if the target has an overlay, redisplay it.
    fn undo_applied(&mut self, target: GroupId) {
        if !self.state.is_showing() {
            return;
        }
        if let Some(overlay) = self.model.overlay_affected_by_undo(target) {
            self.view.display_entity(&overlay);
        }
    }

    /// A new session joined: if overlays are visible, push the full current
    /// set to the newcomer.
    fn session_joined(&mut self, session: SessionId) {
        if !self.state.is_showing() {
            return;
        }
        let overlays = self.model.current_overlays();
        self.view.send_overlays_to_new_client(session, &overlays);
    }
}

/// Handle to a running controller task.
///
/// Holds the producer side of the work queue and the shutdown signal.
/// Dropping the handle without calling [`shutdown`] leaves the task running
/// until all other senders are dropped.
///
/// [`shutdown`]: ControllerHandle::shutdown
#[derive(Debug)]
pub struct ControllerHandle {
    sender: WorkSender,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ControllerHandle {
    /// A producer handle for enqueuing work from session callbacks.
    pub fn sender(&self) -> WorkSender {
        self.sender.clone()
    }

    /// Signal the dispatch loop to stop and wait for it to exit.
    ///
    /// Items still queued when the signal lands are not drained; shutdown
    /// takes priority over pending work.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if self.join.await.is_err() {
            error!("Dispatch loop task ended abnormally");
        }
    }
}

/// Spawn a controller's dispatch loop on the tokio runtime.
///
/// Exactly one loop runs per controller instance; it is the sole mutator of
/// the controller's state for the task's lifetime.
pub fn spawn<M, V, S, E>(controller: Controller<M, V, S, E>) -> ControllerHandle
where
    M: RevisionModel + 'static,
    V: DiffBroadcaster + 'static,
    S: SceneAccess + 'static,
    E: EstateService + 'static,
{
    let (sender, receiver) = queue::work_queue();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let join = tokio::spawn(controller.run(receiver, shutdown_rx));
    ControllerHandle {
        sender,
        shutdown: shutdown_tx,
        join,
    }
}
