//! The work queue feeding the dispatch loop.
//!
//! An unbounded multi-producer single-consumer FIFO. Enqueue never blocks
//! and never drops; dequeue suspends the consumer task until an item is
//! available. Items are delivered in strict global arrival order relative
//! to enqueue completion -- the channel's internal synchronization
//! serializes racing producers.

use gridrev_types::{ChatEvent, EntityGroup, GroupId, SessionId, WorkItem};
use tokio::sync::mpsc;
use tracing::warn;

/// Create a connected sender/receiver pair for one controller.
pub fn work_queue() -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (WorkSender { tx }, WorkReceiver { rx })
}

/// Producer handle to the work queue. Cheap to clone; safe to use from any
/// thread or task without external locking.
#[derive(Debug, Clone)]
pub struct WorkSender {
    tx: mpsc::UnboundedSender<WorkItem>,
}

impl WorkSender {
    /// Push an item onto the queue. Never blocks. Items pushed after the
    /// consumer has shut down are dropped with a warning.
    pub fn enqueue(&self, item: WorkItem) {
        if let Err(dropped) = self.tx.send(item) {
            warn!(kind = dropped.0.kind(), "work item dropped after shutdown");
        }
    }

    /// A primitive was moved, rotated, or scaled.
    pub fn attribute_changed(&self, local_id: u32) {
        self.enqueue(WorkItem::AttributeChanged { local_id });
    }

    /// A new primitive was rezzed.
    pub fn primitive_added(&self, owner: SessionId) {
        self.enqueue(WorkItem::PrimitiveAdded { owner });
    }

    /// An object group was duplicated.
    pub fn duplicated(&self, local_id: u32) {
        self.enqueue(WorkItem::Duplicated { local_id });
    }

    /// An object group was removed from its scene. The caller must capture
    /// the group before the scene discards it.
    pub fn group_deleted(&self, group: EntityGroup) {
        self.enqueue(WorkItem::Deleted { group });
    }

    /// A viewer applied an undo.
    pub fn undo_applied(&self, target: GroupId) {
        self.enqueue(WorkItem::UndoApplied { target });
    }

    /// A new viewer session joined a managed region.
    pub fn session_joined(&self, session: SessionId) {
        self.enqueue(WorkItem::SessionJoined { session });
    }

    /// A chat message arrived from a viewer.
    pub fn chat(&self, event: ChatEvent) {
        self.enqueue(WorkItem::Chat(event));
    }
}

/// Consumer side of the work queue. Held only by the dispatch loop.
#[derive(Debug)]
pub struct WorkReceiver {
    rx: mpsc::UnboundedReceiver<WorkItem>,
}

impl WorkReceiver {
    /// Wait for the next item. Returns `None` once every sender has been
    /// dropped and the queue is drained, which ends the dispatch loop.
    pub async fn dequeue(&mut self) -> Option<WorkItem> {
        self.rx.recv().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn single_producer_fifo_order() {
        let (tx, mut rx) = work_queue();
        for local_id in 0..100 {
            tx.attribute_changed(local_id);
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(item) = rx.dequeue().await {
            if let WorkItem::AttributeChanged { local_id } = item {
                seen.push(local_id);
            }
        }
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn multi_producer_exactly_once_in_per_producer_order() {
        const PRODUCERS: u32 = 8;
        const PER_PRODUCER: u32 = 50;

        let (tx, mut rx) = work_queue();
        let mut handles = Vec::new();
        for producer in 0..PRODUCERS {
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                for seq in 0..PER_PRODUCER {
                    // Encode (producer, seq) into the local ID.
                    tx.attribute_changed(producer * 1000 + seq);
                }
            }));
        }
        drop(tx);
        for handle in handles {
            handle.await.unwrap();
        }

        let mut seen = Vec::new();
        while let Some(item) = rx.dequeue().await {
            if let WorkItem::AttributeChanged { local_id } = item {
                seen.push(local_id);
            }
        }
        assert_eq!(seen.len() as u32, PRODUCERS * PER_PRODUCER);

        // Every item arrives exactly once, and each producer's items keep
        // their enqueue order.
        for producer in 0..PRODUCERS {
            let per: Vec<u32> = seen
                .iter()
                .copied()
                .filter(|id| id / 1000 == producer)
                .map(|id| id % 1000)
                .collect();
            assert_eq!(per, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn dequeue_ends_when_senders_drop() {
        let (tx, mut rx) = work_queue();
        tx.session_joined(SessionId::new());
        drop(tx);

        assert!(rx.dequeue().await.is_some());
        assert!(rx.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_consumer_drop_does_not_panic() {
        let (tx, rx) = work_queue();
        drop(rx);
        tx.undo_applied(GroupId::new());
    }
}
