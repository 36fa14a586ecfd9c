//! Work items and chat events flowing through the controller's queue.
//!
//! Producer-side session callbacks wrap every observed scene action into a
//! [`WorkItem`] and push it onto the work queue. The dispatch loop consumes
//! each item exactly once, in strict arrival order, and routes it by kind.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, RegionId, SessionId};
use crate::scene::EntityGroup;

/// A chat message captured from a viewer session.
///
/// Only messages on the configured control channel from a present sender
/// are interpreted as commands; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// The chat channel the message was sent on.
    pub channel: i32,
    /// The session that sent the message, if known.
    pub sender: Option<SessionId>,
    /// The raw message text.
    pub message: String,
    /// The region the message originated from.
    pub origin: RegionId,
}

/// The unit of work produced by session callbacks and consumed by the
/// dispatch loop.
///
/// Each variant corresponds to one observed scene or session action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkItem {
    /// A primitive was moved, rotated, or scaled.
    AttributeChanged {
        /// Scene-local ID of the changed primitive.
        local_id: u32,
    },
    /// A new primitive was rezzed into some region.
    PrimitiveAdded {
        /// The session that created the primitive.
        owner: SessionId,
    },
    /// An object group was duplicated.
    Duplicated {
        /// Scene-local ID of a primitive in the new copy.
        local_id: u32,
    },
    /// An object group was removed from its scene. Carries a copy of the
    /// group as it existed at deletion time, since the live object is gone
    /// by the time the item is dequeued.
    Deleted {
        /// The deleted group, copied at event-capture time.
        group: EntityGroup,
    },
    /// A viewer applied an undo to an object.
    UndoApplied {
        /// The group the undo targeted.
        target: GroupId,
    },
    /// A new viewer session joined a managed region.
    SessionJoined {
        /// The joining session.
        session: SessionId,
    },
    /// A chat message arrived from a viewer.
    Chat(ChatEvent),
}

impl WorkItem {
    /// Short kind name for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AttributeChanged { .. } => "attribute-changed",
            Self::PrimitiveAdded { .. } => "primitive-added",
            Self::Duplicated { .. } => "duplicated",
            Self::Deleted { .. } => "deleted",
            Self::UndoApplied { .. } => "undo-applied",
            Self::SessionJoined { .. } => "session-joined",
            Self::Chat(_) => "chat",
        }
    }
}
