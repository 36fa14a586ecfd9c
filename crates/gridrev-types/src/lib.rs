//! Shared type definitions for the GridRev content-management engine.
//!
//! GridRev tracks a last-committed revision per simulation region, computes
//! the live delta against it, and renders the delta to privileged observers
//! as overlay entities. This crate holds the types every other crate speaks:
//!
//! - [`ids`] -- Strongly-typed UUID wrappers ([`RegionId`], [`GroupId`],
//!   [`SessionId`], [`RevisionId`]).
//! - [`scene`] -- Revisable scene content: [`EntityGroup`], [`RegionContent`],
//!   and [`RegionInfo`] with grid adjacency.
//! - [`events`] -- [`WorkItem`] and [`ChatEvent`], the queue's currency.
//! - [`overlay`] -- [`Overlay`] delta markers and [`OverlayKind`].

pub mod events;
pub mod ids;
pub mod overlay;
pub mod scene;

pub use events::{ChatEvent, WorkItem};
pub use ids::{GroupId, RegionId, RevisionId, SessionId};
pub use overlay::{Overlay, OverlayKind};
pub use scene::{EntityGroup, RegionContent, RegionInfo};
