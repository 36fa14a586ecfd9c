//! Work queue, dispatch loop, and command interpreter for GridRev.
//!
//! This crate owns the live content-management engine: a single consumer
//! task drains a FIFO work queue of scene and session events, maintains the
//! diff-visibility state machine, and drives the revision model and diff
//! broadcaster through trait seams.
//!
//! # Modules
//!
//! - [`controller`] -- The [`Controller`], its dispatch loop, and
//!   [`spawn`]/[`ControllerHandle`] for running it as a task.
//! - [`command`] -- The chat-command interpreter (commit, diff-mode,
//!   rollback, help).
//! - [`error`] -- [`ControllerError`].
//! - [`proximity`] -- BFS proximity ordering for multi-region fan-out.
//! - [`queue`] -- The unbounded FIFO work queue.
//! - [`registry`] -- The concurrent append-only region registry.
//! - [`state`] -- The [`DiffState`] four-state machine.
//! - [`traits`] -- Contracts for the revision model, diff broadcaster,
//!   scene access, and estate capability check.
//!
//! [`Controller`]: controller::Controller
//! [`spawn`]: controller::spawn
//! [`ControllerHandle`]: controller::ControllerHandle
//! [`ControllerError`]: error::ControllerError
//! [`DiffState`]: state::DiffState

pub mod command;
pub mod controller;
pub mod error;
pub mod proximity;
pub mod queue;
pub mod registry;
pub mod state;
pub mod traits;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testutil;

pub use controller::{Controller, ControllerHandle, spawn};
pub use error::ControllerError;
pub use proximity::order_by_proximity;
pub use queue::{WorkReceiver, WorkSender, work_queue};
pub use registry::{RegionRegistry, RegistryError};
pub use state::DiffState;
pub use traits::{
    DiffBroadcaster, EstateService, ModelError, NullBroadcaster, RevisionModel, SceneAccess,
    SceneError, StaticEstateService,
};
