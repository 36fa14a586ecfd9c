//! Live scene content and session tracking for GridRev.
//!
//! This crate is the content-management view of the simulated world: the
//! current terrain and object groups of every managed region, the sessions
//! present in each, and the subscription bookkeeping that ties session
//! callbacks to the controller's work queue.
//!
//! # Modules
//!
//! - [`error`] -- [`WorldError`].
//! - [`scene`] -- [`Scene`]: per-region content and presences.
//! - [`sessions`] -- [`SessionTable`]: deterministic attach/detach of
//!   per-session event subscriptions.
//! - [`shared`] -- [`SharedScene`]: the lock-guarded handle implementing
//!   the controller's scene contract.
//!
//! [`WorldError`]: error::WorldError
//! [`Scene`]: scene::Scene
//! [`SessionTable`]: sessions::SessionTable
//! [`SharedScene`]: shared::SharedScene

pub mod error;
pub mod scene;
pub mod sessions;
pub mod shared;

pub use error::WorldError;
pub use scene::Scene;
pub use sessions::SessionTable;
pub use shared::SharedScene;
