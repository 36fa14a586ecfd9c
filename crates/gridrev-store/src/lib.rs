//! In-memory revision histories and diff evaluation for GridRev.
//!
//! Every commit appends an immutable, timestamped snapshot of one region's
//! content to that region's history. Rollback restores the live scene to
//! the latest snapshot; diff evaluation classifies each live group as
//! added, modified, or removed relative to it. Histories are the source of
//! truth for "what the region looked like last time it was saved".
//!
//! # Modules
//!
//! - [`revision`] -- [`Revision`] and the append-only [`RevisionHistory`].
//! - [`model`] -- [`MemoryRevisionModel`], the revision-contract
//!   implementation the controller drives.
//!
//! [`Revision`]: revision::Revision
//! [`RevisionHistory`]: revision::RevisionHistory
//! [`MemoryRevisionModel`]: model::MemoryRevisionModel

pub mod model;
pub mod revision;

pub use model::MemoryRevisionModel;
pub use revision::{Revision, RevisionHistory};
