//! Revisions and per-region revision histories.
//!
//! A [`Revision`] is an immutable, timestamped snapshot of one region's
//! terrain and object content plus a commit message. Histories are
//! append-only: new commits add a new latest revision and nothing is ever
//! deleted or rewritten.

use chrono::{DateTime, Utc};
use gridrev_types::{RegionContent, RevisionId};
use serde::{Deserialize, Serialize};

/// One committed snapshot of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Stable identity of the revision.
    pub id: RevisionId,
    /// Position in the region's history, starting at 1.
    pub seq: u64,
    /// When the revision was committed.
    pub created_at: DateTime<Utc>,
    /// The operator-supplied commit message.
    pub message: String,
    /// The snapshotted region content.
    pub content: RegionContent,
}

/// Append-only revision history for one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionHistory {
    entries: Vec<Revision>,
}

impl RevisionHistory {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a new latest revision with the given content and message.
    pub fn commit(&mut self, content: RegionContent, message: &str) -> RevisionId {
        let id = RevisionId::new();
        let seq = self.entries.len() as u64 + 1;
        self.entries.push(Revision {
            id,
            seq,
            created_at: Utc::now(),
            message: message.to_owned(),
            content,
        });
        id
    }

    /// The latest revision, if any commit has happened.
    pub fn latest(&self) -> Option<&Revision> {
        self.entries.last()
    }

    /// Number of revisions in the history.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history has no revisions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all revisions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Revision> {
        self.entries.iter()
    }
}
