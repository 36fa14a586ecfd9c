//! The controller's diff-visibility state machine.
//!
//! The controller tracks two facts: whether overlay entities are currently
//! visible to observers, and whether a commit has happened since overlays
//! were last fully recomputed. Rather than a pair of bit flags, [`DiffState`]
//! spells out the four combinations as named states with exhaustive
//! transitions, so no handler can observe an ambiguous flag mix.
//!
//! The state is owned exclusively by the dispatch-loop task. It is never
//! shared, so it needs no synchronization.

/// Diff-overlay visibility and staleness, as a four-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffState {
    /// Overlays hidden; the overlay set matches the latest full recompute.
    #[default]
    Clean,
    /// Overlays hidden; at least one commit happened since the last full
    /// overlay recompute.
    Dirty,
    /// Overlays visible and current with the last recompute.
    Showing,
    /// Overlays visible, but a commit happened since the last full
    /// recompute, so they describe a stale revision.
    ShowingDirty,
}

impl DiffState {
    /// Whether overlays are currently visible to observers.
    pub const fn is_showing(self) -> bool {
        matches!(self, Self::Showing | Self::ShowingDirty)
    }

    /// Whether a commit has occurred since the last full overlay recompute.
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty | Self::ShowingDirty)
    }

    /// A commit changed the latest revision out from under the overlays.
    pub const fn mark_dirty(self) -> Self {
        match self {
            Self::Clean | Self::Dirty => Self::Dirty,
            Self::Showing | Self::ShowingDirty => Self::ShowingDirty,
        }
    }

    /// A full overlay recompute brought the overlay set current again.
    pub const fn clear_dirty(self) -> Self {
        match self {
            Self::Clean | Self::Dirty => Self::Clean,
            Self::Showing | Self::ShowingDirty => Self::Showing,
        }
    }

    /// Diff-mode was switched on after a full recompute.
    pub const fn show(self) -> Self {
        Self::Showing
    }

    /// Diff-mode was switched off. Staleness survives hiding: a dirty
    /// showing state hides into a dirty hidden state.
    pub const fn hide(self) -> Self {
        match self {
            Self::Clean | Self::Showing => Self::Clean,
            Self::Dirty | Self::ShowingDirty => Self::Dirty,
        }
    }
}
