//! Thread-shared scene handle implementing the controller's scene contract.
//!
//! Producer callbacks fire on arbitrary session threads while the dispatch
//! loop reads and (on rollback) replaces content, so the scene sits behind
//! a reader-writer lock. [`SharedScene`] is the cheaply clonable handle.

use std::sync::{Arc, PoisonError, RwLock};

use gridrev_core::traits::{SceneAccess, SceneError};
use gridrev_types::{EntityGroup, RegionContent, RegionId, SessionId};
use uuid::Uuid;

use crate::scene::Scene;

/// A clonable, lock-guarded handle to the live [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct SharedScene {
    inner: Arc<RwLock<Scene>>,
}

impl SharedScene {
    /// Wrap a scene for shared access.
    pub fn new(scene: Scene) -> Self {
        Self {
            inner: Arc::new(RwLock::new(scene)),
        }
    }

    /// Run a closure with read access to the scene.
    pub fn read<R>(&self, f: impl FnOnce(&Scene) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a closure with write access to the scene.
    pub fn write<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SceneAccess for SharedScene {
    fn group_by_local_id(&self, local_id: u32) -> Option<(RegionId, EntityGroup)> {
        self.read(|scene| {
            scene
                .group_by_local_id(local_id)
                .map(|(region, group)| (region, group.clone()))
        })
    }

    fn region_content(&self, region: RegionId) -> Option<RegionContent> {
        self.read(|scene| scene.content(region).cloned())
    }

    fn replace_content(&self, region: RegionId, content: RegionContent) -> Result<(), SceneError> {
        self.write(|scene| {
            scene
                .replace_content(region, content)
                .map_err(|_| SceneError::RegionNotFound { region })
        })
    }

    fn presence(&self, region: RegionId, session: SessionId) -> Option<Uuid> {
        self.read(|scene| scene.presence(region, session))
    }
}
