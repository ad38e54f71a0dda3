use std::ops::Range;

use glam::Vec3;
use thiserror::Error;

use super::resources::{Releasable, ResourceKind, ResourceLifecycle};
use crate::scene::{BuiltScene, ParticleAttributes};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to allocate {kind}: {message}")]
    Allocation { kind: ResourceKind, message: String },

    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Per-frame state pushed to the backend after an active tick
#[derive(Debug, Clone)]
pub struct SceneUpdate<'a> {
    pub particles: &'a [ParticleAttributes],
    /// Particle indices that changed since the last upload
    pub dirty: Option<Range<usize>>,
    /// Group rotation, Euler XYZ radians
    pub rotation: Vec3,
}

/// Where a built scene turns into drawable resources
pub trait SceneBackend {
    type Handle: Releasable;

    /// Allocate every handle the scene needs
    fn create(
        &mut self,
        scene: &BuiltScene,
    ) -> Result<Vec<(ResourceKind, Self::Handle)>, BackendError>;

    /// Upload changed attributes and the group transform
    fn sync(&mut self, resources: &ResourceLifecycle<Self::Handle>, update: SceneUpdate<'_>);

    /// Drawable size changed
    fn resize(&mut self, width: u32, height: u32);
}
