use std::fmt;

/// A GPU-side resource that can be given back exactly once
///
/// `release` takes the handle by value, so a released handle cannot be
/// touched again.
pub trait Releasable {
    fn release(self);
}

/// Slot a handle occupies in a mounted scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    LineGeometry,
    ParticleGeometry,
    GlowGeometry,
    LineMaterial,
    ParticleMaterial,
    GlowMaterial,
    GroupTransform,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::LineGeometry,
        ResourceKind::ParticleGeometry,
        ResourceKind::GlowGeometry,
        ResourceKind::LineMaterial,
        ResourceKind::ParticleMaterial,
        ResourceKind::GlowMaterial,
        ResourceKind::GroupTransform,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::LineGeometry => "Line Geometry",
            ResourceKind::ParticleGeometry => "Particle Geometry",
            ResourceKind::GlowGeometry => "Glow Geometry",
            ResourceKind::LineMaterial => "Line Material",
            ResourceKind::ParticleMaterial => "Particle Material",
            ResourceKind::GlowMaterial => "Glow Material",
            ResourceKind::GroupTransform => "Group Transform",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owns every handle created for one mount and releases them together
pub struct ResourceLifecycle<H: Releasable> {
    handles: Vec<(ResourceKind, H)>,
}

impl<H: Releasable> ResourceLifecycle<H> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn register(&mut self, kind: ResourceKind, handle: H) {
        self.handles.push((kind, handle));
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&H> {
        self.handles
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.handles.iter().map(|(kind, _)| *kind)
    }

    /// Release every held handle; returns how many were released.
    /// A second call finds nothing left and returns 0.
    pub fn release_all(&mut self) -> usize {
        let count = self.handles.len();
        for (kind, handle) in self.handles.drain(..) {
            log::trace!("Releasing {}", kind);
            handle.release();
        }
        if count > 0 {
            log::debug!("Released {} scene resources", count);
        }
        count
    }
}

impl<H: Releasable> Default for ResourceLifecycle<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Releasable> Extend<(ResourceKind, H)> for ResourceLifecycle<H> {
    fn extend<I: IntoIterator<Item = (ResourceKind, H)>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

impl<H: Releasable> Drop for ResourceLifecycle<H> {
    fn drop(&mut self) {
        self.release_all();
    }
}
