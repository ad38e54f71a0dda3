use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::glow::{scatter_glow, GlowElement};
use super::grid::GridGeometry;
use super::materials::MaterialSet;
use super::particles::{ParticleAttributes, ParticleSet};

/// Fixed construction parameters for a grid field
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub grid_count: u32,
    pub line_step: u32,
    pub spacing: f32,
    pub particle_count: usize,
    pub particle_max_height: f32,
    pub glow_count: usize,
    /// Fraction of the grid extent glow elements may occupy
    pub glow_spread: f32,
    pub glow_max_height: f32,
    pub materials: MaterialSet,
}

impl SceneParams {
    /// Half side length of the lattice in world units
    pub fn extent(&self) -> f32 {
        self.grid_count as f32 / 2.0 * self.spacing
    }
}

/// Everything the builder produces for one mount
#[derive(Debug, Clone)]
pub struct BuiltScene {
    pub grid: GridGeometry,
    pub particles: ParticleSet,
    pub glow: Vec<GlowElement>,
    pub materials: MaterialSet,
}

impl BuiltScene {
    /// Construct geometry and materials from scratch
    pub fn build<R: Rng + ?Sized>(params: &SceneParams, rng: &mut R) -> Self {
        let extent = params.extent();

        let grid = GridGeometry::build(params.grid_count, params.spacing, params.line_step);
        let particles =
            ParticleSet::scatter(params.particle_count, extent, params.particle_max_height, rng);
        let glow = scatter_glow(
            params.glow_count,
            extent,
            params.glow_spread,
            params.glow_max_height,
            rng,
        );

        Self {
            grid,
            particles,
            glow,
            materials: params.materials,
        }
    }

    /// Glow elements as sprite instances
    pub fn glow_attributes(&self) -> Vec<ParticleAttributes> {
        self.glow.iter().map(GlowElement::to_attributes).collect()
    }
}

/// Memoizing scene builder
///
/// Calling `build` again with equal parameters hands back the scene built
/// the first time instead of constructing new geometry.
pub struct SceneBuilder {
    rng: StdRng,
    cached: Option<(SceneParams, BuiltScene)>,
    builds: usize,
}

impl SceneBuilder {
    /// Seeded builder for reproducible placement, or entropy when `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            cached: None,
            builds: 0,
        }
    }

    pub fn build(&mut self, params: &SceneParams) -> &mut BuiltScene {
        let entry = match self.cached.take() {
            Some((cached, scene)) if cached == *params => (cached, scene),
            _ => {
                self.builds += 1;
                let scene = BuiltScene::build(params, &mut self.rng);
                log::debug!(
                    "Scene built: {} grid segments, {} particles, {} glow elements",
                    scene.grid.segment_count(),
                    scene.particles.len(),
                    scene.glow.len()
                );
                (params.clone(), scene)
            }
        };
        &mut self.cached.insert(entry).1
    }

    pub fn scene(&self) -> Option<&BuiltScene> {
        self.cached.as_ref().map(|(_, scene)| scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut BuiltScene> {
        self.cached.as_mut().map(|(_, scene)| scene)
    }

    /// Drop the memoized scene; the next `build` constructs afresh
    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// How many times geometry was actually constructed
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MaterialDescriptor;

    fn params() -> SceneParams {
        SceneParams {
            grid_count: 24,
            line_step: 2,
            spacing: 1.8,
            particle_count: 150,
            particle_max_height: 5.0,
            glow_count: 5,
            glow_spread: 0.8,
            glow_max_height: 3.0,
            materials: MaterialSet {
                line: MaterialDescriptor::line([0.26, 0.11, 0.92], 0.15),
                particle: MaterialDescriptor::particle([0.26, 0.11, 0.92], 0.6, 0.1, true),
                glow: MaterialDescriptor::glow([0.39, 0.09, 0.92], 0.8, 0.2),
            },
        }
    }

    #[test]
    fn memoizes_identical_params() {
        let mut builder = SceneBuilder::new(Some(1));

        let first = builder.build(&params()).particles.attributes().to_vec();
        let second = builder.build(&params()).particles.attributes().to_vec();

        assert_eq!(builder.builds(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn rebuilds_on_changed_params() {
        let mut builder = SceneBuilder::new(Some(1));
        builder.build(&params());

        let mut changed = params();
        changed.particle_count = 80;
        let scene = builder.build(&changed);

        assert_eq!(scene.particles.len(), 80);
        assert_eq!(builder.builds(), 2);
    }

    #[test]
    fn clear_forces_rebuild() {
        let mut builder = SceneBuilder::new(None);
        builder.build(&params());
        builder.clear();

        assert!(builder.scene().is_none());
        builder.build(&params());
        assert_eq!(builder.builds(), 2);
    }

    #[test]
    fn glow_attributes_follow_elements() {
        let mut builder = SceneBuilder::new(Some(9));
        let scene = builder.build(&params());

        let attributes = scene.glow_attributes();
        assert_eq!(attributes.len(), 5);
        assert_eq!(attributes[0].position, scene.glow[0].position);
        assert_eq!(attributes[0].size, scene.glow[0].scale);
    }
}
