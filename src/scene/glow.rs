use rand::Rng;

use super::particles::ParticleAttributes;

/// One glowing sphere hovering over the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowElement {
    pub position: [f32; 3],
    pub scale: f32,
}

impl GlowElement {
    /// Sprite instance for this element; scale doubles as the size attribute
    pub fn to_attributes(&self) -> ParticleAttributes {
        ParticleAttributes::new(self.position, self.scale)
    }
}

/// Place `count` elements within `spread` of the grid extent, scale in [0.5, 1.0)
pub fn scatter_glow<R: Rng + ?Sized>(
    count: usize,
    extent: f32,
    spread: f32,
    max_height: f32,
    rng: &mut R,
) -> Vec<GlowElement> {
    (0..count)
        .map(|_| {
            let x = (rng.gen::<f32>() - 0.5) * extent * 2.0 * spread;
            let z = (rng.gen::<f32>() - 0.5) * extent * 2.0 * spread;
            let y = rng.gen::<f32>() * max_height;
            GlowElement {
                position: [x, y, z],
                scale: rng.gen::<f32>() * 0.5 + 0.5,
            }
        })
        .collect()
}
