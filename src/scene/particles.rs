use std::ops::Range;

use rand::Rng;

/// Per-particle GPU attributes: position plus size, 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleAttributes {
    pub position: [f32; 3],
    pub size: f32,
}

impl ParticleAttributes {
    pub const fn new(position: [f32; 3], size: f32) -> Self {
        Self { position, size }
    }
}

/// Fixed-size particle cloud with in-place mutable attributes
///
/// Base heights and sizes are captured at construction so animation can
/// oscillate around them without drifting.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    attributes: Vec<ParticleAttributes>,
    base_heights: Vec<f32>,
    base_sizes: Vec<f32>,
    dirty: Option<Range<usize>>,
}

impl ParticleSet {
    /// Scatter `count` particles over a square of side `extent * 2`,
    /// between y = 0 and `max_height`, with base sizes in [0.1, 0.6)
    pub fn scatter<R: Rng + ?Sized>(
        count: usize,
        extent: f32,
        max_height: f32,
        rng: &mut R,
    ) -> Self {
        let attributes: Vec<ParticleAttributes> = (0..count)
            .map(|_| {
                let x = (rng.gen::<f32>() - 0.5) * extent * 2.0;
                let y = rng.gen::<f32>() * max_height;
                let z = (rng.gen::<f32>() - 0.5) * extent * 2.0;
                let size = rng.gen::<f32>() * 0.5 + 0.1;
                ParticleAttributes::new([x, y, z], size)
            })
            .collect();

        Self::from_attributes(attributes)
    }

    /// Wrap explicit attributes; they become the base values
    pub fn from_attributes(attributes: Vec<ParticleAttributes>) -> Self {
        let base_heights = attributes.iter().map(|p| p.position[1]).collect();
        let base_sizes = attributes.iter().map(|p| p.size).collect();
        Self {
            attributes,
            base_heights,
            base_sizes,
            dirty: None,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[ParticleAttributes] {
        &self.attributes
    }

    pub fn base_height(&self, index: usize) -> f32 {
        self.base_heights[index]
    }

    pub fn base_size(&self, index: usize) -> f32 {
        self.base_sizes[index]
    }

    /// Pick a contiguous window of at most `size` particles at a random start
    pub fn random_window<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Range<usize> {
        let len = size.min(self.len());
        let span = self.len() - len;
        let start = if span == 0 { 0 } else { rng.gen_range(0..span) };
        start..start + len
    }

    /// Overwrite one particle's height and size in place
    pub fn set(&mut self, index: usize, height: f32, size: f32) {
        let particle = &mut self.attributes[index];
        particle.position[1] = height;
        particle.size = size;
    }

    /// Record that `range` changed and must be uploaded
    pub fn mark_dirty(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty.take() {
            Some(existing) => existing.start.min(range.start)..existing.end.max(range.end),
            None => range,
        });
    }

    /// Range awaiting upload, if any
    pub fn dirty(&self) -> Option<Range<usize>> {
        self.dirty.clone()
    }

    /// Hand the pending range to the uploader and clear it
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }
}
