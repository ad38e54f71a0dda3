/// Lattice of line segments on the y = 0 plane
///
/// Vertices come in pairs, one pair per segment, ready for a line-list draw.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    vertices: Vec<[f32; 3]>,
}

impl GridGeometry {
    /// Build a lattice spanning `±(count / 2) * spacing` on X and Z.
    ///
    /// Lattice coordinates run from `-count / 2` to `count / 2` in steps of
    /// `line_step`; each contributes one line parallel to X and one
    /// parallel to Z.
    pub fn build(count: u32, spacing: f32, line_step: u32) -> Self {
        let half = count as f32 / 2.0;
        let extent = half * spacing;
        let step = line_step.max(1);
        let lines = Self::line_count(count, step);

        let mut vertices = Vec::with_capacity(lines * 4);
        for k in 0..lines {
            let offset = (-half + (k as u32 * step) as f32) * spacing;

            // Parallel to X
            vertices.push([-extent, 0.0, offset]);
            vertices.push([extent, 0.0, offset]);

            // Parallel to Z
            vertices.push([offset, 0.0, -extent]);
            vertices.push([offset, 0.0, extent]);
        }

        Self { vertices }
    }

    /// Number of lattice coordinates that produce lines
    pub fn line_count(count: u32, line_step: u32) -> usize {
        (count / line_step.max(1)) as usize + 1
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Half the side length of the square the lattice covers
    pub fn extent(&self) -> f32 {
        self.vertices.first().map(|v| v[0].abs()).unwrap_or(0.0)
    }
}
