/// What a material is used to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Line,
    Particle,
    Glow,
}

/// Renderer-agnostic description of a flat, unlit, translucent material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDescriptor {
    pub kind: MaterialKind,
    /// Linear RGB
    pub color: [f32; 3],
    pub opacity: f32,
    /// Sprite radius multiplier (world units with attenuation, pixels without)
    pub size: f32,
    pub size_attenuation: bool,
    /// Distance from sprite center, in [0, 1), where the edge fade begins
    pub falloff: f32,
}

impl MaterialDescriptor {
    pub fn line(color: [f32; 3], opacity: f32) -> Self {
        Self {
            kind: MaterialKind::Line,
            color,
            opacity,
            size: 0.0,
            size_attenuation: false,
            falloff: 0.0,
        }
    }

    pub fn particle(color: [f32; 3], opacity: f32, size: f32, size_attenuation: bool) -> Self {
        Self {
            kind: MaterialKind::Particle,
            color,
            opacity,
            size,
            size_attenuation,
            falloff: 0.7,
        }
    }

    pub fn glow(color: [f32; 3], opacity: f32, radius: f32) -> Self {
        Self {
            kind: MaterialKind::Glow,
            color,
            opacity,
            size: radius,
            size_attenuation: true,
            falloff: 0.0,
        }
    }
}

/// The three materials every grid field uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSet {
    pub line: MaterialDescriptor,
    pub particle: MaterialDescriptor,
    pub glow: MaterialDescriptor,
}

impl MaterialSet {
    pub fn get(&self, kind: MaterialKind) -> &MaterialDescriptor {
        match kind {
            MaterialKind::Line => &self.line,
            MaterialKind::Particle => &self.particle,
            MaterialKind::Glow => &self.glow,
        }
    }
}
