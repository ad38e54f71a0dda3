use crate::scene::MaterialDescriptor;

/// Per-object uniform: camera matrices, model transform, fog and viewport
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub fog: [f32; 4],       // near, far, unused, unused
    pub fog_color: [f32; 4], // Linear RGB, w unused
    pub viewport: [f32; 4],  // width, height, 1/width, 1/height
}

/// Per-material uniform
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],  // Linear RGB + opacity
    pub params: [f32; 4], // size, size attenuation (0/1), falloff, unused
}

impl From<&MaterialDescriptor> for MaterialUniform {
    fn from(material: &MaterialDescriptor) -> Self {
        let [r, g, b] = material.color;
        Self {
            color: [r, g, b, material.opacity],
            params: [
                material.size,
                if material.size_attenuation { 1.0 } else { 0.0 },
                material.falloff,
                0.0,
            ],
        }
    }
}

/// Bloom uniform shared by the bright pass, blur and composite
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BloomUniform {
    pub threshold: f32,
    pub smoothing: f32,
    pub intensity: f32,
    pub enabled: f32,
    pub texel: [f32; 2],     // 1 / blur target size
    pub direction: [f32; 2], // (1, 0) horizontal, (0, 1) vertical
}
