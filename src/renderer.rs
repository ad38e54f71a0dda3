use std::mem::size_of;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec3};
use wgpu::util::DeviceExt;
use wgpu::{BindGroupLayout, Buffer, BufferUsages, Device, RenderPass, RenderPipeline};

use crate::camera::Camera;
use crate::core::{
    BackendError, GpuContext, Releasable, ResourceKind, ResourceLifecycle, SceneBackend,
    SceneUpdate, HDR_FORMAT,
};
use crate::scene::{BuiltScene, CharacterScene, MaterialDescriptor, ParticleAttributes};
use crate::types::{FrameUniform, MaterialUniform};

/// One GPU buffer plus the bind group that exposes it, if any
pub struct GpuResource {
    buffer: Buffer,
    bind_group: Option<wgpu::BindGroup>,
    /// Vertices or instances held
    count: u32,
}

impl Releasable for GpuResource {
    fn release(self) {
        self.buffer.destroy();
    }
}

/// Fog and camera shared by everything the backend draws
#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub camera: Camera,
    pub fog: [f32; 2],
    pub fog_color: [f32; 3],
}

/// Layouts and pipelines for lines and billboard sprites
struct FieldPipelines {
    frame_layout: BindGroupLayout,
    material_layout: BindGroupLayout,
    line: RenderPipeline,
    sprite: RenderPipeline,
}

impl FieldPipelines {
    fn new(device: &Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/field.wgsl").into()),
        });

        let uniform_layout = |label| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        };
        let frame_layout = uniform_layout("Frame Bind Group Layout");
        let material_layout = uniform_layout("Material Bind Group Layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Field Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }];
        let sprite_buffers = [wgpu::VertexBufferLayout {
            array_stride: size_of::<ParticleAttributes>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Size
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }];

        let line = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ("Line Pipeline", "vs_line", "fs_line"),
            &line_buffers,
            wgpu::PrimitiveTopology::LineList,
        );
        let sprite = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ("Sprite Pipeline", "vs_sprite", "fs_sprite"),
            &sprite_buffers,
            wgpu::PrimitiveTopology::TriangleList,
        );

        Self {
            frame_layout,
            material_layout,
            line,
            sprite,
        }
    }

    /// `stages` is (label, vertex entry, fragment entry)
    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        stages: (&str, &str, &str),
        buffers: &[wgpu::VertexBufferLayout<'_>],
        topology: wgpu::PrimitiveTopology,
    ) -> RenderPipeline {
        let (label, vs, fs) = stages;
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vs),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fs),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// GPU-side handles for the character point model
pub struct CharacterMesh {
    points: GpuResource,
    frame: GpuResource,
    material: GpuResource,
}

impl Drop for CharacterMesh {
    fn drop(&mut self) {
        self.points.buffer.destroy();
        self.frame.buffer.destroy();
        self.material.buffer.destroy();
    }
}

/// wgpu implementation of the scene backend
pub struct GpuBackend {
    gpu: Arc<GpuContext>,
    pipelines: FieldPipelines,
    view: ViewSettings,
    width: u32,
    height: u32,
    rotation: Vec3,
    transform_stale: bool,
}

impl GpuBackend {
    pub fn new(gpu: Arc<GpuContext>, view: ViewSettings, width: u32, height: u32) -> Self {
        let pipelines = FieldPipelines::new(gpu.device());
        Self {
            gpu,
            pipelines,
            view,
            width: width.max(1),
            height: height.max(1),
            rotation: Vec3::ZERO,
            transform_stale: true,
        }
    }

    /// Group transform for the current rotation
    pub fn group_model(rotation: Vec3) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
    }

    fn frame_uniform(&self, model: Mat4) -> FrameUniform {
        self.view.camera.to_uniform(
            model,
            self.width,
            self.height,
            self.view.fog,
            self.view.fog_color,
        )
    }

    fn check_size(&self, kind: ResourceKind, bytes: usize) -> Result<(), BackendError> {
        let limit = self.gpu.device().limits().max_buffer_size;
        if bytes as u64 > limit {
            return Err(BackendError::Allocation {
                kind,
                message: format!("{} bytes exceeds the {} byte buffer limit", bytes, limit),
            });
        }
        Ok(())
    }

    fn geometry(
        &self,
        kind: ResourceKind,
        contents: &[u8],
        count: usize,
        usage: BufferUsages,
    ) -> Result<GpuResource, BackendError> {
        self.check_size(kind, contents.len())?;
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(kind.label()),
                contents,
                usage,
            });
        Ok(GpuResource {
            buffer,
            bind_group: None,
            count: count as u32,
        })
    }

    fn uniform(&self, label: &str, contents: &[u8], layout: &BindGroupLayout) -> GpuResource {
        let device = self.gpu.device();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        GpuResource {
            buffer,
            bind_group: Some(bind_group),
            count: 1,
        }
    }

    fn material(&self, kind: ResourceKind, material: &MaterialDescriptor) -> GpuResource {
        self.uniform(
            kind.label(),
            bytemuck::bytes_of(&MaterialUniform::from(material)),
            &self.pipelines.material_layout,
        )
    }

    /// Record draw calls for the mounted field
    pub fn draw(&mut self, pass: &mut RenderPass<'_>, resources: &ResourceLifecycle<GpuResource>) {
        let Some(transform) = resources.get(ResourceKind::GroupTransform) else {
            return;
        };
        if self.transform_stale {
            let uniform = self.frame_uniform(Self::group_model(self.rotation));
            self.gpu
                .queue()
                .write_buffer(&transform.buffer, 0, bytemuck::bytes_of(&uniform));
            self.transform_stale = false;
        }
        let Some(frame_group) = &transform.bind_group else {
            return;
        };
        pass.set_bind_group(0, frame_group, &[]);

        let draws = [
            (ResourceKind::LineGeometry, ResourceKind::LineMaterial),
            (ResourceKind::ParticleGeometry, ResourceKind::ParticleMaterial),
            (ResourceKind::GlowGeometry, ResourceKind::GlowMaterial),
        ];
        for (geometry_kind, material_kind) in draws {
            let (Some(geometry), Some(material)) =
                (resources.get(geometry_kind), resources.get(material_kind))
            else {
                continue;
            };
            let Some(material_group) = &material.bind_group else {
                continue;
            };
            if geometry.count == 0 {
                continue;
            }

            pass.set_bind_group(1, material_group, &[]);
            pass.set_vertex_buffer(0, geometry.buffer.slice(..));
            if geometry_kind == ResourceKind::LineGeometry {
                pass.set_pipeline(&self.pipelines.line);
                pass.draw(0..geometry.count, 0..1);
            } else {
                pass.set_pipeline(&self.pipelines.sprite);
                pass.draw(0..6, 0..geometry.count); // One quad per instance
            }
        }
    }

    /// Upload a character's points; its handles live outside the field lifecycle
    pub fn upload_character(&self, character: &CharacterScene) -> CharacterMesh {
        let points = character.points();
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Character Points"),
                contents: bytemuck::cast_slice(points),
                usage: BufferUsages::VERTEX,
            });
        let frame = self.uniform(
            "Character Transform",
            bytemuck::bytes_of(&self.frame_uniform(character.model_matrix())),
            &self.pipelines.frame_layout,
        );
        let material = self.uniform(
            "Character Material",
            bytemuck::bytes_of(&MaterialUniform::from(&character.material())),
            &self.pipelines.material_layout,
        );

        log::info!("Character uploaded: {} points", points.len());
        CharacterMesh {
            points: GpuResource {
                buffer,
                bind_group: None,
                count: points.len() as u32,
            },
            frame,
            material,
        }
    }

    pub fn draw_character(&self, pass: &mut RenderPass<'_>, mesh: &CharacterMesh, model: Mat4) {
        if mesh.points.count == 0 {
            return;
        }
        let (Some(frame_group), Some(material_group)) =
            (&mesh.frame.bind_group, &mesh.material.bind_group)
        else {
            return;
        };

        let uniform = self.frame_uniform(model);
        self.gpu
            .queue()
            .write_buffer(&mesh.frame.buffer, 0, bytemuck::bytes_of(&uniform));

        pass.set_pipeline(&self.pipelines.sprite);
        pass.set_bind_group(0, frame_group, &[]);
        pass.set_bind_group(1, material_group, &[]);
        pass.set_vertex_buffer(0, mesh.points.buffer.slice(..));
        pass.draw(0..6, 0..mesh.points.count);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl SceneBackend for GpuBackend {
    type Handle = GpuResource;

    fn create(
        &mut self,
        scene: &BuiltScene,
    ) -> Result<Vec<(ResourceKind, GpuResource)>, BackendError> {
        let glow_instances = scene.glow_attributes();
        let particles = scene.particles.attributes();

        let line = self.geometry(
            ResourceKind::LineGeometry,
            bytemuck::cast_slice(scene.grid.vertices()),
            scene.grid.vertex_count(),
            BufferUsages::VERTEX,
        )?;
        let particle = self.geometry(
            ResourceKind::ParticleGeometry,
            bytemuck::cast_slice(particles),
            particles.len(),
            BufferUsages::VERTEX | BufferUsages::COPY_DST,
        )?;
        let glow = self.geometry(
            ResourceKind::GlowGeometry,
            bytemuck::cast_slice(&glow_instances),
            glow_instances.len(),
            BufferUsages::VERTEX,
        )?;

        let materials = &scene.materials;
        let transform = self.uniform(
            ResourceKind::GroupTransform.label(),
            bytemuck::bytes_of(&self.frame_uniform(Mat4::IDENTITY)),
            &self.pipelines.frame_layout,
        );

        self.rotation = Vec3::ZERO;
        self.transform_stale = true;

        Ok(vec![
            (ResourceKind::LineGeometry, line),
            (ResourceKind::ParticleGeometry, particle),
            (ResourceKind::GlowGeometry, glow),
            (
                ResourceKind::LineMaterial,
                self.material(ResourceKind::LineMaterial, &materials.line),
            ),
            (
                ResourceKind::ParticleMaterial,
                self.material(ResourceKind::ParticleMaterial, &materials.particle),
            ),
            (
                ResourceKind::GlowMaterial,
                self.material(ResourceKind::GlowMaterial, &materials.glow),
            ),
            (ResourceKind::GroupTransform, transform),
        ])
    }

    fn sync(&mut self, resources: &ResourceLifecycle<GpuResource>, update: SceneUpdate<'_>) {
        if let (Some(range), Some(geometry)) =
            (update.dirty, resources.get(ResourceKind::ParticleGeometry))
        {
            let end = range.end.min(update.particles.len());
            if range.start < end {
                let offset = (range.start * size_of::<ParticleAttributes>()) as wgpu::BufferAddress;
                self.gpu.queue().write_buffer(
                    &geometry.buffer,
                    offset,
                    bytemuck::cast_slice(&update.particles[range.start..end]),
                );
            }
        }

        self.rotation = update.rotation;
        self.transform_stale = true;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.transform_stale = true;
    }
}
