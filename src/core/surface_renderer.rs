use std::sync::Arc;

use anyhow::{anyhow, Result};
use wgpu::{
    BindGroup, BindGroupLayout, CommandEncoder, Device, RenderPass, RenderPipeline, Sampler, Surface,
    SurfaceConfiguration, TextureFormat, TextureView,
};

use super::bloom::{BloomPass, BloomSettings};
use super::gpu_context::GpuContext;

/// Offscreen scene target format; bloom reads highlights above 1.0 from it
pub const HDR_FORMAT: TextureFormat = TextureFormat::Rgba16Float;

/// Owns the window surface and the post-process chain
///
/// Each frame the scene is drawn into an HDR target, bloom runs over it,
/// and a fullscreen composite writes scene plus bloom onto the surface.
/// An overlay callback may then draw on top (the HUD).
pub struct SurfaceRenderer {
    gpu: Arc<GpuContext>,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    hdr_view: TextureView,
    bloom: BloomPass,
    composite_pipeline: RenderPipeline,
    composite_layout: BindGroupLayout,
    composite_bind_group: BindGroup,
    sampler: Sampler,
    background: wgpu::Color,
    width: u32,
    height: u32,
}

impl SurfaceRenderer {
    pub fn new(
        gpu: Arc<GpuContext>,
        surface: Surface<'static>,
        width: u32,
        height: u32,
        bloom: BloomSettings,
        background: [f32; 3],
    ) -> Result<Self> {
        let (width, height) = (width.max(1), height.max(1));

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();
        let hdr_view = Self::create_hdr_target(device, width, height);
        let bloom = BloomPass::new(device, &hdr_view, width, height, bloom);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Composite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let (composite_pipeline, composite_layout) =
            Self::create_composite_pipeline(device, surface_format);
        let composite_bind_group =
            Self::create_composite_bind_group(device, &composite_layout, &hdr_view, &bloom, &sampler);

        log::info!(
            "Surface configured: {}x{} {:?}, bloom {}",
            width,
            height,
            surface_format,
            if bloom.settings().enabled { "on" } else { "off" }
        );

        let [r, g, b] = background;
        Ok(Self {
            gpu,
            surface,
            surface_config,
            hdr_view,
            bloom,
            composite_pipeline,
            composite_layout,
            composite_bind_group,
            sampler,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            width,
            height,
        })
    }

    /// Draw one frame
    ///
    /// `draw_scene` records into a pass targeting the HDR buffer, already
    /// cleared to the background. `overlay` gets the encoder and the surface
    /// view after the composite.
    pub fn render<S, O>(&mut self, draw_scene: S, overlay: O) -> Result<(), wgpu::SurfaceError>
    where
        S: FnOnce(&mut RenderPass<'_>),
        O: FnOnce(&mut CommandEncoder, &TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut scene_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            draw_scene(&mut scene_pass);
        }

        self.bloom.render(&mut encoder);

        {
            let mut composite_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            composite_pass.set_pipeline(&self.composite_pipeline);
            composite_pass.set_bind_group(0, &self.composite_bind_group, &[]);
            composite_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        overlay(&mut encoder, &surface_view);

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resize the surface and every size-dependent target
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();

        let device = self.gpu.device();
        self.hdr_view = Self::create_hdr_target(device, width, height);
        self.bloom
            .resize(device, self.gpu.queue(), &self.hdr_view, width, height);
        self.composite_bind_group = Self::create_composite_bind_group(
            device,
            &self.composite_layout,
            &self.hdr_view,
            &self.bloom,
            &self.sampler,
        );
    }

    /// Reapply the current configuration after a lost or outdated surface
    pub fn reconfigure(&mut self) {
        self.surface
            .configure(self.gpu.device(), &self.surface_config);
    }

    pub fn set_bloom_enabled(&mut self, enabled: bool) {
        self.bloom.set_enabled(self.gpu.queue(), enabled);
    }

    pub fn bloom_enabled(&self) -> bool {
        self.bloom.settings().enabled
    }

    pub fn format(&self) -> TextureFormat {
        self.surface_config.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn create_hdr_target(device: &Device, width: u32, height: u32) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Scene HDR Target"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: HDR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_composite_pipeline(
        device: &Device,
        surface_format: TextureFormat,
    ) -> (RenderPipeline, BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/composite.wgsl").into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Composite Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Composite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    fn create_composite_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        scene: &TextureView,
        bloom: &BloomPass,
        sampler: &Sampler,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bloom.output_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: bloom.params_buffer().as_entire_binding(),
                },
            ],
        })
    }
}
