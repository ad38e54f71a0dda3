use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, TextureView};

use super::surface_renderer::HDR_FORMAT;
use crate::config::BloomConfig;
use crate::types::BloomUniform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    /// Luma where the bright pass starts letting light through
    pub threshold: f32,
    /// Width of the bright pass ramp above the threshold
    pub smoothing: f32,
    /// Blur target height in pixels
    pub height: u32,
    pub intensity: f32,
}

impl From<&BloomConfig> for BloomSettings {
    fn from(config: &BloomConfig) -> Self {
        Self {
            enabled: config.enabled,
            threshold: config.threshold,
            smoothing: config.smoothing,
            height: config.height,
            intensity: config.intensity,
        }
    }
}

impl BloomSettings {
    /// Blur target size for a `width` x `height` scene, keeping the aspect
    pub fn blur_extent(&self, width: u32, height: u32) -> (u32, u32) {
        let target_height = self.height.clamp(1, height.max(1));
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let target_width = ((target_height as f32 * aspect).round() as u32).max(1);
        (target_width, target_height)
    }

    fn uniform(&self, extent: (u32, u32), direction: [f32; 2]) -> BloomUniform {
        BloomUniform {
            threshold: self.threshold,
            smoothing: self.smoothing,
            intensity: self.intensity,
            enabled: if self.enabled { 1.0 } else { 0.0 },
            texel: [1.0 / extent.0 as f32, 1.0 / extent.1 as f32],
            direction,
        }
    }
}

/// Bright pass followed by a horizontal and a vertical blur at reduced
/// resolution. The result ends up in `output_view`.
pub struct BloomPass {
    settings: BloomSettings,
    extent: (u32, u32),
    layout: BindGroupLayout,
    sampler: Sampler,
    bright_pipeline: RenderPipeline,
    blur_pipeline: RenderPipeline,
    params_h: Buffer,
    params_v: Buffer,
    ping_view: TextureView,
    pong_view: TextureView,
    bright_bind_group: BindGroup,
    blur_h_bind_group: BindGroup,
    blur_v_bind_group: BindGroup,
}

impl BloomPass {
    pub fn new(
        device: &Device,
        input: &TextureView,
        width: u32,
        height: u32,
        settings: BloomSettings,
    ) -> Self {
        let extent = settings.blur_extent(width, height);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/bloom.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bloom Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            Self::create_pipeline(device, &pipeline_layout, &shader, "fs_bright", "Bloom Bright Pipeline");
        let blur_pipeline =
            Self::create_pipeline(device, &pipeline_layout, &shader, "fs_blur", "Bloom Blur Pipeline");

        let params_h = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bloom Params Horizontal"),
            contents: bytemuck::bytes_of(&settings.uniform(extent, [1.0, 0.0])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let params_v = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bloom Params Vertical"),
            contents: bytemuck::bytes_of(&settings.uniform(extent, [0.0, 1.0])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ping_view = Self::create_target(device, extent, "Bloom Ping");
        let pong_view = Self::create_target(device, extent, "Bloom Pong");

        let bright_bind_group = Self::create_bind_group(device, &layout, input, &sampler, &params_h);
        let blur_h_bind_group =
            Self::create_bind_group(device, &layout, &ping_view, &sampler, &params_h);
        let blur_v_bind_group =
            Self::create_bind_group(device, &layout, &pong_view, &sampler, &params_v);

        log::debug!("Bloom target {}x{}", extent.0, extent.1);

        Self {
            settings,
            extent,
            layout,
            sampler,
            bright_pipeline,
            blur_pipeline,
            params_h,
            params_v,
            ping_view,
            pong_view,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
        }
    }

    /// Recreate targets for a new scene size, reading from `input`
    pub fn resize(&mut self, device: &Device, queue: &Queue, input: &TextureView, width: u32, height: u32) {
        self.extent = self.settings.blur_extent(width, height);
        self.ping_view = Self::create_target(device, self.extent, "Bloom Ping");
        self.pong_view = Self::create_target(device, self.extent, "Bloom Pong");

        self.bright_bind_group =
            Self::create_bind_group(device, &self.layout, input, &self.sampler, &self.params_h);
        self.blur_h_bind_group =
            Self::create_bind_group(device, &self.layout, &self.ping_view, &self.sampler, &self.params_h);
        self.blur_v_bind_group =
            Self::create_bind_group(device, &self.layout, &self.pong_view, &self.sampler, &self.params_v);

        self.update_params(queue);
    }

    pub fn update_params(&self, queue: &Queue) {
        queue.write_buffer(
            &self.params_h,
            0,
            bytemuck::bytes_of(&self.settings.uniform(self.extent, [1.0, 0.0])),
        );
        queue.write_buffer(
            &self.params_v,
            0,
            bytemuck::bytes_of(&self.settings.uniform(self.extent, [0.0, 1.0])),
        );
    }

    pub fn set_enabled(&mut self, queue: &Queue, enabled: bool) {
        self.settings.enabled = enabled;
        self.update_params(queue);
    }

    /// Record the bright pass and both blur passes; nothing when disabled
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        if !self.settings.enabled {
            return;
        }
        self.draw(encoder, &self.ping_view, &self.bright_pipeline, &self.bright_bind_group, "Bloom Bright Pass");
        self.draw(encoder, &self.pong_view, &self.blur_pipeline, &self.blur_h_bind_group, "Bloom Blur H Pass");
        self.draw(encoder, &self.ping_view, &self.blur_pipeline, &self.blur_v_bind_group, "Bloom Blur V Pass");
    }

    /// Blurred highlights
    pub fn output_view(&self) -> &TextureView {
        &self.ping_view
    }

    /// Uniform holding intensity and the enabled flag, for the composite
    pub fn params_buffer(&self) -> &Buffer {
        &self.params_h
    }

    pub fn settings(&self) -> &BloomSettings {
        &self.settings
    }

    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &TextureView,
        pipeline: &RenderPipeline,
        bind_group: &BindGroup,
        label: &str,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
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
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        fragment: &str,
        label: &str,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
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
        })
    }

    fn create_target(device: &Device, extent: (u32, u32), label: &str) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: extent.0,
                    height: extent.1,
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

    fn create_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        source: &TextureView,
        sampler: &Sampler,
        params: &Buffer,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bloom Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }
}
