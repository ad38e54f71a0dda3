use egui_wgpu::ScreenDescriptor;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::interaction::NormalizedPointer;

/// Values shown in the overlay
#[derive(Debug, Clone)]
pub struct HudStats {
    pub fps: f32,
    pub phase: String,
    pub pointer: NormalizedPointer,
    pub particles: usize,
    pub ticks: u64,
    pub bloom: bool,
    pub character: bool,
}

impl HudStats {
    pub fn frame_time_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }
}

/// egui overlay drawn after the composite
pub struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(device: &Device, format: TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Feed a window event; true if egui consumed it
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        window: &Window,
        stats: &HudStats,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| Self::ui(ctx, stats));

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let size = window.inner_size();
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.renderer
                .render(&mut render_pass.forget_lifetime(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &egui::Context, stats: &HudStats) {
        egui::Window::new("Tech Grid")
            .title_bar(true)
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading(
                    egui::RichText::new(format!("{:.0} FPS", stats.fps))
                        .size(28.0)
                        .color(egui::Color32::from_rgb(139, 92, 246)),
                );
                ui.label(
                    egui::RichText::new(format!("{:.2} ms", stats.frame_time_ms()))
                        .size(14.0)
                        .color(egui::Color32::GRAY),
                );

                ui.add_space(6.0);
                ui.separator();

                ui.monospace(format!("Phase:     {}", stats.phase));
                ui.monospace(format!(
                    "Pointer:   ({:+.2}, {:+.2})",
                    stats.pointer.x, stats.pointer.y
                ));
                ui.monospace(format!("Particles: {}", stats.particles));
                ui.monospace(format!("Ticks:     {}", stats.ticks));
                ui.monospace(format!(
                    "Bloom:     {}",
                    if stats.bloom { "on" } else { "off" }
                ));
                if stats.character {
                    ui.monospace("Character: loaded");
                }
            });
    }
}
