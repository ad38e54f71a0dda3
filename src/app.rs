use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::config::FieldConfig;
use crate::core::{BloomSettings, GpuContext, SurfaceRenderer};
use crate::field::GridField;
use crate::frame::{FpsCounter, FrameIterator};
use crate::hud::{Hud, HudStats};
use crate::interaction::{forward_pointer, PointerEvent, WinitPointerAdapter};
use crate::renderer::{CharacterMesh, GpuBackend, ViewSettings};
use crate::scene::CharacterScene;

/// Everything that needs a live window
struct Graphics {
    window: Arc<Window>,
    gpu: Arc<GpuContext>,
    surface: SurfaceRenderer,
    field: GridField<GpuBackend>,
    character: Option<(CharacterScene, CharacterMesh)>,
    hud: Option<Hud>,
}

pub struct App {
    config: FieldConfig,
    graphics: Option<Graphics>,
    frames: FrameIterator,
    pointer: WinitPointerAdapter,
    fps: FpsCounter,
}

impl App {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            graphics: None,
            frames: FrameIterator::new(),
            pointer: WinitPointerAdapter::new(),
            fps: FpsCounter::new(0.5),
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let config = &self.config;
        let attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();

        let (gpu, surface) = pollster::block_on(GpuContext::new_with_surface(window.clone()))?;
        let gpu = Arc::new(gpu);

        let background = config.background_linear()?;
        let surface = SurfaceRenderer::new(
            gpu.clone(),
            surface,
            size.width,
            size.height,
            BloomSettings::from(&config.bloom),
            background,
        )?;

        let view = ViewSettings {
            camera: Camera::new(&config.camera),
            fog: [config.fog.near, config.fog.far],
            fog_color: background,
        };
        let backend = GpuBackend::new(gpu.clone(), view, size.width, size.height);
        let mut field = GridField::new(backend, config.field_settings()?);
        field.resize(size.width, size.height);
        field.mount();

        let character = match config.character_settings()? {
            Some(settings) => {
                let path = settings.path.clone();
                match CharacterScene::load(settings) {
                    Ok(scene) => {
                        log::info!(
                            "Loaded character {} ({} points)",
                            path.display(),
                            scene.points().len()
                        );
                        let mesh = field.backend().upload_character(&scene);
                        Some((scene, mesh))
                    }
                    Err(e) => {
                        log::warn!("Character disabled: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let hud = config
            .show_ui
            .then(|| Hud::new(gpu.device(), surface.format(), &window));

        Ok(Graphics {
            window,
            gpu,
            surface,
            field,
            character,
            hud,
        })
    }

    fn redraw(&mut self) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        let Some(frame) = self.frames.next() else {
            return;
        };
        if let Some(fps) = self.fps.record(frame.delta) {
            log::trace!("{:.1} fps", fps);
        }

        let Graphics {
            window,
            gpu,
            surface,
            field,
            character,
            hud,
        } = graphics;

        let report = field.frame(&frame);
        if let Some((scene, _)) = character.as_mut() {
            if let Some(sample) = &report.published {
                forward_pointer(scene, sample);
            }
            scene.update();
        }

        let stats = HudStats {
            fps: self.fps.fps(),
            phase: field.phase().to_string(),
            pointer: field.pointer_target(),
            particles: field.scene().map_or(0, |scene| scene.particles.len()),
            ticks: field.ticks(),
            bloom: surface.bloom_enabled(),
            character: character.is_some(),
        };

        let result = surface.render(
            |pass| {
                field.render_with(|backend, resources| backend.draw(pass, resources));
                if let Some((scene, mesh)) = character.as_ref() {
                    field
                        .backend()
                        .draw_character(pass, mesh, scene.model_matrix());
                }
            },
            |encoder, view| {
                if let Some(hud) = hud.as_mut() {
                    hud.render(gpu.device(), gpu.queue(), encoder, view, &**window, &stats);
                }
            },
        );

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => surface.reconfigure(),
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.as_mut() {
            graphics.field.unmount();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(e) => {
                log::error!("Failed to initialize: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        if let Some(hud) = graphics.hud.as_mut() {
            if hud.handle_event(&graphics.window, &event) {
                return;
            }
        }

        if matches!(event, WindowEvent::CloseRequested) || WinitPointerAdapter::is_exit_key(&event) {
            self.shutdown(event_loop);
            return;
        }

        match self.pointer.process_event(&event) {
            Some(PointerEvent::Moved { x, y }) => {
                graphics.field.pointer_moved(x, y, self.frames.now());
            }
            Some(PointerEvent::Resized { width, height }) => {
                graphics.surface.resize(width, height);
                graphics.field.resize(width, height);
                graphics.window.request_redraw();
            }
            Some(PointerEvent::Left) => log::trace!("Pointer left the window"),
            None => {}
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyB),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let enabled = !graphics.surface.bloom_enabled();
                graphics.surface.set_bloom_enabled(enabled);
                log::info!("Bloom {}", if enabled { "on" } else { "off" });
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.as_mut() {
            graphics.field.unmount();
        }
    }
}
