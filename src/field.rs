use std::fmt;
use std::time::Duration;

use glam::Vec3;

use crate::animation::{AnimationDriver, DriverSettings, TickOutcome};
use crate::core::{ResourceLifecycle, SceneBackend, SceneUpdate};
use crate::frame::FrameInfo;
use crate::interaction::{ContainerBounds, NormalizedPointer, PointerCoupler, PointerSample};
use crate::scene::{BuiltScene, SceneBuilder, SceneParams};

/// Component lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    Constructing,
    Active,
    TearingDown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unmounted => "Unmounted",
            Phase::Constructing => "Constructing",
            Phase::Active => "Active",
            Phase::TearingDown => "Tearing down",
        };
        f.write_str(name)
    }
}

/// Everything fixed at construction time
#[derive(Debug, Clone)]
pub struct FieldSettings {
    pub scene: SceneParams,
    pub driver: DriverSettings,
    pub pointer_throttle: Duration,
    /// Seed for placement and window selection; entropy when `None`
    pub seed: Option<u64>,
}

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: TickOutcome,
    /// Pointer target published this frame, if any
    pub published: Option<PointerSample>,
}

impl FrameReport {
    fn idle() -> Self {
        Self {
            tick: TickOutcome::Skipped,
            published: None,
        }
    }
}

/// The animated grid field: builder, driver, pointer coupler and the
/// resources one backend holds for it
pub struct GridField<B: SceneBackend> {
    backend: B,
    params: SceneParams,
    builder: SceneBuilder,
    driver: AnimationDriver,
    pointer: PointerCoupler,
    resources: ResourceLifecycle<B::Handle>,
    phase: Phase,
}

impl<B: SceneBackend> GridField<B> {
    pub fn new(backend: B, settings: FieldSettings) -> Self {
        // Separate streams so placement does not depend on how often the driver ran
        let driver_seed = settings.seed.map(|seed| seed.wrapping_add(1));
        Self {
            backend,
            params: settings.scene,
            builder: SceneBuilder::new(settings.seed),
            driver: AnimationDriver::new(settings.driver, driver_seed),
            pointer: PointerCoupler::new(settings.pointer_throttle),
            resources: ResourceLifecycle::new(),
            phase: Phase::Unmounted,
        }
    }

    /// Build the scene and allocate its resources
    ///
    /// Returns true once the field is active. A backend failure is logged
    /// and leaves the field unmounted.
    pub fn mount(&mut self) -> bool {
        if self.phase != Phase::Unmounted {
            return self.phase == Phase::Active;
        }
        self.phase = Phase::Constructing;

        let scene = self.builder.build(&self.params);
        match self.backend.create(scene) {
            Ok(handles) => {
                self.resources.extend(handles);
                self.driver.reset();
                self.phase = Phase::Active;
                log::info!(
                    "Grid field mounted: {} resources, {} particles",
                    self.resources.len(),
                    scene.particles.len()
                );
                true
            }
            Err(e) => {
                log::warn!("Grid field disabled, backend failed: {}", e);
                self.builder.clear();
                self.phase = Phase::Unmounted;
                false
            }
        }
    }

    /// Advance one frame. No-op unless active.
    pub fn frame(&mut self, frame: &FrameInfo) -> FrameReport {
        if self.phase != Phase::Active {
            return FrameReport::idle();
        }
        let Some(scene) = self.builder.scene_mut() else {
            return FrameReport::idle();
        };

        let published = self.pointer.poll(frame.timestamp);
        let tick = self.driver.tick(
            frame.time,
            frame.timestamp,
            self.pointer.target(),
            &mut scene.particles,
        );

        if tick.is_update() {
            let dirty = scene.particles.take_dirty();
            self.backend.sync(
                &self.resources,
                SceneUpdate {
                    particles: scene.particles.attributes(),
                    dirty,
                    rotation: self.driver.rotation(),
                },
            );
        }

        FrameReport { tick, published }
    }

    /// Hand the backend and live resources to a draw callback. Returns
    /// `None` without calling `f` unless active, so released handles are
    /// never drawn.
    pub fn render_with<R>(
        &mut self,
        f: impl FnOnce(&mut B, &ResourceLifecycle<B::Handle>) -> R,
    ) -> Option<R> {
        if self.phase != Phase::Active {
            return None;
        }
        Some(f(&mut self.backend, &self.resources))
    }

    /// Raw pointer move in window pixels; ignored unless active
    pub fn pointer_moved(&mut self, x: f32, y: f32, now: Duration) -> bool {
        self.phase == Phase::Active && self.pointer.on_pointer_move(x, y, now)
    }

    /// Container moved or resized
    pub fn set_container(&mut self, container: ContainerBounds) {
        self.pointer.set_container(container);
        self.backend
            .resize(container.width.max(0.0) as u32, container.height.max(0.0) as u32);
    }

    /// Window resized; the container follows the window
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pointer.resize(width as f32, height as f32);
        self.backend.resize(width, height);
    }

    /// Tear down: cancel the pointer timer, release every resource once and
    /// forget the memoized scene. Returns how many resources were released.
    pub fn unmount(&mut self) -> usize {
        if self.phase != Phase::Active {
            return 0;
        }
        self.phase = Phase::TearingDown;

        self.pointer.cancel();
        let released = self.resources.release_all();
        self.builder.clear();
        self.driver.reset();

        self.phase = Phase::Unmounted;
        log::info!("Grid field unmounted, released {} resources", released);
        released
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn resources(&self) -> &ResourceLifecycle<B::Handle> {
        &self.resources
    }

    /// Built scene while mounted
    pub fn scene(&self) -> Option<&BuiltScene> {
        self.builder.scene()
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    /// How many times the scene was constructed over the field's life
    pub fn builds(&self) -> usize {
        self.builder.builds()
    }

    pub fn pointer_target(&self) -> NormalizedPointer {
        self.pointer.target()
    }

    pub fn rotation(&self) -> Vec3 {
        self.driver.rotation()
    }

    /// Active animation ticks since mount
    pub fn ticks(&self) -> u64 {
        self.driver.ticks()
    }
}

impl<B: SceneBackend> Drop for GridField<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
