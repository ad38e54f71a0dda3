use std::time::Duration;

use crate::core::OneShotTimer;
use crate::math::to_signed_unit;

/// Pointer target in [-1, 1] per axis, container center at the origin
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedPointer {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPointer {
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Remap from [-1, 1] to [0, 1]
    pub fn to_unit(self) -> [f32; 2] {
        [(self.x + 1.0) * 0.5, (self.y + 1.0) * 0.5]
    }
}

/// Container rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds covering a whole window of the given size
    pub fn window(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// Window coordinates to container-relative pixels
    pub fn relative(&self, x: f32, y: f32) -> [f32; 2] {
        [x - self.left, y - self.top]
    }
}

/// One published pointer update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Container-relative pixels
    pub raw: [f32; 2],
    pub normalized: NormalizedPointer,
    /// [0, 1] per axis, for scene events
    pub unit: [f32; 2],
}

/// Coalesces raw pointer moves into at most one published target per
/// throttle window
#[derive(Debug, Clone)]
pub struct PointerCoupler {
    container: Option<ContainerBounds>,
    latest: Option<[f32; 2]>,
    target: NormalizedPointer,
    timer: OneShotTimer,
    published: u64,
}

impl PointerCoupler {
    pub fn new(throttle: Duration) -> Self {
        Self {
            container: None,
            latest: None,
            target: NormalizedPointer::CENTER,
            timer: OneShotTimer::new(throttle),
            published: 0,
        }
    }

    pub fn with_container(throttle: Duration, container: ContainerBounds) -> Self {
        let mut coupler = Self::new(throttle);
        coupler.set_container(container);
        coupler
    }

    /// Replace the container rectangle
    pub fn set_container(&mut self, container: ContainerBounds) {
        self.container = Some(container);
    }

    /// Resize notification; keeps the container origin
    pub fn resize(&mut self, width: f32, height: f32) {
        let (left, top) = self.container.map_or((0.0, 0.0), |c| (c.left, c.top));
        self.container = Some(ContainerBounds::new(left, top, width, height));
    }

    pub fn container(&self) -> Option<ContainerBounds> {
        self.container
    }

    /// Record a pointer move in window coordinates
    ///
    /// Moves outside the container, or before any container is known, are
    /// dropped. Returns true if the move was accepted.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now: Duration) -> bool {
        let Some(container) = self.container else {
            return false;
        };
        if !container.contains(x, y) {
            return false;
        }

        self.latest = Some(container.relative(x, y));
        self.timer.arm(now);
        true
    }

    /// Publish the latest move once the throttle window has elapsed
    pub fn poll(&mut self, now: Duration) -> Option<PointerSample> {
        if !self.timer.poll(now) {
            return None;
        }
        let raw = self.latest?;
        let container = self.container?;

        match (
            to_signed_unit(raw[0], container.width),
            to_signed_unit(raw[1], container.height),
        ) {
            (Some(x), Some(y)) => {
                self.target = NormalizedPointer::new(x, y);
                self.published += 1;
                Some(PointerSample {
                    raw,
                    normalized: self.target,
                    unit: self.target.to_unit(),
                })
            }
            _ => {
                log::trace!("Zero-sized container, keeping previous pointer target");
                None
            }
        }
    }

    /// Drop any pending publication
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Most recently published target
    pub fn target(&self) -> NormalizedPointer {
        self.target
    }

    /// Number of targets published so far
    pub fn published(&self) -> u64 {
        self.published
    }
}
