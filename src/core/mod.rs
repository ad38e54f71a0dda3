mod backend;
mod bloom;
mod clock;
mod gpu_context;
mod resources;
mod surface_renderer;
mod timer;

pub use backend::{BackendError, SceneBackend, SceneUpdate};
pub use bloom::{BloomPass, BloomSettings};
pub use clock::{Clock, ManualClock, SystemClock};
pub use gpu_context::GpuContext;
pub use resources::{Releasable, ResourceKind, ResourceLifecycle};
pub use surface_renderer::{SurfaceRenderer, HDR_FORMAT};
pub use timer::{OneShotTimer, RateLimiter};
