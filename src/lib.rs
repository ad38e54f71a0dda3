pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod field;
pub mod frame;
pub mod hud;
pub mod interaction;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod types;

pub use animation::{AnimationDriver, DriverSettings, TickOutcome};
pub use config::{ConfigError, FieldConfig};
pub use field::{FieldSettings, FrameReport, GridField, Phase};
pub use frame::{FrameInfo, FrameIterator};
pub use scene::{BuiltScene, SceneBuilder, SceneParams};
