mod builder;
mod character;
mod glow;
mod grid;
mod materials;
mod particles;

pub use builder::{BuiltScene, SceneBuilder, SceneParams};
pub use character::{CharacterScene, CharacterSettings};
pub use glow::{scatter_glow, GlowElement};
pub use grid::GridGeometry;
pub use materials::{MaterialDescriptor, MaterialKind, MaterialSet};
pub use particles::{ParticleAttributes, ParticleSet};
