//! Startup configuration
//!
//! Every field is optional in the JSON file; missing values take the
//! defaults below. CLI flags override a subset after loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::DriverSettings;
use crate::cli::Cli;
use crate::field::FieldSettings;
use crate::math::{hex_to_linear, ColorError};
use crate::scene::{CharacterSettings, MaterialDescriptor, MaterialSet, SceneParams};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid color for {field}: {source}")]
    Color {
        field: &'static str,
        #[source]
        source: ColorError,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn color(field: &'static str, hex: &str) -> Result<[f32; 3], ConfigError> {
    hex_to_linear(hex).map_err(|source| ConfigError::Color { field, source })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tech Grid".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per side
    pub count: u32,
    /// Lattice coordinates between drawn lines
    pub line_step: u32,
    pub spacing: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            count: 24,
            line_step: 2,
            spacing: 1.8,
            color: "#8b5cf6".to_string(),
            opacity: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub max_height: f32,
    pub size: f32,
    pub opacity: f32,
    pub size_attenuation: bool,
    /// Falls back to the grid color
    pub color: Option<String>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 150,
            max_height: 5.0,
            size: 0.1,
            opacity: 0.6,
            size_attenuation: true,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub count: usize,
    /// Fraction of the grid extent the elements are scattered over
    pub spread: f32,
    pub max_height: f32,
    pub radius: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            count: 5,
            spread: 0.8,
            max_height: 3.0,
            radius: 0.2,
            color: "#a855f7".to_string(),
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub update_hz: f32,
    pub lerp_factor: f32,
    pub particle_window: usize,
    pub pointer_throttle_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            update_hz: 30.0,
            lerp_factor: 0.05,
            particle_window: 30,
            pointer_throttle_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical, degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 0.0],
            target: [0.0, 0.0, 0.0],
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            near: 20.0,
            far: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    pub threshold: f32,
    pub smoothing: f32,
    /// Height of the blur target in pixels; width follows the aspect ratio
    pub height: u32,
    pub intensity: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.2,
            smoothing: 0.9,
            height: 256,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub path: PathBuf,
    /// Vertices beyond this are subsampled away
    pub max_points: usize,
    /// World-space height the model is scaled to
    pub height: f32,
    pub offset: [f32; 3],
    /// Radians at the window edges
    pub max_yaw: f32,
    pub max_pitch: f32,
    /// Fraction of the remaining look angle covered per frame
    pub easing: f32,
    pub point_size: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            max_points: 20_000,
            height: 3.0,
            offset: [0.0, 2.0, -4.0],
            max_yaw: 0.6,
            max_pitch: 0.3,
            easing: 0.08,
            point_size: 0.04,
            color: "#c4b5fd".to_string(),
            opacity: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub window: WindowConfig,
    pub background: String,
    pub grid: GridConfig,
    pub particles: ParticleConfig,
    pub glow: GlowConfig,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
    pub fog: FogConfig,
    pub bloom: BloomConfig,
    pub character: Option<CharacterConfig>,
    pub seed: Option<u64>,
    pub show_ui: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            background: "#000000".to_string(),
            grid: GridConfig::default(),
            particles: ParticleConfig::default(),
            glow: GlowConfig::default(),
            animation: AnimationConfig::default(),
            camera: CameraConfig::default(),
            fog: FogConfig::default(),
            bloom: BloomConfig::default(),
            character: None,
            seed: None,
            show_ui: true,
        }
    }
}

impl FieldConfig {
    /// Load and validate a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults or `--config`, then CLI overrides, then validation
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.no_ui {
            self.show_ui = false;
        }
        if cli.no_bloom {
            self.bloom.enabled = false;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(count) = cli.particles {
            self.particles.count = count;
        }
        if let Some(count) = cli.grid_count {
            self.grid.count = count;
        }
        if let Some(spacing) = cli.spacing {
            self.grid.spacing = spacing;
        }
        if let Some(hex) = &cli.color {
            self.grid.color = hex.clone();
        }
        if let Some(path) = &cli.scene {
            self.character
                .get_or_insert_with(CharacterConfig::default)
                .path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.count == 0 {
            return Err(invalid("grid.count", "must be at least 1"));
        }
        if !(self.grid.spacing.is_finite() && self.grid.spacing > 0.0) {
            return Err(invalid("grid.spacing", "must be positive"));
        }
        if !(self.animation.update_hz.is_finite() && self.animation.update_hz > 0.0) {
            return Err(invalid("animation.update_hz", "must be positive"));
        }
        if !(self.animation.lerp_factor > 0.0 && self.animation.lerp_factor <= 1.0) {
            return Err(invalid("animation.lerp_factor", "must be in (0, 1]"));
        }
        if self.fog.near >= self.fog.far {
            return Err(invalid("fog", "near must be less than far"));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(invalid("camera", "need 0 < near < far"));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(invalid("camera.fov", "must be in (0, 180)"));
        }
        if self.bloom.height == 0 {
            return Err(invalid("bloom.height", "must be at least 1"));
        }
        if let Some(character) = &self.character {
            if character.path.as_os_str().is_empty() {
                return Err(invalid("character.path", "is empty"));
            }
        }
        self.character_settings()?;

        // Colors resolve or fail here rather than at mount
        self.scene_params()?;
        self.background_linear()?;
        Ok(())
    }

    pub fn background_linear(&self) -> Result<[f32; 3], ConfigError> {
        color("background", &self.background)
    }

    /// Construction parameters with colors resolved to linear RGB
    pub fn scene_params(&self) -> Result<SceneParams, ConfigError> {
        let grid_color = color("grid.color", &self.grid.color)?;
        let particle_color = match &self.particles.color {
            Some(hex) => color("particles.color", hex)?,
            None => grid_color,
        };
        let glow_color = color("glow.color", &self.glow.color)?;

        Ok(SceneParams {
            grid_count: self.grid.count,
            line_step: self.grid.line_step,
            spacing: self.grid.spacing,
            particle_count: self.particles.count,
            particle_max_height: self.particles.max_height,
            glow_count: self.glow.count,
            glow_spread: self.glow.spread,
            glow_max_height: self.glow.max_height,
            materials: MaterialSet {
                line: MaterialDescriptor::line(grid_color, self.grid.opacity),
                particle: MaterialDescriptor::particle(
                    particle_color,
                    self.particles.opacity,
                    self.particles.size,
                    self.particles.size_attenuation,
                ),
                glow: MaterialDescriptor::glow(glow_color, self.glow.opacity, self.glow.radius),
            },
        })
    }

    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            update_hz: self.animation.update_hz,
            lerp_factor: self.animation.lerp_factor,
            particle_window: self.animation.particle_window,
        }
    }

    /// Character scene settings, when one is configured
    pub fn character_settings(&self) -> Result<Option<CharacterSettings>, ConfigError> {
        let Some(character) = &self.character else {
            return Ok(None);
        };
        Ok(Some(CharacterSettings {
            path: character.path.clone(),
            max_points: character.max_points,
            height: character.height,
            offset: glam::Vec3::from_array(character.offset),
            max_yaw: character.max_yaw,
            max_pitch: character.max_pitch,
            easing: character.easing,
            point_size: character.point_size,
            color: color("character.color", &character.color)?,
            opacity: character.opacity,
        }))
    }

    pub fn field_settings(&self) -> Result<FieldSettings, ConfigError> {
        Ok(FieldSettings {
            scene: self.scene_params()?,
            driver: self.driver_settings(),
            pointer_throttle: Duration::from_millis(self.animation.pointer_throttle_ms),
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = FieldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.count, 24);
        assert_eq!(config.particles.count, 150);
        assert!(config.bloom.enabled);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = FieldConfig::from_json(r#"{ "grid": { "count": 32 }, "seed": 5 }"#).unwrap();

        assert_eq!(config.grid.count, 32);
        assert_eq!(config.grid.spacing, 1.8);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.fog, FogConfig::default());
    }

    #[test]
    fn rejects_bad_color() {
        let err = FieldConfig::from_json(r##"{ "grid": { "color": "#12" } }"##).unwrap_err();
        assert!(matches!(err, ConfigError::Color { field: "grid.color", .. }));
    }

    #[test]
    fn rejects_zero_spacing() {
        let err = FieldConfig::from_json(r#"{ "grid": { "spacing": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grid.spacing", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = FieldConfig::from_json("{ grid: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn particle_color_defaults_to_grid() {
        let params = FieldConfig::default().scene_params().unwrap();
        assert_eq!(params.materials.particle.color, params.materials.line.color);
        assert_ne!(params.materials.glow.color, params.materials.line.color);
    }

    #[test]
    fn cli_overrides() {
        let mut config = FieldConfig::default();
        let cli = Cli {
            no_ui: true,
            no_bloom: true,
            particles: Some(40),
            spacing: Some(2.5),
            scene: Some(PathBuf::from("robot.glb")),
            ..Cli::default()
        };

        config.apply_cli(&cli);

        assert!(!config.show_ui);
        assert!(!config.bloom.enabled);
        assert_eq!(config.particles.count, 40);
        assert_eq!(config.grid.spacing, 2.5);
        let character = config.character.unwrap();
        assert_eq!(character.path, PathBuf::from("robot.glb"));
        assert_eq!(character.max_points, 20_000);
    }

    #[test]
    fn field_settings_carry_throttle() {
        let settings = FieldConfig::default().field_settings().unwrap();
        assert_eq!(settings.pointer_throttle, Duration::from_millis(16));
        assert_eq!(settings.driver.particle_window, 30);
        assert_eq!(settings.scene.grid_count, 24);
    }
}
