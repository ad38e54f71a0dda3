use std::path::PathBuf;

use glam::{Mat4, Vec3};
use serde_json::Value;

use super::materials::MaterialDescriptor;
use super::particles::ParticleAttributes;
use crate::interaction::{pointer_payload, SceneEventSink, MOUSE_POSITION};
use crate::loaders::{gltf, load_points, LoadError};
use crate::math::lerp;

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSettings {
    pub path: PathBuf,
    pub max_points: usize,
    pub height: f32,
    pub offset: Vec3,
    pub max_yaw: f32,
    pub max_pitch: f32,
    pub easing: f32,
    pub point_size: f32,
    /// Linear RGB
    pub color: [f32; 3],
    pub opacity: f32,
}

/// A point model that turns to look at the pointer
pub struct CharacterScene {
    settings: CharacterSettings,
    points: Vec<ParticleAttributes>,
    look: (f32, f32),
    target: (f32, f32),
}

impl CharacterScene {
    /// Load the model named in `settings`
    pub fn load(settings: CharacterSettings) -> Result<Self, LoadError> {
        let positions = load_points(&settings.path, settings.max_points)?;
        Ok(Self::from_points(positions, settings))
    }

    pub fn from_points(mut positions: Vec<Vec3>, settings: CharacterSettings) -> Self {
        gltf::normalize_to_height(&mut positions, settings.height);
        let points = positions
            .into_iter()
            .map(|p| ParticleAttributes::new(p.to_array(), 1.0))
            .collect();
        Self {
            settings,
            points,
            look: (0.0, 0.0),
            target: (0.0, 0.0),
        }
    }

    /// Ease the look angles toward the target; call once per frame
    pub fn update(&mut self) {
        let t = self.settings.easing;
        self.look = (
            lerp(self.look.0, self.target.0, t),
            lerp(self.look.1, self.target.1, t),
        );
    }

    /// Aim at unit pointer coordinates, (0.5, 0.5) being straight ahead
    pub fn look_at_unit(&mut self, x: f32, y: f32) {
        let (x, y) = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        self.target = (
            (x - 0.5) * 2.0 * self.settings.max_yaw,
            (y - 0.5) * 2.0 * self.settings.max_pitch,
        );
    }

    /// Current (yaw, pitch) in radians
    pub fn look(&self) -> (f32, f32) {
        self.look
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.settings.offset)
            * Mat4::from_rotation_y(self.look.0)
            * Mat4::from_rotation_x(self.look.1)
    }

    pub fn points(&self) -> &[ParticleAttributes] {
        &self.points
    }

    pub fn material(&self) -> MaterialDescriptor {
        MaterialDescriptor::particle(
            self.settings.color,
            self.settings.opacity,
            self.settings.point_size,
            true,
        )
    }

    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }
}

impl SceneEventSink for CharacterScene {
    fn emit_event(&mut self, name: &str, payload: &Value) {
        match name {
            MOUSE_POSITION => match pointer_payload(payload) {
                Some([x, y]) => self.look_at_unit(x, y),
                None => log::warn!("Malformed {} payload: {}", MOUSE_POSITION, payload),
            },
            other => log::debug!("Ignoring scene event {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn settings() -> CharacterSettings {
        CharacterSettings {
            path: PathBuf::from("robot.glb"),
            max_points: 100,
            height: 4.0,
            offset: Vec3::new(0.0, 7.0, -14.0),
            max_yaw: 0.6,
            max_pitch: 0.3,
            easing: 0.5,
            point_size: 0.04,
            color: [1.0, 1.0, 1.0],
            opacity: 0.9,
        }
    }

    fn character() -> CharacterScene {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 1.0)];
        CharacterScene::from_points(positions, settings())
    }

    #[test]
    fn scales_model_to_height() {
        let scene = character();
        let top = scene
            .points()
            .iter()
            .map(|p| p.position[1])
            .fold(f32::MIN, f32::max);
        assert_relative_eq!(top, 4.0);
    }

    #[test]
    fn mouse_position_sets_target() {
        let mut scene = character();

        scene.emit_event(MOUSE_POSITION, &json!({ "x": 1.0, "y": 0.25 }));

        let (yaw, pitch) = scene.target();
        assert_relative_eq!(yaw, 0.6);
        assert_relative_eq!(pitch, -0.15);
    }

    #[test]
    fn eases_toward_target() {
        let mut scene = character();
        scene.look_at_unit(1.0, 0.5);

        scene.update();
        assert_relative_eq!(scene.look().0, 0.3);
        scene.update();
        assert_relative_eq!(scene.look().0, 0.45);
    }

    #[test]
    fn unknown_events_ignored() {
        let mut scene = character();
        scene.emit_event("click", &json!({ "x": 1.0, "y": 1.0 }));
        scene.emit_event(MOUSE_POSITION, &json!("bad"));
        assert_eq!(scene.target(), (0.0, 0.0));
    }

    #[test]
    fn centered_model_matrix_is_translation() {
        let scene = character();
        let origin = scene.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, 7.0, -14.0));
    }
}
