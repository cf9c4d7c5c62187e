//! Scene container for the raytracer.
//!
//! A scene is a fixed set of spheres and lights. It is validated once when
//! built and read-only afterwards; the renderer swaps whole scenes rather
//! than editing one in place.

use std::path::Path;

use prism_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::{AmbientLight, DirectionalLight, PointLight};
use crate::sphere::Sphere;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sphere {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("Sphere {index} has reflectivity {reflectivity} outside [0, 1]")]
    InvalidReflectivity { index: usize, reflectivity: f32 },

    #[error("Directional light direction {0:?} cannot be normalized")]
    DegenerateDirection(Vec3),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Serializable form of a scene, as found in scene files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub spheres: Vec<Sphere>,
    #[serde(default)]
    pub point_lights: Vec<PointLight>,
    #[serde(default)]
    pub directional_lights: Vec<DirectionalLight>,
    #[serde(default)]
    pub ambient_lights: Vec<AmbientLight>,
}

/// Validated, read-only scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    point_lights: Vec<PointLight>,
    directional_lights: Vec<DirectionalLight>,
    ambient_lights: Vec<AmbientLight>,
}

impl Scene {
    /// Validate a description and build a scene from it.
    pub fn new(description: SceneDescription) -> SceneResult<Self> {
        for (index, sphere) in description.spheres.iter().enumerate() {
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SceneError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            if !(0.0..=1.0).contains(&sphere.reflectivity) {
                return Err(SceneError::InvalidReflectivity {
                    index,
                    reflectivity: sphere.reflectivity,
                });
            }
        }

        let scene = Self {
            spheres: description.spheres,
            point_lights: description.point_lights,
            directional_lights: description.directional_lights,
            ambient_lights: description.ambient_lights,
        };

        if scene.light_count() == 0 {
            log::warn!("Scene has no lights, every surface will shade black");
        }

        Ok(scene)
    }

    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Self::new(description)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;
        log::info!(
            "Loaded scene {}: {} spheres, {} lights",
            path.display(),
            scene.spheres.len(),
            scene.light_count()
        );
        Ok(scene)
    }

    /// The built-in scene: three colored spheres under one light of each kind.
    pub fn demo() -> Self {
        let red = Color::new(255, 0, 0, 0);
        let green = Color::new(0, 255, 0, 0);
        let blue = Color::new(0, 0, 255, 0);

        Self {
            spheres: vec![
                Sphere::new(Vec3::new(1.0, -1.0, 5.0), 0.5, red)
                    .with_lambert(0.2)
                    .with_specular(2.0)
                    .with_reflectivity(0.2),
                Sphere::new(Vec3::new(1.5, 0.0, 4.0), 0.5, green)
                    .with_lambert(0.5)
                    .with_specular(50.0)
                    .with_reflectivity(0.4),
                Sphere::new(Vec3::new(-1.5, 0.0, 4.0), 0.5, blue)
                    .with_lambert(1.0)
                    .with_specular(500.0)
                    .with_reflectivity(0.7),
            ],
            point_lights: vec![PointLight::new(Vec3::new(2.0, 1.0, 0.0), Color::WHITE, 0.5)],
            directional_lights: vec![DirectionalLight::from_nonzero(
                Vec3::new(1.0, 1.0, 1.0),
                Color::WHITE,
                0.3,
            )],
            ambient_lights: vec![AmbientLight::new(Color::WHITE, 0.3)],
        }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn directional_lights(&self) -> &[DirectionalLight] {
        &self.directional_lights
    }

    pub fn ambient_lights(&self) -> &[AmbientLight] {
        &self.ambient_lights
    }

    /// Total number of lights of all kinds.
    pub fn light_count(&self) -> usize {
        self.point_lights.len() + self.directional_lights.len() + self.ambient_lights.len()
    }

    /// Serializable copy of this scene.
    pub fn description(&self) -> SceneDescription {
        SceneDescription {
            spheres: self.spheres.clone(),
            point_lights: self.point_lights.clone(),
            directional_lights: self.directional_lights.clone(),
            ambient_lights: self.ambient_lights.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_JSON: &str = r#"{
        "spheres": [
            {
                "center": [0.0, 0.0, 5.0],
                "radius": 1.0,
                "color": { "r": 200, "g": 10, "b": 10 },
                "lambert": 0.5,
                "specular": 10.0,
                "reflectivity": 0.25
            }
        ],
        "directional_lights": [
            {
                "direction": [0.0, 3.0, 0.0],
                "color": { "r": 255, "g": 255, "b": 255 },
                "intensity": 0.4
            }
        ],
        "ambient_lights": [
            { "color": { "r": 255, "g": 255, "b": 255 }, "intensity": 0.2 }
        ]
    }"#;

    #[test]
    fn test_demo_scene() {
        let scene = Scene::demo();
        assert_eq!(scene.spheres().len(), 3);
        assert_eq!(scene.point_lights().len(), 1);
        assert_eq!(scene.directional_lights().len(), 1);
        assert_eq!(scene.ambient_lights().len(), 1);
        assert_eq!(scene.light_count(), 3);

        let dir = scene.directional_lights()[0].direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_json() {
        let scene = Scene::from_json_str(SCENE_JSON).unwrap();
        assert_eq!(scene.spheres().len(), 1);
        assert_eq!(scene.spheres()[0].color, Color::new(200, 10, 10, 0));
        assert!(scene.point_lights().is_empty());
        assert_eq!(scene.directional_lights()[0].direction(), Vec3::Y);
        assert_eq!(scene.ambient_lights()[0].intensity, 0.2);
    }

    #[test]
    fn test_description_round_trip_keeps_demo() {
        let demo = Scene::demo();
        let json = serde_json::to_string(&demo.description()).unwrap();
        let loaded = Scene::from_json_str(&json).unwrap();
        assert_eq!(loaded.spheres(), demo.spheres());
        assert_eq!(loaded.directional_lights(), demo.directional_lights());
    }

    #[test]
    fn test_rejects_bad_radius() {
        let description = SceneDescription {
            spheres: vec![Sphere::new(Vec3::ZERO, 0.0, Color::WHITE)],
            ..Default::default()
        };
        let err = Scene::new(description).unwrap_err();
        assert!(matches!(err, SceneError::InvalidRadius { index: 0, .. }));
    }

    #[test]
    fn test_rejects_bad_reflectivity() {
        let description = SceneDescription {
            spheres: vec![
                Sphere::new(Vec3::ZERO, 1.0, Color::WHITE),
                Sphere::new(Vec3::X, 1.0, Color::WHITE).with_reflectivity(1.5),
            ],
            ..Default::default()
        };
        let err = Scene::new(description).unwrap_err();
        assert!(matches!(err, SceneError::InvalidReflectivity { index: 1, .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Scene::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load("/definitely/not/a/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
