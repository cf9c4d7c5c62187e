//! Blinn-Phong shading with hard shadows.
//!
//! Lights contribute plain intensity; light color is not part of the model,
//! so every surface is lit by white scaled by the summed intensity.

use prism_core::{Scene, Sphere};
use prism_math::{Color, Interval, Ray, Vec3};

use crate::intersect::any_intersection;
use crate::RenderConfig;

/// Diffuse plus specular intensity for one light.
///
/// `light_dir` points from the surface towards the light. The specular term
/// is skipped entirely when `specular <= 0`.
pub fn blinn_phong(
    light_dir: Vec3,
    normal: Vec3,
    view: Vec3,
    light_intensity: f32,
    lambert: f32,
    specular: f32,
) -> f32 {
    let mut intensity = 0.0;

    let n_dot_l = normal.dot(light_dir);
    if n_dot_l > 0.0 {
        intensity += light_intensity * lambert * n_dot_l;
    }

    if specular > 0.0 {
        let half_vector = (light_dir + view).normalize();
        let spec = normal.dot(half_vector).max(0.0).powf(specular);
        intensity += light_intensity * spec;
    }

    intensity
}

/// Light visibility queries against one scene.
pub struct Shader<'a> {
    scene: &'a Scene,
    min_distance: f32,
    max_distance: f32,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene, config: &RenderConfig) -> Self {
        Self {
            scene,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    /// True if a sphere blocks `point` from a light `distance_to_light` away.
    ///
    /// Both ends are exclusive: hits at or below the shadow bias and hits
    /// exactly at the light do not count.
    pub fn is_shadowed(&self, point: Vec3, light_dir: Vec3, distance_to_light: f32) -> bool {
        let ray = Ray::new(point, light_dir);
        let window = Interval::new(self.min_distance, distance_to_light);
        any_intersection(&ray, self.scene.spheres(), window)
    }

    /// Summed intensity of every light reaching `point`.
    pub fn lighting_intensity(
        &self,
        point: Vec3,
        normal: Vec3,
        view: Vec3,
        sphere: &Sphere,
    ) -> f32 {
        let mut intensity = 0.0;

        for ambient in self.scene.ambient_lights() {
            intensity += ambient.intensity;
        }

        for light in self.scene.directional_lights() {
            let light_dir = light.direction();
            if !self.is_shadowed(point, light_dir, self.max_distance) {
                intensity += blinn_phong(
                    light_dir,
                    normal,
                    view,
                    light.intensity,
                    sphere.lambert,
                    sphere.specular,
                );
            }
        }

        for light in self.scene.point_lights() {
            let to_light = light.position - point;
            let distance = to_light.length();
            let light_dir = to_light / distance;
            if !self.is_shadowed(point, light_dir, distance) {
                intensity += blinn_phong(
                    light_dir,
                    normal,
                    view,
                    light.intensity,
                    sphere.lambert,
                    sphere.specular,
                );
            }
        }

        intensity
    }

    /// Surface color before reflections.
    pub fn local_color(&self, point: Vec3, normal: Vec3, view: Vec3, sphere: &Sphere) -> Color {
        let intensity = self.lighting_intensity(point, normal, view, sphere);
        sphere.color * (Color::WHITE * intensity)
    }
}
