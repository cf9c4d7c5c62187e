//! Recursive Whitted-style ray tracing.

use std::ops::AddAssign;

use prism_core::Scene;
use prism_math::{epsilon_equals, CameraBasis, Color, Interval, Ray, Vec3, Vec3Ext};

use crate::intersect::closest_intersection;
use crate::shading::Shader;
use crate::RenderConfig;

/// Counters gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Rays cast through `trace_ray`, primary and reflected
    pub rays: u64,
    /// Surface points shaded
    pub shading_evaluations: u64,
}

impl AddAssign for TraceStats {
    fn add_assign(&mut self, rhs: Self) {
        self.rays += rhs.rays;
        self.shading_evaluations += rhs.shading_evaluations;
    }
}

/// Traces rays through one scene for one frame.
pub struct Tracer<'a> {
    scene: &'a Scene,
    shader: Shader<'a>,
    background: Color,
    window: Interval,
    view: Vec3,
}

impl<'a> Tracer<'a> {
    /// The view vector used for specular highlights is the camera's
    /// negated forward direction, shared by every ray in the frame.
    pub fn new(scene: &'a Scene, config: &RenderConfig, camera: &CameraBasis) -> Self {
        Self {
            scene,
            shader: Shader::new(scene, config),
            background: config.background,
            window: Interval::new(config.min_distance, config.max_distance),
            view: -camera.forward,
        }
    }

    /// Color seen along `ray`, following at most `depth` mirror bounces.
    pub fn trace_ray(&self, ray: &Ray, depth: u32, stats: &mut TraceStats) -> Color {
        stats.rays += 1;

        let Some(hit) = closest_intersection(ray, self.scene.spheres(), self.window) else {
            return self.background;
        };
        let sphere = hit.sphere;

        let point = ray.at(hit.t);
        let normal = sphere.normal_at(point);
        let color = self.shader.local_color(point, normal, self.view, sphere);
        stats.shading_evaluations += 1;

        let reflectivity = sphere.reflectivity;
        if depth == 0 || epsilon_equals(reflectivity, 0.0) {
            return color;
        }

        let reflected = Ray::new(point, ray.direction.reflect_about(normal));
        let reflected_color = self.trace_ray(&reflected, depth - 1, stats);

        color * (1.0 - reflectivity) + reflected_color * reflectivity
    }
}
