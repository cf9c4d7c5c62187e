//! Sphere primitive.

use prism_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// A sphere with Blinn-Phong surface parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    /// Diffuse color
    pub color: Color,
    /// Diffuse weight
    pub lambert: f32,
    /// Specular exponent; 0 disables the specular term
    pub specular: f32,
    /// Mirror weight in [0, 1]
    pub reflectivity: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            lambert: 1.0,
            specular: 0.0,
            reflectivity: 0.0,
        }
    }

    pub fn with_lambert(mut self, lambert: f32) -> Self {
        self.lambert = lambert;
        self
    }

    pub fn with_specular(mut self, specular: f32) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    /// Outward unit normal at a point on the surface.
    #[inline]
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}
