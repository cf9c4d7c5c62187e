//! Render configuration.

use prism_math::Color;
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Deepest mirror recursion accepted. Each bounce is a stack frame on a
/// worker thread, and overflowing that stack aborts the process.
pub const MAX_RECURSION_LIMIT: u32 = 64;

/// Construction-time settings for the raytracer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Hit parameters at or below this are ignored; doubles as shadow bias
    pub min_distance: f32,
    /// Hit parameters at or beyond this count as misses
    pub max_distance: f32,
    /// Width / height of the image plane
    pub aspect_ratio: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Maximum number of mirror bounces
    pub recursion_limit: u32,
    /// Color returned when a ray hits nothing
    pub background: Color,
    /// Worker thread count; `None` means one per hardware thread
    pub workers: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.01,
            max_distance: f32::MAX,
            aspect_ratio: 4.0 / 3.0,
            fov_degrees: 45.0,
            recursion_limit: 3,
            background: Color::BLACK,
            workers: None,
        }
    }
}

impl RenderConfig {
    /// Default settings with the aspect ratio of a `width` x `height` frame.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        Self {
            aspect_ratio: width as f32 / height.max(1) as f32,
            ..Default::default()
        }
    }

    /// `tan(fov / 2)`, the image plane half-height at unit distance.
    pub fn half_fov_tan(&self) -> f32 {
        (self.fov_degrees.to_radians() * 0.5).tan()
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.min_distance.is_finite() && self.min_distance >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "min_distance must be finite and non-negative, got {}",
                self.min_distance
            )));
        }
        if !(self.max_distance > self.min_distance) {
            return Err(RenderError::InvalidConfig(format!(
                "max_distance {} must exceed min_distance {}",
                self.max_distance, self.min_distance
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if self.recursion_limit > MAX_RECURSION_LIMIT {
            return Err(RenderError::InvalidConfig(format!(
                "recursion_limit must be at most {}, got {}",
                MAX_RECURSION_LIMIT, self.recursion_limit
            )));
        }
        Ok(())
    }
}
