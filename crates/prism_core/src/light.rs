//! Light records.
//!
//! Light color is stored but the shading model does not use it yet; every
//! light contributes white scaled by its intensity.

use prism_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::SceneError;

/// Omnidirectional light at a position. Shadow rays stop at the light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}

/// Light arriving from infinitely far away along a fixed direction.
///
/// The direction points from the surface towards the light and is
/// normalized once, on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DirectionalLightDesc")]
pub struct DirectionalLight {
    direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Fails if `direction` cannot be normalized.
    pub fn new(direction: Vec3, color: Color, intensity: f32) -> Result<Self, SceneError> {
        let direction = direction
            .try_normalize()
            .ok_or(SceneError::DegenerateDirection(direction))?;
        Ok(Self {
            direction,
            color,
            intensity,
        })
    }

    /// For directions already known to be non-zero.
    pub(crate) fn from_nonzero(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Unit direction towards the light.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

#[derive(Deserialize)]
struct DirectionalLightDesc {
    direction: Vec3,
    color: Color,
    intensity: f32,
}

impl TryFrom<DirectionalLightDesc> for DirectionalLight {
    type Error = SceneError;

    fn try_from(desc: DirectionalLightDesc) -> Result<Self, Self::Error> {
        // Saved scenes already hold unit directions; renormalizing them drifts.
        if desc.direction.is_normalized() {
            return Ok(Self {
                direction: desc.direction,
                color: desc.color,
                intensity: desc.intensity,
            });
        }
        DirectionalLight::new(desc.direction, desc.color, desc.intensity)
    }
}

/// Flat, non-directional light. Never shadowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}
