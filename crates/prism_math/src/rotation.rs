use std::ops::Mul;

use crate::Vec3;

/// Unit quaternion (w, x, y, z) describing an orientation.
///
/// Angles follow a left-handed convention: `from_axis_angle` negates the
/// half-angle, so a positive yaw about +Y turns +Z towards -X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about a unit `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half_angle = -angle * 0.5;
        let (s, c) = half_angle.sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn length(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Re-normalize after a chain of compositions.
    pub fn normalized(&self) -> Self {
        let length = self.length();
        Self::new(
            self.w / length,
            self.x / length,
            self.y / length,
            self.z / length,
        )
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hamilton product. Not commutative.
impl Mul for Rotation {
    type Output = Rotation;

    fn mul(self, rhs: Rotation) -> Rotation {
        Rotation::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

/// Rotate a vector with the sandwich product `q * v * q^-1`.
///
/// The inverse is taken as the conjugate, which only holds for unit
/// quaternions.
impl Mul<Vec3> for Rotation {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let pure = Rotation::new(0.0, v.x, v.y, v.z);
        let result = self * pure * self.conjugate();
        Vec3::new(result.x, result.y, result.z)
    }
}
