use glam::Vec3;

use crate::Rotation;

/// Snapshot of a camera pose, read once per frame by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}

/// First-person camera.
///
/// The basis vectors are recomputed eagerly whenever the orientation changes,
/// so they always stay orthonormal and derived from the current orientation.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    orientation: Rotation,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Camera at `position` looking down +Z.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            orientation: Rotation::IDENTITY,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_direction_vectors();
        camera
    }

    /// Yaw about the global up axis and pitch about the local right axis.
    /// Deltas are in degrees.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let yaw = Rotation::from_axis_angle(Vec3::Y, delta_yaw.to_radians());
        let pitch = Rotation::from_axis_angle(Vec3::X, delta_pitch.to_radians());

        self.orientation = (yaw * self.orientation * pitch).normalized();
        self.update_direction_vectors();
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up * distance;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Current pose as a value the renderer can capture.
    pub fn basis(&self) -> CameraBasis {
        CameraBasis {
            position: self.position,
            forward: self.forward,
            right: self.right,
            up: self.up,
        }
    }

    fn update_direction_vectors(&mut self) {
        self.forward = (self.orientation * Vec3::Z).normalize();
        self.right = (self.orientation * Vec3::X).normalize();
        self.up = (self.orientation * Vec3::Y).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
