// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod camera;
mod color;
mod interval;
mod ray;
mod rotation;
mod vector;

pub use camera::{Camera, CameraBasis};
pub use color::Color;
pub use interval::Interval;
pub use ray::Ray;
pub use rotation::Rotation;
pub use vector::{epsilon_equals, Vec3Ext};
