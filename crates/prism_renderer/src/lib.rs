//! Prism Renderer - CPU Whitted raytracer.
//!
//! Renders spheres lit by ambient, directional and point lights with
//! Blinn-Phong shading, hard shadows and recursive mirror reflections.
//! Frames are split into scanlines and traced on a fixed worker pool.

mod config;
mod intersect;
pub mod pool;
mod renderer;
mod shading;
mod tracer;

pub use config::{MAX_RECURSION_LIMIT, RenderConfig};
pub use intersect::{any_intersection, closest_intersection, intersect_ray_sphere, Hit};
pub use pool::{PoolError, TaskError, TaskHandle, TaskPool};
pub use renderer::{
    primary_ray_direction, render_row, FrameBuffer, FrameStats, Raytracer, RenderError, RowResult,
};
pub use shading::{blinn_phong, Shader};
pub use tracer::{TraceStats, Tracer};

/// Re-export scene and math types used in the public API
pub use prism_core::{AmbientLight, DirectionalLight, PointLight, Scene, SceneDescription, Sphere};
pub use prism_math::{Camera, CameraBasis, Color, Ray, Vec3};
