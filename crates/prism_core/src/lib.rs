//! Prism Core - scene model for the Prism raytracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`
//! - **Lights**: `PointLight`, `DirectionalLight`, `AmbientLight`
//! - **Scene**: validated, read-only collections plus JSON loading
//!
//! # Example
//!
//! ```ignore
//! use prism_core::Scene;
//!
//! let scene = Scene::load("scene.json")?;
//! println!("Loaded {} spheres, {} lights", scene.spheres().len(), scene.light_count());
//! ```

pub mod light;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use light::{AmbientLight, DirectionalLight, PointLight};
pub use scene::{Scene, SceneDescription, SceneError, SceneResult};
pub use sphere::Sphere;
