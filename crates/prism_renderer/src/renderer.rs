//! Row-parallel frame renderer.
//!
//! Each frame is a synchronous fork-join: one pool task per scanline, then
//! the caller blocks on every row before the frame counts as done. Rows
//! capture the camera pose by value, so a frame never mixes two poses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use prism_core::Scene;
use prism_math::{CameraBasis, Color, Ray, Vec3};
use thiserror::Error;

use crate::pool::{PoolError, TaskError, TaskHandle, TaskPool};
use crate::tracer::{TraceStats, Tracer};
use crate::RenderConfig;

/// Errors reported by the raytracer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Task pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("Render target has no pixels")]
    EmptyTarget,

    #[error("Row {row} failed: {source}")]
    Row {
        row: u32,
        #[source]
        source: TaskError,
    },
}

/// Row-major buffer of packed `0xAARRGGBB` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Create a new buffer filled with zeroes.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Get the color at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color::from_packed(self.pixels[(y * self.width + x) as usize])
    }

    /// Mutable view of scanline `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.width) as usize;
        &mut self.pixels[start..start + self.width as usize]
    }

    /// Packed pixels as bytes, in platform byte order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to RGBA bytes for saving.
    ///
    /// Alpha is written as opaque; scene colors carry alpha through untouched
    /// and most of them leave it at zero.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &packed in &self.pixels {
            let color = Color::from_packed(packed);
            bytes.extend_from_slice(&[color.r, color.g, color.b, 255]);
        }
        bytes
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub rows: u32,
    pub trace: TraceStats,
    pub elapsed: Duration,
}

/// Pixels and counters produced by one row task.
#[derive(Debug, Clone)]
pub struct RowResult {
    pub y: u32,
    pub pixels: Vec<u32>,
    pub stats: TraceStats,
}

/// Normalized direction of the primary ray through the center of pixel (x, y).
///
/// Image y grows downwards; it is flipped so +y in NDC points up.
pub fn primary_ray_direction(
    camera: &CameraBasis,
    config: &RenderConfig,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Vec3 {
    let half_fov_tan = config.half_fov_tan();
    let ndc_x = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    let ndc_y = 1.0 - (y as f32 + 0.5) / height as f32 * 2.0;
    let ndc_x = ndc_x * config.aspect_ratio * half_fov_tan;
    let ndc_y = ndc_y * half_fov_tan;

    (camera.forward + camera.right * ndc_x + camera.up * ndc_y).normalize()
}

/// Trace every pixel of scanline `y`.
pub fn render_row(
    scene: &Scene,
    config: &RenderConfig,
    camera: &CameraBasis,
    y: u32,
    width: u32,
    height: u32,
) -> RowResult {
    let tracer = Tracer::new(scene, config, camera);
    let mut stats = TraceStats::default();

    let pixels = (0..width)
        .map(|x| {
            let direction = primary_ray_direction(camera, config, x, y, width, height);
            let ray = Ray::new(camera.position, direction);
            tracer
                .trace_ray(&ray, config.recursion_limit, &mut stats)
                .to_packed()
        })
        .collect();

    RowResult { y, pixels, stats }
}

/// The raytracing engine: a scene, its settings and a long-lived worker pool.
pub struct Raytracer {
    config: RenderConfig,
    scene: Arc<Scene>,
    pool: TaskPool,
}

impl Raytracer {
    /// Validate `config` and start the worker pool.
    pub fn new(config: RenderConfig, scene: Scene) -> Result<Self, RenderError> {
        config.validate()?;

        let pool = match config.workers {
            Some(workers) => TaskPool::new(workers)?,
            None => TaskPool::with_available_parallelism()?,
        };

        log::info!(
            "Raytracer ready: {} spheres, {} lights, {} workers, recursion limit {}",
            scene.spheres().len(),
            scene.light_count(),
            pool.workers(),
            config.recursion_limit
        );

        Ok(Self {
            config,
            scene: Arc::new(scene),
            pool,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Replace the scene used by subsequent frames.
    pub fn load_scene(&mut self, scene: Scene) {
        log::info!(
            "Scene replaced: {} spheres, {} lights",
            scene.spheres().len(),
            scene.light_count()
        );
        self.scene = Arc::new(scene);
    }

    /// Render one frame into `target`, blocking until every row is done.
    ///
    /// A failed row leaves its scanline untouched; the remaining rows are
    /// still written and the first failure is returned.
    pub fn render(
        &self,
        camera: &CameraBasis,
        target: &mut FrameBuffer,
    ) -> Result<FrameStats, RenderError> {
        if target.is_empty() {
            return Err(RenderError::EmptyTarget);
        }

        let start = Instant::now();
        let (width, height) = (target.width(), target.height());
        let camera = *camera;

        let mut handles = Vec::with_capacity(height as usize);
        for y in 0..height {
            let scene = self.scene.clone();
            let config = self.config;
            let handle = self
                .pool
                .submit(move || render_row(&scene, &config, &camera, y, width, height))?;
            handles.push((y, handle));
        }

        let mut stats = write_rows(handles, target)?;
        stats.elapsed = start.elapsed();
        log::debug!(
            "Frame {}x{} in {:?}: {} rays, {} shading evaluations",
            width,
            height,
            stats.elapsed,
            stats.trace.rays,
            stats.trace.shading_evaluations
        );

        Ok(stats)
    }
}

/// Join row tasks in submission order and copy each finished row into
/// `target`.
///
/// Every handle is joined even after a failure, so the remaining rows still
/// land in the buffer. The first failure is returned.
fn write_rows(
    handles: Vec<(u32, TaskHandle<RowResult>)>,
    target: &mut FrameBuffer,
) -> Result<FrameStats, RenderError> {
    let mut stats = FrameStats::default();
    let mut first_error = None;

    for (y, handle) in handles {
        match handle.join() {
            Ok(row) => {
                target.row_mut(row.y).copy_from_slice(&row.pixels);
                stats.rows += 1;
                stats.trace += row.stats;
            }
            Err(source) => {
                log::warn!("Row {} failed: {}", y, source);
                if first_error.is_none() {
                    first_error = Some(RenderError::Row { row: y, source });
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{AmbientLight, SceneDescription, Sphere};

    fn single_sphere_scene() -> Scene {
        Scene::new(SceneDescription {
            spheres: vec![Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Color::new(30, 60, 90, 0))
                .with_lambert(0.0)],
            ambient_lights: vec![AmbientLight::new(Color::WHITE, 1.0)],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_frame_buffer_rows() {
        let mut buffer = FrameBuffer::new(3, 2);
        buffer.row_mut(1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(buffer.pixels(), &[0, 0, 0, 1, 2, 3]);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(buffer.to_rgba().len(), 24);
    }

    #[test]
    fn test_primary_ray_center_and_flip() {
        let camera = CameraBasis::default();
        let config = RenderConfig::for_dimensions(3, 3);

        let center = primary_ray_direction(&camera, &config, 1, 1, 3, 3);
        assert!((center - Vec3::Z).length() < 1e-6);

        let top = primary_ray_direction(&camera, &config, 1, 0, 3, 3);
        assert!(top.y > 0.0);
        let left = primary_ray_direction(&camera, &config, 0, 1, 3, 3);
        assert!(left.x < 0.0);
        assert!((top.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_row_width() {
        let scene = single_sphere_scene();
        let config = RenderConfig::default();
        let row = render_row(&scene, &config, &CameraBasis::default(), 0, 7, 5);
        assert_eq!(row.pixels.len(), 7);
        assert_eq!(row.y, 0);
        assert_eq!(row.stats.rays, 7);
    }

    #[test]
    fn test_rejects_empty_target() {
        let tracer = Raytracer::new(
            RenderConfig {
                workers: Some(1),
                ..Default::default()
            },
            single_sphere_scene(),
        )
        .unwrap();
        let mut target = FrameBuffer::new(0, 10);
        assert!(matches!(
            tracer.render(&CameraBasis::default(), &mut target),
            Err(RenderError::EmptyTarget)
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = Raytracer::new(
            RenderConfig {
                fov_degrees: 0.0,
                ..Default::default()
            },
            single_sphere_scene(),
        );
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));

        let result = Raytracer::new(
            RenderConfig {
                workers: Some(0),
                ..Default::default()
            },
            single_sphere_scene(),
        );
        assert!(matches!(result, Err(RenderError::Pool(PoolError::NoWorkers))));
    }

    #[test]
    fn test_failed_row_keeps_other_rows() {
        let pool = TaskPool::new(2).unwrap();
        let mut target = FrameBuffer::new(2, 3);

        let handles: Vec<_> = (0..3u32)
            .map(|y| {
                let handle = pool
                    .submit(move || {
                        if y == 1 {
                            panic!("row task failed");
                        }
                        RowResult {
                            y,
                            pixels: vec![y + 10; 2],
                            stats: TraceStats {
                                rays: 2,
                                shading_evaluations: 1,
                            },
                        }
                    })
                    .unwrap();
                (y, handle)
            })
            .collect();

        let err = write_rows(handles, &mut target).unwrap_err();
        match err {
            RenderError::Row { row, source } => {
                assert_eq!(row, 1);
                assert!(matches!(source, TaskError::Panicked(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(target.pixels(), &[10, 10, 0, 0, 12, 12]);
    }

    #[test]
    fn test_write_rows_sums_stats() {
        let pool = TaskPool::new(1).unwrap();
        let mut target = FrameBuffer::new(1, 2);
        let handles: Vec<_> = (0..2u32)
            .map(|y| {
                let handle = pool
                    .submit(move || RowResult {
                        y,
                        pixels: vec![7],
                        stats: TraceStats {
                            rays: 1,
                            shading_evaluations: 3,
                        },
                    })
                    .unwrap();
                (y, handle)
            })
            .collect();

        let stats = write_rows(handles, &mut target).unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.trace.rays, 2);
        assert_eq!(stats.trace.shading_evaluations, 6);
        assert_eq!(target.pixels(), &[7, 7]);
    }
}
