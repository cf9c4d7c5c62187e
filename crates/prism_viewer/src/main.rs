use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use prism_renderer::{Camera, FrameBuffer, Raytracer, RenderConfig, Scene, Vec3};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_FRAMES: u32 = 60;

/// Simulated frame time for the scripted fly-through (60 fps)
const FRAME_DELTA: f32 = 1.0 / 60.0;
/// Degrees per unit of simulated mouse motion per second
const MOUSE_SENSITIVITY: f32 = 2.5;
/// Units per second
const MOVE_SPEED: f32 = 3.0;

/// Command line options.
///
/// Usage: `prism_viewer [scene.json|-] [output_dir] [frames]`
/// where `-` selects the built-in scene. `PRISM_WIDTH`, `PRISM_HEIGHT` and
/// `PRISM_CONFIG` (a JSON render config) are read from the environment.
struct Options {
    scene: Option<PathBuf>,
    output_dir: PathBuf,
    frames: u32,
    width: u32,
    height: u32,
    config: Option<PathBuf>,
}

impl Options {
    fn from_env() -> Result<Self> {
        let mut args = std::env::args().skip(1);

        let scene = args
            .next()
            .filter(|arg| arg != "-")
            .map(PathBuf::from);
        let output_dir = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("frames"));
        let frames = match args.next() {
            Some(arg) => arg
                .parse()
                .with_context(|| format!("invalid frame count {:?}", arg))?,
            None => DEFAULT_FRAMES,
        };

        Ok(Self {
            scene,
            output_dir,
            frames,
            width: env_u32("PRISM_WIDTH", DEFAULT_WIDTH)?,
            height: env_u32("PRISM_HEIGHT", DEFAULT_HEIGHT)?,
            config: std::env::var_os("PRISM_CONFIG").map(PathBuf::from),
        })
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a positive integer, got {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn load_config(options: &Options) -> Result<RenderConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading render config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing render config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };
    config.aspect_ratio = options.width as f32 / options.height as f32;
    Ok(config)
}

fn save_frame(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba())
        .ok_or_else(|| {
            anyhow!(
                "frame buffer size does not match {}x{}",
                frame.width(),
                frame.height()
            )
        })?;
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Scripted stand-in for mouse and keyboard input: sway the view left and
/// right while drifting forward and up.
fn advance_camera(camera: &mut Camera, frame: u32) {
    let mouse_dx = if (frame / 30) % 2 == 0 { 12.0 } else { -12.0 };
    camera.rotate(-mouse_dx * MOUSE_SENSITIVITY * FRAME_DELTA, 0.0);
    camera.move_forward(MOVE_SPEED * FRAME_DELTA * 0.25);
    camera.move_up(MOVE_SPEED * FRAME_DELTA * 0.05);
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Prism viewer");

    let options = Options::from_env()?;
    if options.width == 0 || options.height == 0 {
        return Err(anyhow!(
            "frame size must be non-zero, got {}x{}",
            options.width,
            options.height
        ));
    }

    let scene = match &options.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::demo(),
    };
    let config = load_config(&options)?;
    let raytracer = Raytracer::new(config, scene)?;

    std::fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("creating {}", options.output_dir.display()))?;

    let mut camera = Camera::new(Vec3::ZERO);
    let mut frame = FrameBuffer::new(options.width, options.height);
    let mut total = Duration::ZERO;

    log::info!(
        "Rendering {} frames at {}x{} into {}",
        options.frames,
        options.width,
        options.height,
        options.output_dir.display()
    );

    for index in 0..options.frames {
        let stats = raytracer.render(&camera.basis(), &mut frame)?;
        total += stats.elapsed;

        let path = options.output_dir.join(format!("frame_{:04}.png", index));
        save_frame(&frame, &path)?;

        log::info!(
            "Frame {} rendered in {:?} ({} rays)",
            index,
            stats.elapsed,
            stats.trace.rays
        );

        advance_camera(&mut camera, index);
    }

    if options.frames > 0 {
        let average = total / options.frames;
        log::info!(
            "Average frame time {:?} ({:.1} fps) on {} workers",
            average,
            1.0 / average.as_secs_f64().max(f64::EPSILON),
            raytracer.workers()
        );
    }

    Ok(())
}
