//! Render driver.
//!
//! Splits the image into buckets, renders them on a rayon thread pool and
//! assembles the averaged colors into an image buffer. Tone mapping to 8-bit
//! output happens last: clamp to [0, 255], then `255 * (c / 255)^gamma`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{ray_color, Camera, Color, Hittable, Scene, MAX_RGB};
use lumen_core::{ConfigError, RenderSettings};
use lumen_math::Interval;

/// Errors that stop a render before it starts.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Camera resolution {camera:?} doesn't match settings {settings:?}")]
    ResolutionMismatch {
        camera: (u32, u32),
        settings: (u32, u32),
    },
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` traced paths, not clamped.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let background = settings.background_color();
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, settings.max_depth, background, rng);
    }

    pixel_color / settings.samples_per_pixel.max(1) as f32
}

/// Clamp a channel to [0, 255] and apply `255 * (c / 255)^gamma`.
///
/// NaN counts as black.
#[inline]
pub fn linear_to_gamma(channel: f32, gamma: f32) -> f32 {
    let channel = if channel.is_nan() { 0.0 } else { channel };
    let clamped = Interval::RGB.clamp(channel);
    MAX_RGB * (clamped / MAX_RGB).powf(gamma)
}

/// Convert an averaged color to 8-bit RGB.
pub fn tone_map(color: Color, gamma: f32) -> [u8; 3] {
    let channel = |c: f32| linear_to_gamma(c, gamma).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result
            .pixels
            .chunks(bucket.width.max(1) as usize)
            .enumerate()
        {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Tone map to RGB bytes, row-major, top row first.
    pub fn to_rgb8(&self, gamma: f32) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| tone_map(color, gamma))
            .collect()
    }
}

/// Shared stop signal for a running render.
///
/// Buckets that have not started when `cancel` is called are skipped;
/// buckets already in flight finish.
#[derive(Debug, Default)]
pub struct RenderControl {
    cancelled: AtomicBool,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A finished (or cancelled) render pass.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub buckets_rendered: usize,
    pub buckets_total: usize,
    pub elapsed: Duration,
}

impl RenderOutput {
    /// True when every bucket was rendered.
    pub fn is_complete(&self) -> bool {
        self.buckets_rendered == self.buckets_total
    }
}

/// Render the scene with the given settings.
pub fn render(scene: &Scene, settings: &RenderSettings) -> Result<RenderOutput, RenderError> {
    render_with_control(scene, settings, &RenderControl::new())
}

/// Render the scene, checking `control` before each bucket.
pub fn render_with_control(
    scene: &Scene,
    settings: &RenderSettings,
    control: &RenderControl,
) -> Result<RenderOutput, RenderError> {
    settings.validate()?;

    let camera = &scene.camera;
    if (camera.image_width, camera.image_height) != (settings.width, settings.height) {
        return Err(RenderError::ResolutionMismatch {
            camera: (camera.image_width, camera.image_height),
            settings: (settings.width, settings.height),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;

    let buckets = generate_buckets(settings.width, settings.height, settings.bucket_size);
    let total = buckets.len();
    let completed = AtomicUsize::new(0);
    let reported = AtomicUsize::new(0);
    let world = scene.world.as_ref();

    log::info!(
        "Rendering {}x{} ({} spp, depth {}) in {} buckets on {} threads",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.max_depth,
        total,
        pool.current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .filter_map(|bucket| {
                if control.is_cancelled() {
                    return None;
                }

                let result = render_bucket(bucket, camera, world, settings);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                let step = done * 10 / total;
                if step > reported.fetch_max(step, Ordering::Relaxed) {
                    log::info!("Render {}% complete", step * 10);
                }

                Some(result)
            })
            .collect()
    });

    let mut image = ImageBuffer::new(settings.width, settings.height);
    for result in &results {
        image.write_bucket(result);
    }

    let elapsed = start.elapsed();
    let output = RenderOutput {
        image,
        buckets_rendered: results.len(),
        buckets_total: total,
        elapsed,
    };

    if output.is_complete() {
        log::info!("Render finished in {:.2?}", elapsed);
    } else {
        log::warn!(
            "Render cancelled after {}/{} buckets ({:.2?})",
            output.buckets_rendered,
            total,
            elapsed
        );
    }

    Ok(output)
}
