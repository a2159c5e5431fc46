//! Rendering: radiance estimation along a ray and the per-pixel sampling loop

use std::path::Path;
use std::time::Instant;

use image::{ImageFormat, Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cameras::Camera;
use crate::materials::Scatterable;
use crate::objects::Hittable;
use crate::{utils, Color, Ray, Result};

/// Lower bound on hit distances, keeps scattered rays from re-hitting their own origin
pub const T_MIN: f64 = 0.001;

/// Receives the final 8-bit pixels, each `(x, y)` exactly once, `y = 0` being the top row
pub trait PixelSink {
    fn put_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>);
}

impl PixelSink for RgbImage {
    fn put_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        RgbImage::put_pixel(self, x, y, color)
    }
}

impl PixelSink for Vec<(u32, u32, Rgb<u8>)> {
    fn put_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        self.push((x, y, color))
    }
}

/// Sampling settings for a render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Fixes the random sequence; drawn at random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_depth() -> u32 {
    50
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            samples_per_pixel: 10,
            max_depth: default_max_depth(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One row after another on the calling thread
    Serial,
    /// Rows spread over the rayon thread pool
    #[default]
    Parallel,
}

/// Sky seen by rays that escape the scene, white at the horizon blending to blue overhead
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.dir.normalize();
    let t = 0.5 * (unit_direction[1] + 1.0);
    (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
}

/// Radiance arriving along `ray`
///
/// Follows the path bounce by bounce, multiplying in each surface's attenuation. The path ends
/// black when a surface absorbs it or once `max_depth` bounces have scattered.
pub fn ray_color<H, R>(ray: &Ray, world: &H, max_depth: u32, rng: &mut R) -> Color
where
    H: Hittable + ?Sized,
    R: Rng + ?Sized,
{
    let mut throughput = Color::new(1.0, 1.0, 1.0);
    let mut ray = *ray;
    let mut depth = 0;

    loop {
        let Some(hr) = world.try_hit(&ray, T_MIN, f64::INFINITY) else {
            return throughput.component_mul(&sky_color(&ray));
        };
        if depth >= max_depth {
            return Color::zeros();
        }
        match hr.material.try_scatter(&ray, &hr, rng) {
            Some(sr) => {
                throughput.component_mul_assign(&sr.attenuation);
                ray = sr.scattered;
                depth += 1;
            }
            None => return Color::zeros(),
        }
    }
}

/// Sum of `samples_per_pixel` jittered samples for pixel column `i`, row `j` counted from the
/// bottom
pub fn sample_pixel<H, R>(
    camera: &Camera,
    world: &H,
    i: u32,
    j: u32,
    settings: &RenderSettings,
    rng: &mut R,
) -> Color
where
    H: Hittable + ?Sized,
    R: Rng + ?Sized,
{
    let mut color = Color::zeros();
    for _ in 0..settings.samples_per_pixel {
        let s = (i as f64 + rng.gen::<f64>()) / settings.width as f64;
        let t = (j as f64 + rng.gen::<f64>()) / settings.height as f64;
        let ray = camera.get_ray(s, t, rng);
        color += ray_color(&ray, world, settings.max_depth, rng);
    }
    color
}

/// Each image row gets its own generator so rows can run in any order or thread
fn row_rng(seed: u64, row: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render image row `y` (top is 0) to display colors
fn render_row<H>(
    camera: &Camera,
    world: &H,
    settings: &RenderSettings,
    seed: u64,
    y: u32,
) -> Vec<Rgb<u8>>
where
    H: Hittable + ?Sized,
{
    let mut rng = row_rng(seed, y);
    let j = settings.height - 1 - y;
    (0..settings.width)
        .map(|i| {
            let color = sample_pixel(camera, world, i, j, settings, &mut rng);
            utils::get_pixel(&color, settings.samples_per_pixel)
        })
        .collect()
}

/// Render the whole image into `sink`
///
/// Returns the seed that was used, so a render can be repeated exactly. Serial and parallel
/// renders with the same seed produce identical pixels.
pub fn render<H, S>(
    camera: &Camera,
    world: &H,
    settings: &RenderSettings,
    mode: RenderMode,
    sink: &mut S,
    progress: &ProgressBar,
) -> u64
where
    H: Hittable + Sync + ?Sized,
    S: PixelSink + ?Sized,
{
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "rendering {}x{} at {} samples per pixel, max depth {} ({:?})",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.max_depth,
        mode
    );
    log::debug!("seed {seed}");
    let start = Instant::now();

    progress.set_length(settings.height as u64);
    let rows: Vec<Vec<Rgb<u8>>> = match mode {
        RenderMode::Serial => (0..settings.height)
            .progress_with(progress.clone())
            .map(|y| render_row(camera, world, settings, seed, y))
            .collect(),
        RenderMode::Parallel => (0..settings.height)
            .into_par_iter()
            .progress_with(progress.clone())
            .map(|y| render_row(camera, world, settings, seed, y))
            .collect(),
    };
    progress.finish();

    for (y, row) in (0u32..).zip(rows) {
        for (x, color) in (0u32..).zip(row) {
            sink.put_pixel(x, y, color);
        }
        log::trace!("row {y} written");
    }
    log::info!("render finished in {:.2?}", start.elapsed());
    seed
}

/// Write a rendered image as PNG, whatever the extension of `path`
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
