//! Offline image renderer.
//!
//! Renders every pixel through [`World::evaluate`], one or four samples per
//! pixel, splitting the image into buckets that rayon renders in parallel.

use std::path::Path;
use std::time::Instant;

use prism_math::Color;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
use crate::{Camera, World};

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Average four sub-pixel samples per pixel
    pub antialias: bool,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Overrides the scene background for primary rays that miss
    pub background: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            antialias: false,
            bucket_size: DEFAULT_BUCKET_SIZE,
            background: None,
        }
    }
}

impl RenderConfig {
    /// Camera at this resolution with the given vertical field of view.
    pub fn camera(&self, vfov: f32) -> Camera {
        Camera::new(vfov).with_resolution(self.width, self.height)
    }
}

/// Sub-pixel offsets used when antialiasing.
const SUBPIXEL_OFFSETS: [(f32, f32); 4] = [(-0.25, -0.25), (-0.25, 0.25), (0.25, -0.25), (0.25, 0.25)];

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to 8-bit RGBA, clamping each channel.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)).round() as u8;
    let g = (255.0 * clamp_01(color.y)).round() as u8;
    let b = (255.0 * clamp_01(color.z)).round() as u8;
    [r, g, b, 255]
}

/// Render a single pixel. `row` counts down from the top of the image.
///
/// Rows past the bottom of the image are clamped to the bottom row.
pub fn render_pixel(world: &World, camera: &Camera, x: u32, row: u32, config: &RenderConfig) -> Color {
    // Camera rows count up from the bottom
    let y = camera.image_height.saturating_sub(row.saturating_add(1)) as f32;
    let x = x as f32;

    let sample = |dx: f32, dy: f32| {
        let s = world.evaluate(camera.origin(), camera.target(x + dx, y + dy));
        match (s.hit, config.background) {
            (false, Some(background)) => background,
            _ => s.color,
        }
    };

    if config.antialias {
        let sum: Color = SUBPIXEL_OFFSETS.iter().map(|&(dx, dy)| sample(dx, dy)).sum();
        sum / SUBPIXEL_OFFSETS.len() as f32
    } else {
        sample(0.0, 0.0)
    }
}

/// Simple image buffer for storing render output. Row 0 is the top.
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
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place; `pixels` is in [`Bucket::pixels`] order.
    pub fn write_bucket(&mut self, bucket: &Bucket, pixels: &[Color]) {
        for ((x, row), &color) in bucket.pixels().zip(pixels) {
            self.set(x, row, color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the image as a PNG (or any format `image` infers from the extension).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Render the entire scene to an image buffer, buckets in parallel.
///
/// The camera takes its field of view from the scene and its resolution
/// from `config`.
pub fn render(world: &World, config: &RenderConfig) -> ImageBuffer {
    let camera = &config.camera(world.scene().fov);
    let start = Instant::now();
    let before = world.stats().snapshot();

    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets (antialias: {})",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        config.antialias
    );

    let tiles: Vec<(Bucket, Vec<Color>)> = buckets
        .into_par_iter()
        .map(|bucket| (bucket, render_bucket(&bucket, world, camera, config)))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for (bucket, pixels) in &tiles {
        image.write_bucket(bucket, pixels);
    }

    let counts = world.stats().snapshot().since(&before);
    log::info!(
        "Rendered in {:.2?}: {} primary rays, {} hit tests, {} shadow tests",
        start.elapsed(),
        counts.primary,
        counts.hit_tests,
        counts.shadow_tests
    );

    image
}
