//! Image tiling.
//!
//! The image is cut into square buckets that rayon renders independently.
//! Buckets are ordered centre-out so the interesting part of a frame is
//! finished first.

use prism_math::Color;

use crate::renderer::render_pixel;
use crate::{Camera, RenderConfig, World};

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangle of pixels. `y` is a row index, so row 0 is the image top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bucket {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinates `(x, row)` covered by the bucket, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Bucket {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| (col, row)))
    }

    /// Squared distance from the bucket's centre to the point `(cx, cy)`.
    fn distance_sq(&self, cx: f32, cy: f32) -> f32 {
        let dx = self.x as f32 + self.width as f32 * 0.5 - cx;
        let dy = self.y as f32 + self.height as f32 * 0.5 - cy;
        dx * dx + dy * dy
    }
}

/// Tile a `width` x `height` image, nearest-to-centre bucket first.
///
/// Edge buckets are clipped to the image. A size of zero is treated as one.
pub fn generate_buckets(width: u32, height: u32, size: u32) -> Vec<Bucket> {
    let size = size.max(1);
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| Bucket {
                x,
                y,
                width: size.min(width - x),
                height: size.min(height - y),
            })
        })
        .collect();

    let (cx, cy) = (width as f32 * 0.5, height as f32 * 0.5);
    buckets.sort_by(|a, b| a.distance_sq(cx, cy).total_cmp(&b.distance_sq(cx, cy)));
    buckets
}

/// Colours of every pixel in `bucket`, in [`Bucket::pixels`] order.
pub fn render_bucket(
    bucket: &Bucket,
    world: &World,
    camera: &Camera,
    config: &RenderConfig,
) -> Vec<Color> {
    bucket
        .pixels()
        .map(|(x, row)| render_pixel(world, camera, x, row, config))
        .collect()
}
