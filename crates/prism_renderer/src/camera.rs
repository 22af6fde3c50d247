//! Pinhole camera for primary rays.
//!
//! The camera sits at the origin looking down -Z with an image plane at
//! `z = -1`. Camera pixel coordinates have `y = 0` on the bottom row.

use prism_math::Vec3;

/// Camera for generating primary ray targets.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    /// Vertical field of view in degrees
    vfov: f32,

    // Half extents of the image plane, cached by update()
    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a camera with the given vertical field of view in degrees.
    pub fn new(vfov: f32) -> Self {
        let mut camera = Self {
            image_width: 640,
            image_height: 480,
            vfov,
            half_width: 0.0,
            half_height: 0.0,
        };
        camera.update();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.update();
        self
    }

    fn update(&mut self) {
        self.half_height = (self.vfov.to_radians() / 2.0).tan();
        self.half_width = self.half_height * self.image_width as f32 / self.image_height as f32;
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Point on the image plane for camera pixel `(x, y)`, sampled at the
    /// pixel center. Fractional coordinates offset the sample.
    pub fn target(&self, x: f32, y: f32) -> Vec3 {
        let w = self.half_width;
        let h = self.half_height;
        Vec3::new(
            -w + 2.0 * w * (x + 0.5) / self.image_width as f32,
            -h + 2.0 * h * (y + 0.5) / self.image_height as f32,
            -1.0,
        )
    }
}
