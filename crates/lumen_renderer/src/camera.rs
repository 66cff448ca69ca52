//! Pinhole camera for ray generation.

use crate::sampling::sample_square;
use lumen_core::CameraDesc;
use lumen_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// The image plane sits `distance` units along the view direction and is
/// `screen_width` units wide; its height follows from the image aspect ratio.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: Vec3,
    direction: Vec3,
    up: Vec3,

    // Screen settings
    distance: f32,
    screen_width: f32,

    // Cached computed values (set by initialize())
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 400,
            image_height: 400,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            distance: 1.0,
            screen_width: 2.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set camera position, view direction and up hint.
    pub fn with_position(mut self, position: Vec3, direction: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.direction = direction;
        self.up = up;
        self
    }

    /// Set the image plane distance and width in world units.
    pub fn with_screen(mut self, distance: f32, screen_width: f32) -> Self {
        self.distance = distance;
        self.screen_width = screen_width;
        self
    }

    /// Build an initialized camera from a scene descriptor.
    pub fn from_desc(desc: &CameraDesc, width: u32, height: u32) -> Self {
        let mut camera = Self::new()
            .with_resolution(width, height)
            .with_position(desc.position, desc.direction, desc.up)
            .with_screen(desc.distance, desc.screen_width);
        camera.initialize();
        camera
    }

    /// Recompute the cached image plane (must be called after the builders).
    pub fn initialize(&mut self) {
        let forward = self.direction.normalize_or_degenerate(Vec3::NEG_Z);
        // An up hint parallel to the view direction still needs some basis.
        let right = forward
            .cross(self.up)
            .normalize_or_degenerate(forward.any_orthonormal_vector());
        let true_up = right.cross(forward);

        let screen_height =
            self.screen_width * self.image_height as f32 / self.image_width as f32;
        let viewport_u = self.screen_width * right;
        let viewport_v = -screen_height * true_up;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.position + self.distance * forward - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Generate a ray for pixel (i, j), jittered inside the pixel.
    ///
    /// `i` counts columns from the left, `j` rows from the top.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let (dx, dy) = sample_square(rng);
        self.ray_through(i as f32 + dx, j as f32 + dy)
    }

    /// Ray through fractional pixel coordinates, 0 being a pixel center.
    fn ray_through(&self, x: f32, y: f32) -> Ray {
        let pixel_sample = self.pixel00_loc + x * self.pixel_delta_u + y * self.pixel_delta_v;
        Ray::new(self.position, pixel_sample - self.position)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
