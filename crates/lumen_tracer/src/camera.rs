//! Pinhole camera for primary-ray generation.

use crate::sampling::gen_f32;
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Camera for generating rays into the scene.
#[derive(Clone, Debug)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    /// Vertical field of view in degrees
    vfov: f32,

    // Cached values, set by initialize()
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 512,
            image_height: 512,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Must be called after the builder methods and before generating rays.
    pub fn initialize(&mut self) {
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height.max(1) as f32);

        // Right-handed basis; w points backwards out of the lens.
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;
        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height.max(1) as f32;

        let viewport_upper_left = self.look_from - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Primary ray through pixel (i, j), jittered within the pixel.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let dx = gen_f32(rng) - 0.5;
        let dy = gen_f32(rng) - 0.5;
        let pixel_sample = self.pixel00_loc
            + (i as f32 + dx) * self.pixel_delta_u
            + (j as f32 + dy) * self.pixel_delta_v;

        Ray::new(self.look_from, pixel_sample - self.look_from)
    }

    pub fn position(&self) -> Vec3 {
        self.look_from
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = camera(101, 101);
        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, &mut rng);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!(ray.direction().z < -0.99);
        assert!((ray.direction().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_image_orientation() {
        let camera = camera(100, 100);
        let mut rng = StdRng::seed_from_u64(1);

        // Row 0 is the top of the image, column 0 the left edge.
        let top_left = camera.get_ray(0, 0, &mut rng).direction();
        assert!(top_left.y > 0.0);
        assert!(top_left.x < 0.0);

        // 90 degree fov: the edge rays are about 45 degrees off axis.
        assert!((top_left.y / -top_left.z - 0.99).abs() < 0.02);
    }
}
