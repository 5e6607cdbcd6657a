//! Random sampling helpers shared by materials, objects and the camera.
//!
//! Everything takes an explicit `&mut dyn RngCore` so each render worker can
//! own its generator.

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Map a direction from the local frame (z = `normal`) into world space.
pub fn to_world(local: Vec3, normal: Vec3) -> Vec3 {
    let (tangent, bitangent) = normal.any_orthonormal_pair();
    tangent * local.x + bitangent * local.y + normal * local.z
}

/// Cosine-weighted direction in the hemisphere around `normal`.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);
    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    let local = Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - u1).max(0.0).sqrt());
    to_world(local, normal).normalize_or_zero()
}

/// Solid-angle density of [`cosine_hemisphere`] for a direction with the given cosine.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    if cos_theta > 0.0 {
        cos_theta / PI
    } else {
        0.0
    }
}

/// Uniform direction on the unit sphere.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniform barycentric coordinates over a triangle.
pub fn uniform_triangle(rng: &mut dyn RngCore) -> (f32, f32, f32) {
    let su = gen_f32(rng).sqrt();
    let b1 = gen_f32(rng) * su;
    let b0 = 1.0 - su;
    (b0, b1, 1.0 - b0 - b1)
}

/// Mirror `v` about `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Rec. 709 luminance of a linear RGB color.
#[inline]
pub fn luminance(c: Vec3) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}
