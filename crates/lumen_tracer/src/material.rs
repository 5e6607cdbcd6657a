//! Material trait for surface reflectance and emission.
//!
//! Direction conventions: `wo` points from the surface toward the viewer,
//! `wi` from the surface toward the incoming light. Both are unit length.

use crate::sampling::{cosine_hemisphere, cosine_hemisphere_pdf};
use lumen_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Linear RGB radiance or reflectance.
pub type Color = Vec3;

/// Emission below this luminance is treated as none.
const EMISSION_EPSILON: f32 = 1e-6;

/// A surface's BRDF, its importance sampler, and its emission.
pub trait Material: Send + Sync {
    /// BRDF value for light arriving along `wi` and leaving along `wo`.
    fn eval(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> Color;

    /// Importance-sample an incoming direction.
    fn sample(&self, wo: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Vec3;

    /// Solid-angle density with which [`Material::sample`] produces `wi`.
    fn pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> f32;

    /// Radiance emitted by the surface. Most materials emit nothing.
    fn emission(&self) -> Color {
        Color::ZERO
    }

    fn has_emission(&self) -> bool {
        self.emission().max_element() > EMISSION_EPSILON
    }
}

/// Lambertian (diffuse) material, optionally emissive.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
    emission: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::ZERO,
        }
    }

    /// Builder method to make the surface glow.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn eval(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> Color {
        if normal.dot(wi) > 0.0 && normal.dot(wo) > 0.0 {
            self.albedo / PI
        } else {
            Color::ZERO
        }
    }

    fn sample(&self, _wo: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        cosine_hemisphere(normal, rng)
    }

    fn pdf(&self, _wo: Vec3, wi: Vec3, normal: Vec3) -> f32 {
        cosine_hemisphere_pdf(normal.dot(wi))
    }

    fn emission(&self) -> Color {
        self.emission
    }
}

/// Pure area-light emitter. Reflects nothing.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn eval(&self, _wo: Vec3, _wi: Vec3, _normal: Vec3) -> Color {
        Color::ZERO
    }

    fn sample(&self, _wo: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        cosine_hemisphere(normal, rng)
    }

    fn pdf(&self, _wo: Vec3, wi: Vec3, normal: Vec3) -> f32 {
        cosine_hemisphere_pdf(normal.dot(wi))
    }

    fn emission(&self) -> Color {
        self.emit
    }
}
