//! Object trait: the geometric primitives the scene is made of.

use crate::intersection::Intersection;
use crate::material::Color;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A point drawn uniformly from an object's surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
    /// Radiance emitted at `position`
    pub emit: Color,
    /// Density with respect to surface area (1 / area for uniform sampling)
    pub pdf: f32,
}

/// Trait for objects that can be intersected and sampled.
pub trait Object: Send + Sync {
    /// Nearest intersection with `ray` whose distance lies inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_>;

    fn bounding_box(&self) -> Aabb;

    /// Total surface area.
    fn area(&self) -> f32;

    /// Whether the object's material emits light.
    fn has_emit(&self) -> bool;

    /// Uniform, area-weighted point on the surface.
    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample;
}
