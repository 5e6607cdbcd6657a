//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::intersection::Intersection;
use crate::material::Material;
use crate::object::{Object, SurfaceSample};
use crate::sampling::uniform_triangle;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A single triangle. The face normal follows the winding order
/// `(v1 - v0) x (v2 - v0)`.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    normal: Vec3,
    area: f32,
    /// Determinant below which a ray counts as parallel to the face
    det_epsilon: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let cross = edge1.cross(edge2);

        Self {
            v0,
            v1,
            v2,
            edge1,
            edge2,
            normal: cross.normalize_or_zero(),
            area: 0.5 * cross.length(),
            det_epsilon: 1e-7 * edge1.length() * edge2.length(),
            material,
            bbox: Aabb::from_point_cloud(&[v0, v1, v2]),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Collinear or collapsed triangles can't be hit or sampled.
    ///
    /// The area is judged against the edge lengths, so tiny but well-shaped
    /// triangles survive.
    pub fn is_degenerate(&self) -> bool {
        let scale = self.edge1.length() * self.edge2.length();
        !(self.area.is_finite() && scale.is_finite())
            || scale == 0.0
            || 2.0 * self.area <= 1e-6 * scale
    }
}

impl Object for Triangle {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Parallel to the plane (or degenerate)
        if a.abs() <= self.det_epsilon {
            return Intersection::miss();
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return Intersection::miss();
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return Intersection::miss();
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.surrounds(t) {
            return Intersection::miss();
        }

        Intersection::hit(t, ray.at(t), self.normal, self.material.as_ref())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        let (b0, b1, b2) = uniform_triangle(rng);
        SurfaceSample {
            position: self.v0 * b0 + self.v1 * b1 + self.v2 * b2,
            normal: self.normal,
            emit: self.material.emission(),
            pdf: 1.0 / self.area,
        }
    }
}
