//! Nearest-hit query interface shared by the BVH and the reference scan.

use crate::intersection::Intersection;
use crate::object::Object;
use lumen_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// A spatial index over scene objects.
///
/// Built once, read-only afterwards; implementations must tolerate any
/// number of concurrent queries.
pub trait Accelerator: Send + Sync {
    /// Nearest hit inside `ray_t`, or the miss sentinel.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_>;

    fn bounding_box(&self) -> Aabb;
}

/// Brute-force scan over every object.
///
/// Reference implementation for validating [`crate::BvhNode`]; never the
/// default accelerator.
pub struct LinearScan {
    objects: Vec<Arc<dyn Object>>,
    bbox: Aabb,
}

impl LinearScan {
    pub fn new(objects: Vec<Arc<dyn Object>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        Self { objects, bbox }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Accelerator for LinearScan {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_> {
        let mut closest = Intersection::miss();
        for object in &self.objects {
            let hit = object.intersect(ray, ray_t.with_max(closest.distance));
            closest = closest.nearest(hit);
        }
        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
