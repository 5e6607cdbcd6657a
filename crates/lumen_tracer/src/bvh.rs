//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built by median split along the longest centroid axis.

use crate::accel::Accelerator;
use crate::intersection::Intersection;
use crate::object::Object;
use lumen_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// Maximum objects per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with objects.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        objects: Vec<Arc<dyn Object>>,
        bbox: Aabb,
    },
    Empty,
}

impl BvhNode {
    pub fn new(objects: Vec<Arc<dyn Object>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    fn build(mut objects: Vec<Arc<dyn Object>>) -> Self {
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if objects.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            let c = o.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        BvhNode::Branch {
            left: Box::new(Self::build(objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }

    /// Height of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Accelerator for BvhNode {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_> {
        match self {
            BvhNode::Empty => Intersection::miss(),

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return Intersection::miss();
                }
                let mut closest = Intersection::miss();
                for object in objects {
                    let hit = object.intersect(ray, ray_t.with_max(closest.distance));
                    closest = closest.nearest(hit);
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return Intersection::miss();
                }
                let hit_left = left.intersect(ray, ray_t);
                // Only search the right subtree up to the closest hit so far
                let hit_right = right.intersect(ray, ray_t.with_max(hit_left.distance));
                hit_left.nearest(hit_right)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::LinearScan;
    use crate::material::{Color, Lambertian};
    use crate::sampling::uniform_sphere;
    use crate::Sphere;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sphere_field(n: usize, rng: &mut StdRng) -> Vec<Arc<dyn Object>> {
        let mat = Arc::new(Lambertian::new(Color::splat(0.5)));
        (0..n)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                Arc::new(Sphere::new(center, rng.gen_range(0.2..1.0), mat.clone()))
                    as Arc<dyn Object>
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.depth(), 0);
    }

    #[test]
    fn test_bvh_single_object_is_leaf() {
        let mat = Arc::new(Lambertian::new(Color::ONE));
        let bvh = BvhNode::new(vec![Arc::new(Sphere::new(-Vec3::Z, 0.5, mat))]);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let hit = bvh.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z), Interval::forward(1e-4));
        assert!(hit.happened);
    }

    #[test]
    fn test_bvh_row_of_spheres() {
        let mat = Arc::new(Lambertian::new(Color::ONE));
        let spheres: Vec<Arc<dyn Object>> = (0..10)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, mat.clone()))
                    as Arc<dyn Object>
            })
            .collect();
        let bvh = BvhNode::new(spheres);
        assert!(bvh.depth() > 1);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Z);
        let hit = bvh.intersect(&ray, Interval::forward(1e-4));
        assert!(hit.happened);
        assert!((hit.coords.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_agrees_with_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = sphere_field(200, &mut rng);
        let bvh = BvhNode::new(objects.clone());
        let scan = LinearScan::new(objects);

        for _ in 0..500 {
            let ray = Ray::new(Vec3::ZERO, uniform_sphere(&mut rng));
            let a = bvh.intersect(&ray, Interval::forward(1e-4));
            let b = scan.intersect(&ray, Interval::forward(1e-4));

            assert_eq!(a.happened, b.happened);
            if a.happened {
                assert!((a.distance - b.distance).abs() < 1e-4);
            }
        }
    }
}
