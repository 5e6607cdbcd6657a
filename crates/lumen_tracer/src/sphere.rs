//! Sphere primitive.

use crate::intersection::Intersection;
use crate::material::Material;
use crate::object::{Object, SurfaceSample};
use crate::sampling::uniform_sphere;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere with an outward-facing normal.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_> {
        // Direction is unit length, so the quadratic's `a` term is 1.
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return Intersection::miss();
        }
        let sqrtd = discriminant.sqrt();

        let mut root = h - sqrtd;
        if !ray_t.surrounds(root) {
            root = h + sqrtd;
            if !ray_t.surrounds(root) {
                return Intersection::miss();
            }
        }

        let p = ray.at(root);
        let normal = (p - self.center) / self.radius;
        Intersection::hit(root, p, normal, self.material.as_ref())
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        let dir = uniform_sphere(rng);
        SurfaceSample {
            position: self.center + self.radius * dir,
            normal: dir,
            emit: self.material.emission(),
            pdf: 1.0 / self.area(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, DiffuseLight, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let sphere = grey_sphere();
        let hit = sphere.intersect(&ray, Interval::forward(1e-4));

        assert!(hit.happened);
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let sphere = grey_sphere();
        let hit = sphere.intersect(&ray, Interval::forward(1e-4));
        assert!((hit.distance - 0.5).abs() < 1e-5);
        // Normal stays outward.
        assert!((hit.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(!grey_sphere().intersect(&ray, Interval::forward(1e-4)).happened);
    }

    #[test]
    fn test_sphere_area_and_samples() {
        let sphere = Sphere::new(Vec3::ONE, 2.0, Arc::new(DiffuseLight::new(Color::ONE)));
        assert!((sphere.area() - 16.0 * PI).abs() < 1e-3);
        assert!(sphere.has_emit());

        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let s = sphere.sample(&mut rng);
            assert!(((s.position - Vec3::ONE).length() - 2.0).abs() < 1e-4);
            assert!((s.pdf - 1.0 / sphere.area()).abs() < 1e-7);
            assert_eq!(s.emit, Color::ONE);
        }
    }
}
