//! Math types shared by the Lumen path tracer.
//!
//! Re-exports glam so downstream crates agree on a single vector type.

pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.dot(Vec3::X), 1.0);
        assert_eq!(v + Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
    }
}
