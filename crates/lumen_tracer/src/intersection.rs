//! Result of a nearest-hit ray query.

use crate::material::{Color, Material};
use lumen_math::Vec3;

/// Record of a ray-object intersection.
///
/// A miss is a first-class value with `happened == false`, an infinite
/// distance and no material; callers never need an error path for it.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    /// Whether anything was hit
    pub happened: bool,
    /// Distance along the (unit) ray direction
    pub distance: f32,
    /// Hit point
    pub coords: Vec3,
    /// Geometric surface normal (unit length)
    pub normal: Vec3,
    /// Material of the hit object; `None` iff `happened` is false
    pub material: Option<&'a dyn Material>,
    /// Radiance emitted at the hit point
    pub emit: Color,
}

impl<'a> Intersection<'a> {
    /// The miss sentinel.
    pub fn miss() -> Self {
        Self {
            happened: false,
            distance: f32::INFINITY,
            coords: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: None,
            emit: Color::ZERO,
        }
    }

    pub fn hit(distance: f32, coords: Vec3, normal: Vec3, material: &'a dyn Material) -> Self {
        Self {
            happened: true,
            distance,
            coords,
            normal,
            material: Some(material),
            emit: material.emission(),
        }
    }

    /// True when the hit surface is a light source.
    pub fn is_emissive(&self) -> bool {
        self.material.map_or(false, |m| m.has_emission())
    }

    /// Keep whichever of two records is closer.
    pub fn nearest(self, other: Intersection<'a>) -> Intersection<'a> {
        if other.happened && other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self::miss()
    }
}

impl std::fmt::Debug for Intersection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("happened", &self.happened)
            .field("distance", &self.distance)
            .field("coords", &self.coords)
            .field("normal", &self.normal)
            .field("emit", &self.emit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{DiffuseLight, Lambertian};

    #[test]
    fn test_miss_sentinel() {
        let miss = Intersection::miss();
        assert!(!miss.happened);
        assert!(miss.material.is_none());
        assert!(miss.distance.is_infinite());
        assert!(!miss.is_emissive());
    }

    #[test]
    fn test_hit_copies_emission() {
        let light = DiffuseLight::new(Color::splat(3.0));
        let hit = Intersection::hit(2.0, Vec3::ZERO, Vec3::Y, &light);
        assert!(hit.happened);
        assert!(hit.is_emissive());
        assert_eq!(hit.emit, Color::splat(3.0));
    }

    #[test]
    fn test_nearest() {
        let mat = Lambertian::new(Color::ONE);
        let near = Intersection::hit(1.0, Vec3::ZERO, Vec3::Y, &mat);
        let far = Intersection::hit(5.0, Vec3::ZERO, Vec3::Y, &mat);

        assert_eq!(far.nearest(near).distance, 1.0);
        assert_eq!(near.nearest(far).distance, 1.0);
        assert_eq!(Intersection::miss().nearest(far).distance, 5.0);
        assert!(near.nearest(Intersection::miss()).happened);
    }
}
