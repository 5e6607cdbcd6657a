//! Path integrator: next-event estimation plus Russian-roulette indirect
//! bounces.
//!
//! At each non-emissive hit the estimator is
//!
//! ```text
//! L = L_dir + L_indir
//! L_dir   = Le * f_r * cos(theta) * cos(theta') / r^2 / pdf_light
//! L_indir = L(x', -wi) * f_r * cos(theta) / pdf_hemi / P_RR   (with probability P_RR)
//! ```
//!
//! Secondary rays that land on an emitter contribute nothing; that light is
//! already counted by `L_dir`.

use crate::intersection::Intersection;
use crate::material::Color;
use crate::sampling::gen_f32;
use crate::scene::Scene;
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Recursion limit applied even when `max_depth` is `None`, so a run of
/// lucky roulette draws can't exhaust a worker thread's stack.
pub const PATH_DEPTH_LIMIT: u32 = 512;

/// Shadow-ray visibility test.
///
/// The light counts as visible unless the nearest blocker sits more than
/// `tolerance` in front of the sampled light point. A miss has an infinite
/// blocker distance and is always visible.
#[inline]
pub fn is_light_visible(blocker_distance: f32, light_distance: f32, tolerance: f32) -> bool {
    blocker_distance - light_distance > -tolerance
}

impl Scene {
    /// Estimate the radiance arriving along `ray`.
    ///
    /// `depth` is the number of bounces already taken. A non-finite estimate
    /// is discarded and reported as black so it can't poison a pixel.
    pub fn cast_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let hit = self.intersect(ray);
        let radiance = self.shade(ray, &hit, depth, rng);
        if radiance.is_finite() {
            radiance
        } else {
            log::trace!("Discarding non-finite radiance {:?} at depth {}", radiance, depth);
            Color::ZERO
        }
    }

    fn shade(&self, ray: &Ray, hit: &Intersection<'_>, depth: u32, rng: &mut dyn RngCore) -> Color {
        let Some(material) = hit.material else {
            return Color::ZERO;
        };

        // Emitters end the path; their light is never mixed with reflected light.
        if material.has_emission() {
            return hit.emit;
        }

        let wo = -ray.direction();
        let l_dir = self.direct_lighting(hit, wo, rng);

        if !self.survives_roulette(rng) || self.at_depth_ceiling(depth) {
            return l_dir;
        }

        l_dir + self.indirect_lighting(hit, wo, depth, rng)
    }

    /// Single-sample next-event estimate of light arriving directly from an
    /// emitter at `hit`, leaving toward `wo`.
    pub fn direct_lighting(&self, hit: &Intersection<'_>, wo: Vec3, rng: &mut dyn RngCore) -> Color {
        let Some(material) = hit.material else {
            return Color::ZERO;
        };
        let Some(light) = self.sample_light(rng) else {
            return Color::ZERO;
        };
        if light.pdf <= self.config.pdf_epsilon {
            return Color::ZERO;
        }

        let origin = self.spawn_origin(hit, light.position - hit.coords);
        let to_light = light.position - origin;
        let dist2 = to_light.length_squared();
        if dist2 <= f32::EPSILON {
            return Color::ZERO;
        }
        let dist = dist2.sqrt();
        let ws = to_light / dist;

        let blocker = self.intersect(&Ray::new(origin, ws));
        if !is_light_visible(blocker.distance, dist, self.config.shadow_tolerance) {
            return Color::ZERO;
        }

        let f_r = material.eval(wo, ws, hit.normal);
        let cos_theta = hit.normal.dot(ws).max(0.0);
        let cos_theta_prime = light.normal.dot(-ws).max(0.0);

        light.emit * f_r * (cos_theta * cos_theta_prime / dist2 / light.pdf)
    }

    fn indirect_lighting(
        &self,
        hit: &Intersection<'_>,
        wo: Vec3,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some(material) = hit.material else {
            return Color::ZERO;
        };

        let wi = material.sample(wo, hit.normal, rng).normalize_or_zero();
        if wi == Vec3::ZERO {
            return Color::ZERO;
        }

        let secondary = Ray::new(self.spawn_origin(hit, wi), wi);
        let next = self.intersect(&secondary);
        if !next.happened || next.is_emissive() {
            return Color::ZERO;
        }

        let pdf_hemi = material.pdf(wo, wi, hit.normal);
        if pdf_hemi <= self.config.pdf_epsilon {
            return Color::ZERO;
        }

        let f_r = material.eval(wo, wi, hit.normal);
        let cos_theta = hit.normal.dot(wi).max(0.0);
        let incoming = self.shade(&secondary, &next, depth + 1, rng);

        incoming * f_r * (cos_theta / pdf_hemi / self.config.russian_roulette)
    }

    /// Russian-roulette draw: true with probability `P_RR`.
    pub fn survives_roulette(&self, rng: &mut dyn RngCore) -> bool {
        gen_f32(rng) <= self.config.russian_roulette
    }

    /// Start point for a ray leaving `hit` toward `dir`: the hit point lifted
    /// off the surface, on the side `dir` points to. The lift grows with the
    /// magnitude of the coordinates to stay clear of f32 rounding.
    pub(crate) fn spawn_origin(&self, hit: &Intersection<'_>, dir: Vec3) -> Vec3 {
        let lift = self.config.ray_epsilon * (1.0 + hit.coords.abs().max_element());
        let side = if hit.normal.dot(dir) >= 0.0 { lift } else { -lift };
        hit.coords + hit.normal * side
    }

    fn at_depth_ceiling(&self, depth: u32) -> bool {
        let max_depth = self
            .config
            .max_depth
            .map_or(PATH_DEPTH_LIMIT, |max_depth| max_depth.min(PATH_DEPTH_LIMIT));
        depth + 1 >= max_depth
    }
}
