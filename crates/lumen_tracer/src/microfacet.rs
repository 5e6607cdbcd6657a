//! Microfacet material: GGX specular lobe over a Lambertian base.
//!
//! Cook-Torrance specular with the GGX (Trowbridge-Reitz) normal
//! distribution, separable Smith shadowing and Schlick's Fresnel.

use crate::material::{Color, Material};
use crate::sampling::{cosine_hemisphere, cosine_hemisphere_pdf, gen_f32, luminance, reflect, to_world};
use lumen_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Glossy material with a diffuse base and a GGX specular coat.
#[derive(Debug, Clone)]
pub struct Microfacet {
    /// Diffuse reflectance of the base layer
    pub diffuse: Color,

    /// Fresnel reflectance at normal incidence (F0)
    pub specular: Color,

    /// Perceptual roughness in (0, 1]; squared to get GGX alpha
    pub roughness: f32,
}

impl Default for Microfacet {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.5),
            specular: Color::splat(0.04),
            roughness: 0.5,
        }
    }
}

impl Microfacet {
    pub fn new(diffuse: Color, specular: Color, roughness: f32) -> Self {
        Self::default()
            .with_diffuse(diffuse)
            .with_specular(specular)
            .with_roughness(roughness)
    }

    /// Dielectric-looking plastic: F0 = 0.04.
    pub fn plastic(color: Color, roughness: f32) -> Self {
        Self::new(color, Color::splat(0.04), roughness)
    }

    /// Conductor: no diffuse base, tinted Fresnel.
    pub fn metal(color: Color, roughness: f32) -> Self {
        Self::new(Color::ZERO, color, roughness)
    }

    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    /// Roughness is clamped away from zero; a perfect mirror has no finite pdf.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.02, 1.0);
        self
    }

    fn alpha(&self) -> f32 {
        self.roughness * self.roughness
    }

    /// Probability of sampling the specular lobe.
    fn specular_probability(&self) -> f32 {
        let s = luminance(self.specular);
        let d = luminance(self.diffuse);
        if s + d <= 0.0 {
            return 0.5;
        }
        (s / (s + d)).clamp(0.1, 0.9)
    }

    fn distribution(&self, n_dot_h: f32) -> f32 {
        let a2 = self.alpha() * self.alpha();
        let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
        a2 / (PI * denom * denom)
    }

    fn smith_g1(&self, n_dot_v: f32) -> f32 {
        let a2 = self.alpha() * self.alpha();
        2.0 * n_dot_v / (n_dot_v + (a2 + (1.0 - a2) * n_dot_v * n_dot_v).sqrt())
    }

    fn fresnel(&self, cos_theta: f32) -> Color {
        let m = (1.0 - cos_theta).clamp(0.0, 1.0);
        self.specular + (Color::ONE - self.specular) * m.powi(5)
    }

    /// Sample a GGX half vector around `normal`.
    fn sample_half_vector(&self, normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a2 = self.alpha() * self.alpha();
        let u1 = gen_f32(rng);
        let u2 = gen_f32(rng);
        let cos_theta = ((1.0 - u1) / (1.0 + (a2 - 1.0) * u1)).max(0.0).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * u2;
        let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        to_world(local, normal).normalize_or_zero()
    }

    fn specular_pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> f32 {
        let h = (wo + wi).normalize_or_zero();
        let n_dot_h = normal.dot(h);
        let wo_dot_h = wo.dot(h);
        if n_dot_h <= 0.0 || wo_dot_h <= 0.0 {
            return 0.0;
        }
        self.distribution(n_dot_h) * n_dot_h / (4.0 * wo_dot_h)
    }
}

impl Material for Microfacet {
    fn eval(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> Color {
        let n_dot_i = normal.dot(wi);
        let n_dot_o = normal.dot(wo);
        if n_dot_i <= 0.0 || n_dot_o <= 0.0 {
            return Color::ZERO;
        }

        let h = (wo + wi).normalize_or_zero();
        let n_dot_h = normal.dot(h).max(0.0);
        let d = self.distribution(n_dot_h);
        let g = self.smith_g1(n_dot_o) * self.smith_g1(n_dot_i);
        let f = self.fresnel(wi.dot(h));

        let specular = f * (d * g / (4.0 * n_dot_o * n_dot_i));
        let diffuse = self.diffuse * (Color::ONE - f) / PI;
        diffuse + specular
    }

    fn sample(&self, wo: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < self.specular_probability() {
            let h = self.sample_half_vector(normal, rng);
            reflect(-wo, h).normalize_or_zero()
        } else {
            cosine_hemisphere(normal, rng)
        }
    }

    fn pdf(&self, wo: Vec3, wi: Vec3, normal: Vec3) -> f32 {
        let p_spec = self.specular_probability();
        p_spec * self.specular_pdf(wo, wi, normal)
            + (1.0 - p_spec) * cosine_hemisphere_pdf(normal.dot(wi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roughness_is_clamped() {
        assert_eq!(Microfacet::default().with_roughness(0.0).roughness, 0.02);
        assert_eq!(Microfacet::default().with_roughness(3.0).roughness, 1.0);
    }

    #[test]
    fn test_eval_below_horizon_is_black() {
        let mat = Microfacet::plastic(Color::splat(0.8), 0.3);
        assert_eq!(mat.eval(Vec3::Y, -Vec3::Y, Vec3::Y), Color::ZERO);
    }

    #[test]
    fn test_specular_peak_in_mirror_direction() {
        let mat = Microfacet::metal(Color::splat(0.9), 0.2);
        let wo = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mirror = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let off = Vec3::new(-0.2, 1.0, 0.5).normalize();

        assert!(mat.eval(wo, mirror, Vec3::Y).x > mat.eval(wo, off, Vec3::Y).x);
    }

    #[test]
    fn test_sampled_directions_have_positive_pdf() {
        let mat = Microfacet::plastic(Color::new(0.7, 0.2, 0.2), 0.4);
        let wo = Vec3::new(0.3, 1.0, 0.1).normalize();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..500 {
            let wi = mat.sample(wo, Vec3::Y, &mut rng);
            if wi.dot(Vec3::Y) > 1e-3 {
                assert!(mat.pdf(wo, wi, Vec3::Y) > 0.0);
            }
        }
    }

    #[test]
    fn test_white_furnace_does_not_gain_energy() {
        // Monte Carlo estimate of directional albedo stays at or below one.
        let mat = Microfacet::metal(Color::ONE, 0.5);
        let wo = Vec3::new(0.0, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(21);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let wi = mat.sample(wo, Vec3::Y, &mut rng);
            let pdf = mat.pdf(wo, wi, Vec3::Y);
            if pdf > 1e-6 {
                sum += mat.eval(wo, wi, Vec3::Y).x * wi.dot(Vec3::Y).max(0.0) / pdf;
            }
        }
        let albedo = sum / n as f32;
        assert!(albedo > 0.5 && albedo < 1.05, "albedo {}", albedo);
    }
}
