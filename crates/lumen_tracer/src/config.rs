//! Integrator and render configuration.
//!
//! Every tunable of the path integrator is an explicit field here. The
//! only fixed bound in the tracing code is the stack-safety recursion limit
//! `PATH_DEPTH_LIMIT`. Settings load from JSON with any
//! missing field taking its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Which spatial index the scene is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorKind {
    #[default]
    Bvh,
    /// Brute-force reference scan, for validation only
    Linear,
}

/// Parameters of the path integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Russian-roulette continuation probability (P_RR), in (0, 1]
    pub russian_roulette: f32,
    /// A blocker closer than `light_distance - shadow_tolerance` occludes
    pub shadow_tolerance: f32,
    /// Hard recursion ceiling on top of Russian roulette, counted in path
    /// vertices: `Some(1)` keeps direct lighting only. Must be at least 1,
    /// and may only be `None` while `russian_roulette < 1`.
    pub max_depth: Option<u32>,
    /// Minimum ray parameter. Spawned rays are also lifted off their surface
    /// by `ray_epsilon * (1 + max |coordinate|)` along the normal.
    pub ray_epsilon: f32,
    /// Densities at or below this are treated as zero
    pub pdf_epsilon: f32,
    pub accelerator: AcceleratorKind,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            russian_roulette: 0.8,
            shadow_tolerance: 0.005,
            max_depth: Some(64),
            ray_epsilon: 1e-4,
            pdf_epsilon: 1e-6,
            accelerator: AcceleratorKind::Bvh,
        }
    }
}

impl IntegratorConfig {
    pub fn with_russian_roulette(mut self, p: f32) -> Self {
        self.russian_roulette = p;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_accelerator(mut self, accelerator: AcceleratorKind) -> Self {
        self.accelerator = accelerator;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.russian_roulette > 0.0 && self.russian_roulette <= 1.0) {
            return Err(invalid(
                "russian_roulette",
                format!("{} is outside (0, 1]", self.russian_roulette),
            ));
        }
        match self.max_depth {
            Some(0) => return Err(invalid("max_depth", "must be at least 1")),
            None if self.russian_roulette >= 1.0 => {
                return Err(invalid(
                    "max_depth",
                    "is required when russian_roulette is 1, or paths never end",
                ));
            }
            _ => {}
        }
        for (field, value) in [
            ("shadow_tolerance", self.shadow_tolerance),
            ("ray_epsilon", self.ray_epsilon),
            ("pdf_epsilon", self.pdf_epsilon),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(invalid(field, format!("{} must be finite and >= 0", value)));
            }
        }
        Ok(())
    }
}

/// Sampling and scheduling parameters of the bucket renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub samples_per_pixel: u32,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            bucket_size: 32,
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel", "must be at least 1"));
        }
        if self.bucket_size == 0 {
            return Err(invalid("bucket_size", "must be at least 1"));
        }
        Ok(())
    }
}

/// Everything a render job needs, as read from a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub render: RenderConfig,
    pub integrator: IntegratorConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            render: RenderConfig::default(),
            integrator: IntegratorConfig::default(),
        }
    }
}

impl RenderSettings {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(
                "width/height",
                format!("{}x{} has no pixels", self.width, self.height),
            ));
        }
        self.render.validate()?;
        self.integrator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IntegratorConfig::default();
        assert_eq!(config.russian_roulette, 0.8);
        assert_eq!(config.shadow_tolerance, 0.005);
        assert_eq!(config.accelerator, AcceleratorKind::Bvh);
        assert!(config.validate().is_ok());
        assert!(RenderSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_russian_roulette() {
        for p in [0.0, -0.5, 1.5, f32::NAN] {
            let err = IntegratorConfig::default()
                .with_russian_roulette(p)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    field: "russian_roulette",
                    ..
                }
            ));
        }
        assert!(IntegratorConfig::default()
            .with_russian_roulette(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_max_depth_bounds() {
        let zero = IntegratorConfig::default().with_max_depth(Some(0));
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::Invalid { field: "max_depth", .. })
        ));
        assert!(IntegratorConfig::default().with_max_depth(Some(1)).validate().is_ok());
        assert!(IntegratorConfig::default().with_max_depth(None).validate().is_ok());
    }

    #[test]
    fn test_certain_continuation_requires_depth_ceiling() {
        let unbounded = IntegratorConfig::default()
            .with_russian_roulette(1.0)
            .with_max_depth(None);
        assert!(matches!(
            unbounded.validate(),
            Err(ConfigError::Invalid { field: "max_depth", .. })
        ));

        let from_json = RenderSettings::from_json_str(
            r#"{ "integrator": { "russian_roulette": 1.0, "max_depth": null } }"#,
        );
        assert!(matches!(from_json, Err(ConfigError::Invalid { field: "max_depth", .. })));
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let config = IntegratorConfig {
            shadow_tolerance: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = RenderSettings::from_json_str(
            r#"{
                "width": 64,
                "render": { "samples_per_pixel": 4 },
                "integrator": { "russian_roulette": 0.5, "max_depth": null, "accelerator": "linear" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, 512);
        assert_eq!(settings.render.samples_per_pixel, 4);
        assert_eq!(settings.render.bucket_size, 32);
        assert_eq!(settings.integrator.russian_roulette, 0.5);
        assert_eq!(settings.integrator.max_depth, None);
        assert_eq!(settings.integrator.accelerator, AcceleratorKind::Linear);
        assert_eq!(settings.integrator.shadow_tolerance, 0.005);
    }

    #[test]
    fn test_invalid_json_settings() {
        assert!(matches!(
            RenderSettings::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "render": { "samples_per_pixel": 0 } }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            RenderSettings::from_path("/nonexistent/lumen.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
