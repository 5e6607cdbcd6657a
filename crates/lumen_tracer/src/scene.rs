//! Scene assembly and the queries the integrator runs against it.
//!
//! A [`SceneBuilder`] collects objects; building the acceleration structure
//! consumes it and yields an immutable [`Scene`] that can be shared across
//! render threads.

use crate::accel::{Accelerator, LinearScan};
use crate::bvh::BvhNode;
use crate::config::{AcceleratorKind, ConfigError, IntegratorConfig};
use crate::intersection::Intersection;
use crate::light::{LightSample, LightSampler};
use crate::object::Object;
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid integrator configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Object {index} is degenerate: {reason}")]
    DegenerateObject { index: usize, reason: String },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Collects objects before the acceleration structure exists.
#[derive(Default)]
pub struct SceneBuilder {
    objects: Vec<Arc<dyn Object>>,
    config: IntegratorConfig,
}

impl SceneBuilder {
    pub fn new(config: IntegratorConfig) -> Self {
        Self {
            objects: Vec::new(),
            config,
        }
    }

    pub fn add(&mut self, object: Arc<dyn Object>) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Builder-style [`SceneBuilder::add`].
    pub fn with_object(mut self, object: Arc<dyn Object>) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_config(mut self, config: IntegratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Validate the objects and configuration, then build the spatial index.
    pub fn build_acceleration_structure(self) -> SceneResult<Scene> {
        self.config.validate()?;

        for (index, object) in self.objects.iter().enumerate() {
            let area = object.area();
            if !area.is_finite() || area < 0.0 {
                return Err(SceneError::DegenerateObject {
                    index,
                    reason: format!("surface area is {}", area),
                });
            }
            if !object.bounding_box().is_finite() {
                return Err(SceneError::DegenerateObject {
                    index,
                    reason: "bounding box is not finite".to_string(),
                });
            }
        }

        let start = Instant::now();
        let accel: Box<dyn Accelerator> = match self.config.accelerator {
            AcceleratorKind::Bvh => Box::new(BvhNode::new(self.objects.clone())),
            AcceleratorKind::Linear => Box::new(LinearScan::new(self.objects.clone())),
        };
        let lights = LightSampler::new(&self.objects);

        log::info!(
            "Built {:?} over {} objects in {:?}: {} emitters, emissive area {:.3}",
            self.config.accelerator,
            self.objects.len(),
            start.elapsed(),
            lights.emitter_count(),
            lights.total_area()
        );
        if lights.total_area() <= 0.0 {
            log::warn!("Scene has no emissive area; direct lighting will be black");
        }

        Ok(Scene {
            objects: self.objects,
            accel,
            lights,
            config: self.config,
        })
    }
}

/// An immutable, traceable scene.
pub struct Scene {
    objects: Vec<Arc<dyn Object>>,
    accel: Box<dyn Accelerator>,
    lights: LightSampler,
    pub(crate) config: IntegratorConfig,
}

impl Scene {
    /// Nearest hit along `ray`, ignoring hits closer than the ray epsilon.
    pub fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        if ray.is_degenerate() {
            return Intersection::miss();
        }
        self.accel.intersect(ray, Interval::forward(self.config.ray_epsilon))
    }

    /// Area-weighted point on some emitter; `None` if nothing emits.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> Option<LightSample> {
        self.lights.sample(rng)
    }

    pub fn objects(&self) -> &[Arc<dyn Object>] {
        &self.objects
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn light_sampler(&self) -> &LightSampler {
        &self.lights
    }

    pub fn bounding_box(&self) -> Aabb {
        self.accel.bounding_box()
    }
}
