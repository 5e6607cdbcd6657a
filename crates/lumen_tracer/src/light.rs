//! Area-proportional sampling of points on emissive objects.

use crate::material::Color;
use crate::object::Object;
use crate::sampling::gen_f32;
use lumen_math::Vec3;
use rand::RngCore;
use std::sync::Arc;

/// A point chosen on some light source.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    pub position: Vec3,
    pub normal: Vec3,
    /// Radiance emitted at `position`
    pub emit: Color,
    /// Area density over all emitters combined (1 / total emissive area)
    pub pdf: f32,
    /// Index of the chosen emitter in the scene's object list
    pub emitter: usize,
}

struct Emitter {
    index: usize,
    object: Arc<dyn Object>,
    area: f32,
}

/// Picks emitters with probability proportional to their area, then a
/// uniform point on the chosen one.
pub struct LightSampler {
    emitters: Vec<Emitter>,
    /// Running sum of emitter areas
    cumulative_area: Vec<f32>,
    total_area: f32,
}

impl LightSampler {
    /// Collect every object with `has_emit()` from the scene's object list.
    pub fn new(objects: &[Arc<dyn Object>]) -> Self {
        let emitters: Vec<Emitter> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.has_emit())
            .map(|(index, o)| Emitter {
                index,
                object: o.clone(),
                area: o.area().max(0.0),
            })
            .collect();

        let mut running = 0.0;
        let cumulative_area = emitters
            .iter()
            .map(|e| {
                running += e.area;
                running
            })
            .collect();

        Self {
            emitters,
            cumulative_area,
            total_area: running,
        }
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Sum of all emissive surface area.
    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    /// Draw a light sample, or `None` when the scene has no emissive area.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<LightSample> {
        if self.emitters.is_empty() || self.total_area <= 0.0 {
            return None;
        }

        let u = gen_f32(rng) * self.total_area;
        // First emitter whose running area exceeds u
        let chosen = self
            .cumulative_area
            .partition_point(|&running| running <= u)
            .min(self.emitters.len() - 1);
        let emitter = &self.emitters[chosen];

        let surface = emitter.object.sample(rng);
        let selection_probability = emitter.area / self.total_area;
        Some(LightSample {
            position: surface.position,
            normal: surface.normal,
            emit: surface.emit,
            pdf: surface.pdf * selection_probability,
            emitter: emitter.index,
        })
    }
}
