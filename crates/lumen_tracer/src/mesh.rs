//! Indexed triangle mesh with its own BVH.

use crate::accel::Accelerator;
use crate::bvh::BvhNode;
use crate::intersection::Intersection;
use crate::material::Material;
use crate::object::{Object, SurfaceSample};
use crate::sampling::gen_f32;
use crate::triangle::Triangle;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while assembling a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    RaggedIndices(usize),

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Mesh has no non-degenerate triangles")]
    Empty,
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A triangle mesh sharing one material.
///
/// Sampling picks a triangle with probability proportional to its area, so
/// points are uniform over the whole mesh surface.
pub struct TriangleMesh {
    triangles: Vec<Arc<Triangle>>,
    /// Running sum of triangle areas, same order as `triangles`
    cumulative_area: Vec<f32>,
    area: f32,
    bvh: BvhNode,
    material: Arc<dyn Material>,
}

impl TriangleMesh {
    pub fn new(
        vertices: &[Vec3],
        indices: &[u32],
        material: Arc<dyn Material>,
    ) -> MeshResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut skipped = 0usize;
        for face in indices.chunks_exact(3) {
            let mut corners = [Vec3::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(face) {
                *corner = *vertices.get(index as usize).ok_or(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })?;
            }
            let tri = Triangle::new(corners[0], corners[1], corners[2], material.clone());
            if tri.is_degenerate() {
                skipped += 1;
                continue;
            }
            triangles.push(Arc::new(tri));
        }

        if skipped > 0 {
            log::warn!("TriangleMesh: skipped {} degenerate triangles", skipped);
        }
        if triangles.is_empty() {
            return Err(MeshError::Empty);
        }

        let mut running = 0.0;
        let cumulative_area: Vec<f32> = triangles
            .iter()
            .map(|t| {
                running += t.area();
                running
            })
            .collect();

        let bvh = BvhNode::new(
            triangles
                .iter()
                .map(|t| t.clone() as Arc<dyn Object>)
                .collect(),
        );

        log::debug!(
            "TriangleMesh: {} triangles, area {:.3}, BVH depth {}",
            triangles.len(),
            running,
            bvh.depth()
        );

        Ok(Self {
            triangles,
            cumulative_area,
            area: running,
            bvh,
            material,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Object for TriangleMesh {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Intersection<'_> {
        self.bvh.intersect(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        let target = gen_f32(rng) * self.area;
        let index = self
            .cumulative_area
            .partition_point(|&running| running <= target)
            .min(self.triangles.len() - 1);

        let mut sample = self.triangles[index].sample(rng);
        sample.pdf = 1.0 / self.area;
        sample
    }
}
