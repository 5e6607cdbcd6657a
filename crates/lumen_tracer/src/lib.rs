//! Lumen - CPU Path Tracing
//!
//! A unidirectional Monte Carlo path tracer with next-event estimation
//! toward area lights and Russian roulette path termination.

mod accel;
mod bucket;
mod bvh;
mod camera;
mod config;
mod integrator;
mod intersection;
mod light;
mod material;
mod mesh;
mod microfacet;
mod object;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub mod scenes;

pub use accel::{Accelerator, LinearScan};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use config::{
    AcceleratorKind, ConfigError, ConfigResult, IntegratorConfig, RenderConfig, RenderSettings,
};
pub use integrator::{is_light_visible, PATH_DEPTH_LIMIT};
pub use intersection::Intersection;
pub use light::{LightSample, LightSampler};
pub use material::{Color, DiffuseLight, Lambertian, Material};
pub use mesh::{MeshError, MeshResult, TriangleMesh};
pub use microfacet::Microfacet;
pub use object::{Object, SurfaceSample};
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer};
pub use scene::{Scene, SceneBuilder, SceneError, SceneResult};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
