//! Built-in demo scenes.
//!
//! Geometry and colors follow the classic Cornell box measurements
//! (millimetres, y up, camera looking down +z).

use crate::material::{Color, Lambertian, Material};
use crate::mesh::{MeshResult, TriangleMesh};
use crate::microfacet::Microfacet;
use crate::object::Object;
use crate::scene::SceneBuilder;
use crate::triangle::Triangle;
use crate::{Camera, IntegratorConfig, Sphere};
use lumen_math::Vec3;
use std::sync::Arc;

/// Two triangles spanning `corners` (in order around the quad), wound so
/// the face normal points toward `toward`.
pub fn quad(corners: [Vec3; 4], toward: Vec3, material: Arc<dyn Material>) -> Vec<Arc<dyn Object>> {
    let [a, b, c, d] = corners;
    let center = (a + b + c + d) / 4.0;
    let flip = (b - a).cross(c - a).dot(toward - center) < 0.0;

    let faces = if flip {
        [(a, c, b), (a, d, c)]
    } else {
        [(a, b, c), (a, c, d)]
    };
    faces
        .into_iter()
        .map(|(v0, v1, v2)| Arc::new(Triangle::new(v0, v1, v2, material.clone())) as Arc<dyn Object>)
        .collect()
}

/// Closed-top block standing on y = 0 with outward-facing normals.
pub fn block(footprint: [Vec3; 4], height: f32, material: Arc<dyn Material>) -> MeshResult<TriangleMesh> {
    let up = Vec3::new(0.0, height, 0.0);
    let mut vertices: Vec<Vec3> = footprint.iter().map(|p| Vec3::new(p.x, 0.0, p.z)).collect();
    vertices.extend(footprint.iter().map(|p| Vec3::new(p.x, 0.0, p.z) + up));
    let centroid = vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32;

    // Top, then the four sides
    let mut faces: Vec<[u32; 3]> = vec![[4, 5, 6], [4, 6, 7]];
    for i in 0..4u32 {
        let j = (i + 1) % 4;
        faces.push([i, j, j + 4]);
        faces.push([i, j + 4, i + 4]);
    }

    let mut indices = Vec::with_capacity(faces.len() * 3);
    for [i0, i1, i2] in faces {
        let (v0, v1, v2) = (vertices[i0 as usize], vertices[i1 as usize], vertices[i2 as usize]);
        let outward = (v0 + v1 + v2) / 3.0 - centroid;
        if (v1 - v0).cross(v2 - v0).dot(outward) < 0.0 {
            indices.extend([i0, i2, i1]);
        } else {
            indices.extend([i0, i1, i2]);
        }
    }

    TriangleMesh::new(&vertices, &indices, material)
}

fn cornell_shell(builder: &mut SceneBuilder) {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.63, 0.065, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.14, 0.45, 0.091)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.725, 0.71, 0.68)));
    let emission = 8.0 * Color::new(0.747 + 0.058, 0.747 + 0.258, 0.747)
        + 15.6 * Color::new(0.740 + 0.287, 0.740 + 0.160, 0.740)
        + 18.4 * Color::new(0.737 + 0.642, 0.737 + 0.159, 0.737);
    let light: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.65)).with_emission(emission));

    let inside = Vec3::new(278.0, 274.0, 279.0);
    let v = Vec3::new;
    let walls = [
        // floor
        ([v(552.8, 0.0, 0.0), v(0.0, 0.0, 0.0), v(0.0, 0.0, 559.2), v(549.6, 0.0, 559.2)], white.clone()),
        // ceiling
        ([v(556.0, 548.8, 0.0), v(556.0, 548.8, 559.2), v(0.0, 548.8, 559.2), v(0.0, 548.8, 0.0)], white.clone()),
        // back
        ([v(549.6, 0.0, 559.2), v(0.0, 0.0, 559.2), v(0.0, 548.8, 559.2), v(556.0, 548.8, 559.2)], white),
        // right (green)
        ([v(0.0, 0.0, 559.2), v(0.0, 0.0, 0.0), v(0.0, 548.8, 0.0), v(0.0, 548.8, 559.2)], green),
        // left (red)
        ([v(552.8, 0.0, 0.0), v(549.6, 0.0, 559.2), v(556.0, 548.8, 559.2), v(556.0, 548.8, 0.0)], red),
    ];
    for (corners, material) in walls {
        for tri in quad(corners, inside, material) {
            builder.add(tri);
        }
    }

    let lamp = [v(343.0, 548.7, 227.0), v(343.0, 548.7, 332.0), v(213.0, 548.7, 332.0), v(213.0, 548.7, 227.0)];
    for tri in quad(lamp, v(278.0, 0.0, 278.0), light) {
        builder.add(tri);
    }
}

fn cornell_camera() -> Camera {
    let mut camera = Camera::new()
        .with_resolution(512, 512)
        .with_position(Vec3::new(278.0, 273.0, -800.0), Vec3::new(278.0, 273.0, 0.0), Vec3::Y)
        .with_fov(40.0);
    camera.initialize();
    camera
}

/// The classic Cornell box with its short and tall blocks.
pub fn cornell_box(config: IntegratorConfig) -> MeshResult<(SceneBuilder, Camera)> {
    let mut builder = SceneBuilder::new(config);
    cornell_shell(&mut builder);

    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.725, 0.71, 0.68)));
    let v = Vec3::new;
    let short_block = block(
        [v(130.0, 0.0, 65.0), v(82.0, 0.0, 225.0), v(240.0, 0.0, 272.0), v(290.0, 0.0, 114.0)],
        165.0,
        white.clone(),
    )?;
    let tall_block = block(
        [v(423.0, 0.0, 247.0), v(265.0, 0.0, 296.0), v(314.0, 0.0, 456.0), v(472.0, 0.0, 406.0)],
        330.0,
        white,
    )?;
    builder.add(Arc::new(short_block)).add(Arc::new(tall_block));

    Ok((builder, cornell_camera()))
}

/// Cornell box with a rough metal sphere and a glossy plastic sphere.
pub fn cornell_spheres(config: IntegratorConfig) -> (SceneBuilder, Camera) {
    let mut builder = SceneBuilder::new(config);
    cornell_shell(&mut builder);

    let metal = Arc::new(Microfacet::metal(Color::new(0.95, 0.64, 0.54), 0.35));
    let plastic = Arc::new(Microfacet::plastic(Color::new(0.2, 0.3, 0.7), 0.2));
    builder
        .add(Arc::new(Sphere::new(Vec3::new(150.0, 100.0, 200.0), 100.0, metal)))
        .add(Arc::new(Sphere::new(Vec3::new(400.0, 90.0, 350.0), 90.0, plastic)));

    (builder, cornell_camera())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Ray;

    #[test]
    fn test_quad_faces_target() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let corners = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z];

        for tri in quad(corners, Vec3::new(0.5, -3.0, 0.5), material.clone()) {
            let s = tri.sample(&mut rand::thread_rng());
            assert!((s.normal - -Vec3::Y).length() < 1e-6);
        }
        for tri in quad(corners, Vec3::new(0.5, 3.0, 0.5), material) {
            let s = tri.sample(&mut rand::thread_rng());
            assert!((s.normal - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_block_normals_point_outward() {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let mesh = block(
            [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z],
            2.0,
            material,
        )
        .unwrap();
        assert_eq!(mesh.triangle_count(), 10);
        assert!((mesh.area() - (1.0 + 4.0 * 2.0)).abs() < 1e-5);

        let from_above = Ray::new(Vec3::new(0.3, 5.0, 0.6), -Vec3::Y);
        let hit = mesh.intersect(&from_above, lumen_math::Interval::forward(1e-4));
        assert!((hit.normal - Vec3::Y).length() < 1e-5);

        let from_side = Ray::new(Vec3::new(-3.0, 0.7, 0.4), Vec3::X);
        let hit = mesh.intersect(&from_side, lumen_math::Interval::forward(1e-4));
        assert!((hit.normal - -Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_cornell_box_builds_with_one_light() {
        let (builder, camera) = cornell_box(IntegratorConfig::default()).unwrap();
        // 5 walls and the lamp as triangle pairs, plus two blocks
        assert_eq!(builder.len(), 14);

        let scene = builder.build_acceleration_structure().unwrap();
        assert_eq!(scene.light_sampler().emitter_count(), 2);
        assert!((scene.light_sampler().total_area() - 130.0 * 105.0).abs() < 1.0);
        assert_eq!(camera.image_width, 512);
    }

    #[test]
    fn test_lamp_faces_the_floor() {
        let (builder, _) = cornell_box(IntegratorConfig::default()).unwrap();
        let scene = builder.build_acceleration_structure().unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let s = scene.sample_light(&mut rng).unwrap();
            assert!(s.normal.y < -0.99);
        }
    }

    #[test]
    fn test_cornell_spheres_builds() {
        let (builder, _) = cornell_spheres(IntegratorConfig::default());
        assert_eq!(builder.len(), 14);
        assert!(builder.build_acceleration_structure().is_ok());
    }
}
