//! Simple path tracer example.
//!
//! Renders three spheres on a ground sphere under a spherical light and
//! saves to PPM format.

use lumen_tracer::{
    color_to_rgba, render, Camera, Color, DiffuseLight, ImageBuffer, IntegratorConfig, Lambertian,
    Microfacet, RenderConfig, SceneBuilder, Sphere, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut builder = SceneBuilder::new(IntegratorConfig::default());
    builder
        // Ground
        .add(Arc::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )))
        .add(Arc::new(Sphere::new(
            Vec3::new(-2.2, 1.0, 0.0),
            1.0,
            Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
        )))
        .add(Arc::new(Sphere::new(
            Vec3::new(0.0, 1.0, 0.0),
            1.0,
            Arc::new(Microfacet::plastic(Color::new(0.1, 0.2, 0.5), 0.15)),
        )))
        .add(Arc::new(Sphere::new(
            Vec3::new(2.2, 1.0, 0.0),
            1.0,
            Arc::new(Microfacet::metal(Color::new(0.7, 0.6, 0.5), 0.3)),
        )))
        // Light
        .add(Arc::new(Sphere::new(
            Vec3::new(0.0, 6.0, 2.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::splat(12.0))),
        )));
    let scene = builder.build_acceleration_structure()?;

    let mut camera = Camera::new()
        .with_resolution(400, 225)
        .with_position(Vec3::new(0.0, 2.5, 9.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_fov(30.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 32,
        ..RenderConfig::default()
    };
    let image = render(&camera, &scene, &config);

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(filename)?);
    writeln!(out, "P3\n{} {}\n255", image.width, image.height)?;
    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b, _] = color_to_rgba(image.get(x, y));
            writeln!(out, "{} {} {}", r, g, b)?;
        }
    }
    Ok(())
}
