use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_tracer::{render, scenes, Camera, IntegratorConfig, RenderSettings, SceneBuilder};
use std::path::PathBuf;
use std::time::Instant;

/// Built-in scenes the binary can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneName {
    /// Cornell box with the short and tall blocks
    Cornell,
    /// Cornell box with a metal and a plastic sphere
    Spheres,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments; anything given here overrides the settings file.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Monte Carlo path tracer")]
struct Args {
    /// Output PNG path
    output: PathBuf,

    /// JSON render settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "cornell")]
    scene: SceneName,

    /// Samples per pixel
    #[arg(long, short = 's')]
    spp: Option<u32>,

    /// Base seed for the per-bucket generators
    #[arg(long)]
    seed: Option<u64>,

    /// Hard recursion ceiling (path vertices)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.config {
        Some(path) => RenderSettings::from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };

    if let Some(spp) = args.spp {
        settings.render.samples_per_pixel = spp;
    }
    if let Some(seed) = args.seed {
        settings.render.seed = seed;
    }
    if let Some(depth) = args.max_depth {
        settings.integrator.max_depth = Some(depth);
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }

    settings.validate()?;
    Ok(settings)
}

fn build_scene(name: SceneName, config: IntegratorConfig) -> Result<(SceneBuilder, Camera)> {
    match name {
        SceneName::Cornell => Ok(scenes::cornell_box(config)?),
        SceneName::Spheres => Ok(scenes::cornell_spheres(config)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.clone().into())
        .init();

    let settings = load_settings(&args)?;

    let (builder, camera) = build_scene(args.scene, settings.integrator)?;
    let mut camera = camera.with_resolution(settings.width, settings.height);
    camera.initialize();

    let start = Instant::now();
    let scene = builder.build_acceleration_structure()?;
    log::info!(
        "Scene {:?} ready in {:.2?} ({} objects)",
        args.scene,
        start.elapsed(),
        scene.objects().len()
    );

    let image = render(&camera, &scene, &settings.render);
    log::info!("Mean radiance: {:?}", image.average());

    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("image buffer does not match its dimensions")?;
    rgba.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("Saved to {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("lumen").chain(list.iter().copied()))
    }

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_overrides_layer_over_defaults() {
        let args = parse(&["out.png", "--spp", "64", "--seed", "7", "--width", "128"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.scene, SceneName::Cornell);
        assert_eq!(args.height, None);

        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.render.samples_per_pixel, 64);
        assert_eq!(settings.render.seed, 7);
        assert_eq!(settings.width, 128);
        assert_eq!(settings.height, 512);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["out.png", "--spp"]).is_err());
        assert!(parse(&["out.png", "--spp", "many"]).is_err());
        assert!(parse(&["out.png", "--bogus", "1"]).is_err());
        assert!(parse(&["a.png", "b.png"]).is_err());
        assert!(parse(&["out.png", "--scene", "teapot"]).is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let zero_spp = parse(&["out.png", "--spp", "0"]).unwrap();
        assert!(load_settings(&zero_spp).is_err());

        let zero_depth = parse(&["out.png", "--max-depth", "0"]).unwrap();
        assert!(load_settings(&zero_depth).is_err());
    }

    #[test]
    fn test_scene_choice() {
        let args = parse(&["out.png", "--scene", "spheres"]).unwrap();
        let (builder, _) = build_scene(args.scene, IntegratorConfig::default()).unwrap();
        assert!(!builder.is_empty());
    }
}
