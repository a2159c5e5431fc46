//! Render a scene file (or the built-in scene) to a PNG
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use path_tracing::render::{self, RenderMode};
use path_tracing::scene::SceneConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// YAML scene file; the built-in scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Where to write the PNG
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for a reproducible render
    #[arg(long)]
    seed: Option<u64>,

    /// Render on a single thread
    #[arg(long)]
    serial: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.scene {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            log::info!("no scene given, using the built-in scene");
            SceneConfig::default()
        }
    };
    if let Some(width) = args.width {
        config.image.width = width;
    }
    if let Some(height) = args.height {
        config.image.height = height;
    }
    if let Some(samples) = args.samples {
        config.image.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.image.max_depth = max_depth;
    }
    if args.seed.is_some() {
        config.image.seed = args.seed;
    }
    let scene = config.build().context("invalid scene")?;

    let mode = if args.serial {
        RenderMode::Serial
    } else {
        RenderMode::Parallel
    };
    let bar = ProgressBar::new(scene.settings.height as u64);
    bar.set_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} rows ({eta})")?
            .progress_chars("=> "),
    );

    let mut img = RgbImage::new(scene.settings.width, scene.settings.height);
    let seed = render::render(
        &scene.camera,
        &scene.world,
        &scene.settings,
        mode,
        &mut img,
        &bar,
    );
    log::info!("seed {seed}");

    render::save_png(&img, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
