use anyhow::Context;
use clap::{Parser, Subcommand};
use donutspace_assets::{AssetRequest, FontAsset};
use donutspace_common::ThreadRandom;
use donutspace_kernel::{AssetStatus, FrameDriver, ManualClock, Scene, SceneConfig};
use donutspace_render::{DebugTextRenderer, RenderView, Renderer};
use donutspace_tools::SceneInspector;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_FONT: &str = "assets/fonts/demo.typeface.json";

#[derive(Parser)]
#[command(name = "donutspace-cli", about = "Headless tools for the donut scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate the scene on a stepped clock and print a summary
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Typeface font that gates scene population
        #[arg(long, default_value = DEFAULT_FONT)]
        font: PathBuf,
        /// Scene config (YAML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the debug render every N ticks
        #[arg(long)]
        every: Option<u64>,
        /// Donuts listed per debug render
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Load a typeface font and print its metrics
    Font {
        path: PathBuf,
        /// Text to measure; defaults to the configured label
        #[arg(long)]
        text: Option<String>,
        /// Text size in scene units
        #[arg(long, default_value = "0.5")]
        size: f32,
    },
    /// Print a scene config as YAML (the defaults, or a validated file)
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => {
            SceneConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(SceneConfig::default()),
    }
}

fn run(
    ticks: u64,
    fps: f64,
    font: &Path,
    config: SceneConfig,
    every: Option<u64>,
    limit: usize,
) -> anyhow::Result<()> {
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
    let dt = 1.0 / fps;

    // Resolve the font before the first tick so headless runs are comparable.
    let request = AssetRequest::ready(font, FontAsset::load(font));
    let mut driver = FrameDriver::new(Scene::new(config), ManualClock::new(), ThreadRandom::new());
    driver.load_font(request);

    let renderer = DebugTextRenderer::with_limit(limit);
    let mut view = RenderView::default();
    for _ in 0..ticks {
        driver.clock_mut().advance(dt);
        let (frame, ()) = driver.run_frame(|scene, frame| {
            view = view.follow(frame.camera);
            if every.is_some_and(|n| n > 0 && frame.tick % n == 0) {
                print!("{}", renderer.render(scene, &view));
            }
        });
        tracing::trace!("tick {} at {:.3}s", frame.tick, frame.elapsed);
    }

    match driver.asset_status() {
        AssetStatus::Failed(reason) => tracing::warn!("scene never populated: {reason}"),
        AssetStatus::Loaded => {}
        other => tracing::warn!("font still {other:?}"),
    }
    println!("{}", SceneInspector::summary(driver.scene()));
    Ok(())
}

fn print_font(path: &Path, text: Option<String>, size: f32) -> anyhow::Result<()> {
    let font = FontAsset::load(path)?;
    let text = text.unwrap_or_else(|| SceneConfig::default().text.content);
    let depth = SceneConfig::default().text.depth;
    let extent = font.measure(&text, size, depth);

    println!("family: {}", font.family_name);
    println!("resolution: {}", font.resolution);
    println!("glyphs: {}", font.glyphs.len());
    println!("line height @ {size}: {:.3}", font.line_height(size));
    println!(
        "{text:?} @ {size}: {:.3} x {:.3} x {:.3}",
        extent.width, extent.height, extent.depth
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("donutspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", donutspace_assets::crate_info());
            println!("render: {}", donutspace_render::crate_info());
            println!("tools: {}", donutspace_tools::crate_info());
            println!("{}", SceneInspector::summary(&Scene::default()));
        }
        Commands::Run {
            ticks,
            fps,
            font,
            config,
            every,
            limit,
        } => {
            let config = load_config(config.as_deref())?;
            run(ticks, fps, &font, config, every, limit)?;
        }
        Commands::Font { path, text, size } => {
            print_font(&path, text, size)?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
