use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use waypath::{
    config::ViewerConfig,
    gfx::scene::{Scene, SceneLoader},
    WaypathApp,
};

/// Textured scene viewer with spline-animated objects
#[derive(Debug, Parser)]
#[command(name = "waypath", version)]
struct Cli {
    /// Scene description (JSON)
    #[arg(default_value = "assets/scene.json")]
    scene: PathBuf,

    /// Directory mesh and material paths are relative to
    /// [default: the scene file's directory]
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Viewer settings (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels, overriding the config file
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels, overriding the config file
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }

    let asset_dir = cli.assets.clone().unwrap_or_else(|| {
        cli.scene
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    });
    log::info!(
        "Loading scene {} (assets in {})",
        cli.scene.display(),
        asset_dir.display()
    );

    let mut scene = Scene::default();
    SceneLoader::new(asset_dir)
        .with_default_speed(config.animation.path_speed)
        .load_or_empty(&cli.scene, &mut scene);

    WaypathApp::new(config, scene)?.run()
}
