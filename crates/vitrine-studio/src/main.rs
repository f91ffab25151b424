mod cli;
mod navigate;
mod studio;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use vitrine_engine::device::GpuInit;
use vitrine_engine::logging::{LoggingConfig, init_logging};
use vitrine_engine::window::{Runtime, RuntimeConfig};
use vitrine_scene::prelude::*;
use winit::dpi::LogicalSize;

use crate::cli::Args;
use crate::studio::Studio;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PortfolioConfig::default(),
    };
    if let Some(mode) = &args.mode {
        config.mode = GlassMode::parse(mode);
    }

    // Image paths in a config file are relative to that file.
    let asset_root = args
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(PathBuf::new);

    let runtime_config = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(args.width, args.height),
    };

    let studio = Studio::new(config, &asset_root, load_font());
    log::info!("starting vitrine studio");
    Runtime::run(runtime_config, GpuInit::default(), studio)
}

fn load_config(path: &Path) -> Result<PortfolioConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read portfolio config {}", path.display()))?;
    PortfolioConfig::from_json_str(&text)
        .with_context(|| format!("failed to load portfolio config {}", path.display()))
}

fn load_font() -> Vec<u8> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}
