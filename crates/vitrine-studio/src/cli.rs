use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Scroll-driven glass portfolio viewer", version)]
pub struct Args {
    /// Portfolio JSON file; the built-in demo page is used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Glass mode (lens, bar or cube); overrides the config file
    #[arg(long)]
    pub mode: Option<String>,

    /// Log filter in env_logger syntax, e.g. "debug" or "vitrine_scene=debug"
    #[arg(long)]
    pub log: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,
}
