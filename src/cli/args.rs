use clap::Parser;
use std::path::PathBuf;

use s2mosaic::{EngineKind, FailurePolicy};

#[derive(Parser)]
#[command(name = "s2mosaic", version, about = "Sentinel-2 correction and mosaicking batch driver")]
pub struct CliArgs {
    /// Workspace root containing input/ (pix/, corrected/ and mosaic/ are recreated)
    #[arg(short, long, default_value = ".")]
    pub workspace: PathBuf,

    /// JSON configuration with processing parameters and engine programs
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Processing engine (command or dry-run)
    #[arg(long, value_enum, default_value_t = EngineKind::Command)]
    pub engine: EngineKind,

    /// What to do when a tile fails correction (overrides the configuration)
    #[arg(long, value_enum)]
    pub on_tile_error: Option<FailurePolicy>,

    /// Probe the enhanced mosaic and exported image with GDAL after the run
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Write a JSON run report to this path after each run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip the confirmation prompt and run once
    #[arg(short, long, default_value_t = false)]
    pub yes: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
