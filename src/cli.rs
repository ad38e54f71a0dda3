// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tech-grid")]
#[command(about = "Animated wgpu grid and particle field", long_about = None)]
pub struct Cli {
    /// JSON configuration file; every field is optional
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Disable the bloom post-process
    #[arg(long = "no-bloom", default_value = "false")]
    pub no_bloom: bool,

    /// Seed for particle placement, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of floating particles
    #[arg(long)]
    pub particles: Option<usize>,

    /// Grid cell count per side
    #[arg(long = "grid-count")]
    pub grid_count: Option<u32>,

    /// Distance between grid lines in world units
    #[arg(long)]
    pub spacing: Option<f32>,

    /// Grid and particle color as #rgb or #rrggbb
    #[arg(long)]
    pub color: Option<String>,

    /// glTF model to show as the character scene
    #[arg(long, value_name = "GLTF")]
    pub scene: Option<PathBuf>,
}
