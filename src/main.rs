use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use tech_grid::app::App;
use tech_grid::cli::Cli;
use tech_grid::config::FieldConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = FieldConfig::from_cli(&cli).context("Invalid configuration")?;

    log::info!("Tech Grid");
    log::info!("  Move the pointer to tilt the grid");
    log::info!("  B toggles bloom, Escape quits");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
