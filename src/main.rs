//! EditX clip editor
//!
//! Trims a clip and applies blur, colour adjustments, rotation and reverse
//! playback through a single FFmpeg run.
//!
//! # Usage
//!
//! ```bash
//! editx apply --input clip.mp4 --start 1 --end 4 --blur 5 --rotate 90
//! editx compile --duration 10 --grayscale
//! editx probe --input clip.mp4
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use editx_cli::adapters::{TomlConfigAdapter, TracingLogAdapter};
use editx_cli::app::DefaultAppContainer;
use editx_cli::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TomlConfigAdapter::load_hierarchy(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    TracingLogAdapter::init(&config.logging);
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Apply(args) => {
            info!("Executing apply command");
            let container = DefaultAppContainer::new(&config);
            commands::apply(&container, &config, args).await?;
        }
        Commands::Compile(args) => {
            info!("Executing compile command");
            commands::compile(args)?;
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            let container = DefaultAppContainer::new(&config);
            commands::probe(&container, args).await?;
        }
    }

    Ok(())
}
