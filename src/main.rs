//! violet - trim a video clip with a stream-copy cut
//!
//! # Usage
//!
//! ```bash
//! violet trim --in video.mp4 --start 00:00:10 --end 00:00:30 --out clips/
//! violet thumbs --in video.mp4 --out-dir thumbs/
//! violet inspect --in video.mp4 --json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use violet_trim::app::container::DefaultAppContainer;
use violet_trim::cli::{commands, Cli, Commands};
use violet_trim::config_initialization::initialize_configuration;
use violet_trim::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration(&cli)?;
    init_logging(config.log_level(), config.logging.json)?;
    info!("Starting violet {}", env!("CARGO_PKG_VERSION"));

    let container = DefaultAppContainer::new(config)?;

    match cli.command {
        Commands::Trim(args) => commands::trim(&container, args, cli.json_events).await?,
        Commands::Thumbs(args) => commands::thumbs(&container, args, cli.json_events).await?,
        Commands::Inspect(args) => commands::inspect(&container, args).await?,
    }

    Ok(())
}
