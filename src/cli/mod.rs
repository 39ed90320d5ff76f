//! CLI module for violet
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// violet - trim a clip with a thumbnail timeline and a stream-copy cut
#[derive(Parser, Debug)]
#[command(name = "violet")]
#[command(about = "Trim video clips losslessly with ffmpeg stream copy")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: violet.toml, config/violet.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit session events as JSON lines on stdout
    #[arg(long, global = true)]
    pub json_events: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut a range out of a video file
    Trim(args::TrimArgs),
    /// Write the thumbnail strip of a video file
    Thumbs(args::ThumbsArgs),
    /// Show container metadata
    Inspect(args::InspectArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trim() {
        let cli = Cli::try_parse_from([
            "violet", "--log-level", "debug", "trim", "--in", "a.mp4", "--start", "10", "--end",
            "00:00:30",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Trim(args) => {
                assert_eq!(args.input, PathBuf::from("a.mp4"));
                assert_eq!(args.start.as_deref(), Some("10"));
                assert_eq!(args.end.as_deref(), Some("00:00:30"));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_thumbs_requires_out_dir() {
        assert!(Cli::try_parse_from(["violet", "thumbs", "--in", "a.mp4"]).is_err());
    }
}
