//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    #[arg(short, long = "in")]
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds); default 0
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds); default the clip duration
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output file, or a directory to receive the timestamped download name
    #[arg(short, long = "out")]
    pub output: Option<PathBuf>,
}

/// Arguments for the thumbs command
#[derive(Args, Debug)]
pub struct ThumbsArgs {
    /// Input video file path
    #[arg(short, long = "in")]
    pub input: PathBuf,

    /// Directory receiving thumb-NN images
    #[arg(short, long)]
    pub out_dir: PathBuf,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long = "in")]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
