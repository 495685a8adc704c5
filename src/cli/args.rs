//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Media files to probe, shared by every command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input media file path (repeatable)
    #[arg(short = 'i', long = "input", value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Arguments for the all command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output the canonical record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the video and audio commands
#[derive(Args, Debug, Clone)]
pub struct StreamArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Address streams by container ID instead of StreamOrder
    #[arg(long)]
    pub pid: bool,
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Field name as MediaInfo spells it (e.g. Format_Profile)
    pub field: String,

    /// Track type: general, video, audio, image, data or other
    pub track_type: String,
}

/// Arguments for the locate command
#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Audio channel number, counted from 1 across all audio streams
    #[arg(allow_negative_numbers = true)]
    pub channel: i64,

    /// Address streams by container ID instead of StreamOrder
    #[arg(long)]
    pub pid: bool,

    /// Print the ffmpeg options extracting the channel
    #[arg(long)]
    pub ffmpeg: bool,
}

/// Arguments for the summary command
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Report missing frame rate, resolution or frame count as empty instead of failing
    #[arg(long)]
    pub lenient: bool,
}
