//! CLI module for MediaProbe
//!
//! This module handles command-line argument parsing and command execution.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::LogFormat;
use crate::config_initialization::{initialize_configuration, ConfigOverrides};
use crate::probe::SequencePolicy;

pub mod args;
pub mod commands;

pub use args::{InputArgs, ListArgs, LocateArgs, SearchArgs, StreamArgs, SummaryArgs};
pub use commands::Session;

/// MediaProbe
///
/// Answers questions about media files from MediaInfo's JSON report: frame
/// rate, resolution, stream order and which audio stream holds a channel.
#[derive(Parser, Debug)]
#[command(name = "mediaprobe")]
#[command(about = "MediaProbe - Typed queries over MediaInfo reports")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format: pretty or json
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Configuration file (default: ./mediaprobe.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// MediaInfo executable
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub mediainfo: Option<PathBuf>,

    /// Seconds to wait for MediaInfo before giving up
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Stream type sequence policy: image-short-circuit or all-tracks
    #[arg(long, global = true, value_name = "POLICY")]
    pub sequence_policy: Option<SequencePolicy>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            program: self.mediainfo.clone(),
            timeout_secs: self.timeout,
            sequence_policy: self.sequence_policy,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print every field of every track
    All(ListArgs),
    /// Print MediaInfo's output unchanged
    Raw(InputArgs),
    /// Print the frame rate
    Fps(InputArgs),
    /// Print the frame count
    Frames(InputArgs),
    /// Print the duration
    Duration(InputArgs),
    /// Print the timecode of the first frame
    Timecode(InputArgs),
    /// Print the color space
    Colorspace(InputArgs),
    /// Print the resolution as WIDTHxHEIGHT
    Resolution(InputArgs),
    /// Print the stream types in stream order
    Streams(InputArgs),
    /// Print the video stream count and addresses
    Video(StreamArgs),
    /// Print the audio channel total and channel map
    Audio(StreamArgs),
    /// Print a field from the first track of a type
    Search(SearchArgs),
    /// Find the audio stream holding a channel
    Locate(LocateArgs),
    /// Print the commonly used attributes together
    Summary(SummaryArgs),
}

/// Resolve configuration and run the selected command, writing results to `out`
pub async fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = initialize_configuration(&cli.overrides())?;
    info!(program = %config.program.display(), "Using MediaInfo");

    let session = Session::from_config(config);
    commands::execute(&session, cli.command, out).await
}
