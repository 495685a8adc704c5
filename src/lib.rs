//! MediaProbe Library
//!
//! Loads MediaInfo's JSON report for a media file into a canonical record and
//! answers typed questions about it: frame rate, resolution, stream order,
//! audio channel map and which audio stream holds a given channel.
//!
//! ```no_run
//! # async fn demo() -> mediaprobe::ProbeResult<()> {
//! use mediaprobe::{ChannelLocator, ProbeConfig, ReportLoader, TrackIndex};
//! use mediaprobe::domain::model::Addressing;
//!
//! let loader = ReportLoader::from_config(ProbeConfig::default());
//! let record = loader.load("clip.mov").await?;
//! let index = TrackIndex::new(&record);
//! let locator = ChannelLocator::from_index(&index, Addressing::StreamOrder)?;
//! println!("channel 7 is in stream {}", locator.stream_for(7)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod probe;

// Re-export commonly used types
pub use config_initialization::{initialize_configuration, ConfigOverrides, ProbeConfig};
pub use domain::model::{Addressing, MediaRecord, Track, TrackType};
pub use error::{ProbeError, ProbeResult};
pub use ports::ProbeRunner;
pub use probe::{
    AudioStream, ChannelLocation, ChannelLocator, ExtractDirective, MediaAttributes, ReportLoader,
    Resolution, SequencePolicy, StereoSide, TrackIndex,
};
