//! Channel locator: map a flat audio channel number to the stream holding it

use std::fmt;

use serde::Serialize;

use crate::domain::model::Addressing;
use crate::error::{ProbeError, ProbeResult};
use crate::probe::index::{AudioStream, TrackIndex};

/// Where a logical channel lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelLocation {
    /// Address of the owning stream
    pub address: u32,
    /// Channel count of the owning stream
    pub stream_channels: u32,
    /// 0-based channel position inside the owning stream
    pub offset: u32,
}

/// Side of a stereo pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StereoSide {
    Left,
    Right,
}

impl StereoSide {
    /// Channel name understood by `channelsplit`
    pub fn layout(&self) -> &'static str {
        match self {
            StereoSide::Left => "FL",
            StereoSide::Right => "FR",
        }
    }

    /// Output pin label
    pub fn pin(&self) -> &'static str {
        match self {
            StereoSide::Left => "left",
            StereoSide::Right => "right",
        }
    }
}

/// FFmpeg options that pull a single channel out of input 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExtractDirective {
    /// Mono stream: map it whole
    Map { stream: u32 },
    /// Stereo stream: split and keep one side
    StereoSplit { stream: u32, side: StereoSide },
    /// Multichannel stream: map one channel by offset
    MapChannel { stream: u32, offset: u32 },
}

impl ExtractDirective {
    /// Pick the directive shape from the owning stream's channel count
    pub fn for_location(location: &ChannelLocation) -> ProbeResult<Self> {
        let stream = location.address;
        match location.stream_channels {
            0 => Err(ProbeError::IntegrityError {
                message: format!(
                    "audio stream {} resolved for extraction reports no channels",
                    stream
                ),
            }),
            1 => Ok(ExtractDirective::Map { stream }),
            2 => Ok(ExtractDirective::StereoSplit {
                stream,
                side: if location.offset == 0 {
                    StereoSide::Left
                } else {
                    StereoSide::Right
                },
            }),
            _ => Ok(ExtractDirective::MapChannel {
                stream,
                offset: location.offset,
            }),
        }
    }

    /// Directive as discrete arguments, for spawning without a shell
    pub fn to_args(&self) -> Vec<String> {
        match self {
            ExtractDirective::Map { stream } => vec!["-map".to_string(), format!("0:{}", stream)],
            ExtractDirective::StereoSplit { stream, side } => vec![
                "-filter_complex".to_string(),
                split_graph(*stream, *side),
                "-map".to_string(),
                format!("[{}]", side.pin()),
            ],
            ExtractDirective::MapChannel { stream, offset } => {
                vec!["-map_channel".to_string(), format!("0.{}.{}", stream, offset)]
            }
        }
    }
}

fn split_graph(stream: u32, side: StereoSide) -> String {
    format!(
        "[0:{}]channelsplit=channel_layout=stereo:channels={}[{}]",
        stream,
        side.layout(),
        side.pin()
    )
}

impl fmt::Display for ExtractDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractDirective::Map { stream } => write!(f, "-map 0:{}", stream),
            ExtractDirective::StereoSplit { stream, side } => write!(
                f,
                "-filter_complex \"{}\" -map \"[{}]\"",
                split_graph(*stream, *side),
                side.pin()
            ),
            ExtractDirective::MapChannel { stream, offset } => {
                write!(f, "-map_channel 0.{}.{}", stream, offset)
            }
        }
    }
}

/// Resolves logical channel numbers against a channel map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLocator {
    streams: Vec<AudioStream>,
    total: u64,
}

impl ChannelLocator {
    /// Build over a channel map, walked in the order given
    pub fn new(streams: Vec<AudioStream>) -> Self {
        let total = streams.iter().map(|s| u64::from(s.channels)).sum();
        Self { streams, total }
    }

    /// Build from an index's channel map
    pub fn from_index(index: &TrackIndex<'_>, addressing: Addressing) -> ProbeResult<Self> {
        Ok(Self::new(index.audio_streams(addressing)?))
    }

    pub fn streams(&self) -> &[AudioStream] {
        &self.streams
    }

    pub fn total_channels(&self) -> u64 {
        self.total
    }

    /// Find the stream holding 1-based channel `channel`.
    ///
    /// Valid for `1..=total_channels()`. Zero or negative is an invalid
    /// argument; anything past the total is out of range. A stream with no
    /// channels is an integrity error, never skipped.
    pub fn locate(&self, channel: i64) -> ProbeResult<ChannelLocation> {
        if channel <= 0 {
            return Err(ProbeError::invalid_argument(format!(
                "channel number must be 1 or greater, got {}",
                channel
            )));
        }
        let wanted = channel.unsigned_abs();
        if wanted > self.total {
            return Err(ProbeError::OutOfRange {
                channel,
                total: self.total,
            });
        }

        let mut preceding: u64 = 0;
        for stream in &self.streams {
            if stream.channels == 0 {
                return Err(ProbeError::IntegrityError {
                    message: format!("audio stream {} reports no channels", stream.address),
                });
            }
            let running = preceding + u64::from(stream.channels);
            if running >= wanted {
                // Bounded by stream.channels
                let offset = u32::try_from(wanted - preceding - 1).map_err(|_| {
                    ProbeError::IntegrityError {
                        message: format!(
                            "channel {} offset overflows in stream {}",
                            channel, stream.address
                        ),
                    }
                })?;
                return Ok(ChannelLocation {
                    address: stream.address,
                    stream_channels: stream.channels,
                    offset,
                });
            }
            preceding = running;
        }

        Err(ProbeError::IntegrityError {
            message: format!(
                "channel {} not found in {} stream(s) totalling {} channel(s)",
                channel,
                self.streams.len(),
                self.total
            ),
        })
    }

    /// Address of the stream holding `channel`
    pub fn stream_for(&self, channel: i64) -> ProbeResult<u32> {
        Ok(self.locate(channel)?.address)
    }

    /// Extraction directive for `channel`
    pub fn directive(&self, channel: i64) -> ProbeResult<ExtractDirective> {
        ExtractDirective::for_location(&self.locate(channel)?)
    }
}
