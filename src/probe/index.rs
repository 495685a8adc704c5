//! Track index: typed queries over a canonical [`MediaRecord`]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::coerce::{self, OrderKey};
use crate::domain::model::{
    Addressing, MediaRecord, Track, TrackType, HEIGHT_FIELD, STREAM_ORDER_FIELD,
    TYPE_ORDER_FIELD, WIDTH_FIELD,
};
use crate::error::{ProbeError, ProbeResult};

/// One entry of the audio channel map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioStream {
    /// `StreamOrder` or `ID`, depending on the addressing used
    pub address: u32,
    pub channels: u32,
}

/// Frame dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution<T> {
    pub width: T,
    pub height: T,
}

impl<T: fmt::Display> fmt::Display for Resolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How the stream type sequence treats files holding an `Image` track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequencePolicy {
    /// Any `Image` track turns the whole sequence into `["Image"]`
    #[default]
    ImageShortCircuit,
    /// Every non-`General` track is listed, images included
    AllTracks,
}

impl SequencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequencePolicy::ImageShortCircuit => "image-short-circuit",
            SequencePolicy::AllTracks => "all-tracks",
        }
    }
}

impl fmt::Display for SequencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SequencePolicy {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image-short-circuit" => Ok(SequencePolicy::ImageShortCircuit),
            "all-tracks" => Ok(SequencePolicy::AllTracks),
            _ => Err(ProbeError::invalid_argument(format!(
                "Invalid sequence policy: {}. Valid policies: image-short-circuit, all-tracks",
                s
            ))),
        }
    }
}

/// Read-only query view over one record.
///
/// Every query recomputes from the record; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct TrackIndex<'a> {
    record: &'a MediaRecord,
    policy: SequencePolicy,
}

impl<'a> TrackIndex<'a> {
    pub fn new(record: &'a MediaRecord) -> Self {
        Self {
            record,
            policy: SequencePolicy::default(),
        }
    }

    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn record(&self) -> &'a MediaRecord {
        self.record
    }

    /// Number of video tracks
    pub fn video_count(&self) -> usize {
        self.record.tracks_of(TrackType::Video).count()
    }

    /// Addresses of every video track, ascending
    pub fn video_streams(&self, addressing: Addressing) -> ProbeResult<Vec<u32>> {
        let mut addresses = self
            .record
            .tracks_of(TrackType::Video)
            .map(|track| address_of(track, addressing))
            .collect::<ProbeResult<Vec<u32>>>()?;
        addresses.sort();
        Ok(addresses)
    }

    /// Total audio channel count across all audio tracks
    pub fn audio_count(&self) -> ProbeResult<u32> {
        self.record
            .tracks_of(TrackType::Audio)
            .try_fold(0u32, |total, track| {
                let channels = channels_of(track)?;
                total.checked_add(channels).ok_or_else(|| ProbeError::IntegrityError {
                    message: format!(
                        "audio channel total overflows adding {} channel(s) to {}",
                        channels, total
                    ),
                })
            })
    }

    /// Channel map: one `(address, channels)` entry per audio track, ascending by address
    pub fn audio_streams(&self, addressing: Addressing) -> ProbeResult<Vec<AudioStream>> {
        let mut streams = self
            .record
            .tracks_of(TrackType::Audio)
            .map(|track| {
                Ok(AudioStream {
                    address: address_of(track, addressing)?,
                    channels: channels_of(track)?,
                })
            })
            .collect::<ProbeResult<Vec<AudioStream>>>()?;
        streams.sort_by_key(|s| s.address);
        Ok(streams)
    }

    /// `FrameRate` of the first video track.
    ///
    /// Only video tracks are consulted; still images carry no rate.
    pub fn frame_rate(&self) -> Option<String> {
        self.record.first_of(TrackType::Video)?.frame_rate()
    }

    /// Total frame count from the General track
    pub fn frame_count(&self) -> Option<String> {
        self.record.general()?.frame_count()
    }

    /// Duration in seconds from the General track
    pub fn duration(&self) -> Option<String> {
        self.record.general()?.duration()
    }

    /// `TimeCode_FirstFrame` of the first `Other` track
    pub fn start_timecode(&self) -> Option<String> {
        self.record.first_of(TrackType::Other)?.timecode_first_frame()
    }

    /// First `ColorSpace` found on a video track, else on an image track
    pub fn color_space(&self) -> Option<String> {
        self.record
            .tracks_of(TrackType::Video)
            .find_map(Track::color_space)
            .or_else(|| {
                self.record
                    .tracks_of(TrackType::Image)
                    .find_map(Track::color_space)
            })
    }

    /// Width and height as reported.
    ///
    /// The last video track wins. If it lacks either dimension the last image
    /// track is tried instead.
    pub fn resolution(&self) -> Option<Resolution<String>> {
        let dimensions = |track: &Track| {
            Some(Resolution {
                width: track.width()?,
                height: track.height()?,
            })
        };

        self.record
            .tracks_of(TrackType::Video)
            .last()
            .and_then(dimensions)
            .or_else(|| {
                self.record
                    .tracks_of(TrackType::Image)
                    .last()
                    .and_then(dimensions)
            })
    }

    /// Same as [`TrackIndex::resolution`], coerced to pixels
    pub fn resolution_px(&self) -> ProbeResult<Option<Resolution<u32>>> {
        self.resolution()
            .map(|r| {
                Ok(Resolution {
                    width: coerce::pixel_dimension(WIDTH_FIELD, &r.width)?,
                    height: coerce::pixel_dimension(HEIGHT_FIELD, &r.height)?,
                })
            })
            .transpose()
    }

    /// Type labels of every non-`General` track in presentation order,
    /// using the index's sequence policy
    pub fn stream_types(&self) -> ProbeResult<Vec<String>> {
        self.stream_types_with(self.policy)
    }

    /// Type labels of every non-`General` track in presentation order.
    ///
    /// Tracks sort by `StreamOrder`, falling back to `@typeorder`. Equal keys
    /// keep report order. A track with neither key is an error.
    pub fn stream_types_with(&self, policy: SequencePolicy) -> ProbeResult<Vec<String>> {
        let streams: Vec<&Track> = self
            .record
            .tracks
            .iter()
            .filter(|t| !t.is(TrackType::General))
            .collect();

        if policy == SequencePolicy::ImageShortCircuit
            && streams.iter().any(|t| t.is(TrackType::Image))
        {
            debug!(path = %self.record.path, "Image track present, reporting a single Image stream");
            return Ok(vec![TrackType::Image.as_str().to_string()]);
        }

        let mut keyed = streams
            .into_iter()
            .map(|track| Ok((order_key_of(track)?, track.label().to_string())))
            .collect::<ProbeResult<Vec<(OrderKey, String)>>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(keyed.into_iter().map(|(_, label)| label).collect())
    }

    /// Named field from the first track of the given type
    pub fn search(&self, field: &str, track_type: TrackType) -> Option<String> {
        self.record.first_of(track_type)?.field(field)
    }

    /// [`TrackIndex::search`] with the track type given as free text
    pub fn search_str(&self, field: &str, track_type: &str) -> ProbeResult<Option<String>> {
        let track_type: TrackType = track_type.parse()?;
        Ok(self.search(field, track_type))
    }
}

fn address_of(track: &Track, addressing: Addressing) -> ProbeResult<u32> {
    let field = addressing.field_name();
    let text = match addressing {
        Addressing::StreamOrder => track.stream_order(),
        Addressing::Pid => track.id(),
    }
    .ok_or_else(|| ProbeError::MissingOrderKey {
        track: track.label().to_string(),
        field: field.to_string(),
    })?;

    coerce::stream_address(field, &text)
}

fn channels_of(track: &Track) -> ProbeResult<u32> {
    let text = track.channels().ok_or_else(|| ProbeError::MissingField {
        track: track.label().to_string(),
        field: crate::domain::model::CHANNELS_FIELD.to_string(),
    })?;
    let channels = coerce::channel_count(&text)?;
    if channels == 0 {
        return Err(ProbeError::IntegrityError {
            message: format!("{} track reports {} channels", track.label(), text),
        });
    }
    Ok(channels)
}

fn order_key_of(track: &Track) -> ProbeResult<OrderKey> {
    if let Some(order) = track.stream_order() {
        return coerce::order_key(STREAM_ORDER_FIELD, &order);
    }
    if let Some(order) = track.type_order() {
        return coerce::order_key(TYPE_ORDER_FIELD, &order);
    }
    Err(ProbeError::MissingOrderKey {
        track: track.label().to_string(),
        field: format!("{} or {}", STREAM_ORDER_FIELD, TYPE_ORDER_FIELD),
    })
}
