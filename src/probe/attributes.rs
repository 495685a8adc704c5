//! Commonly used attributes gathered in one pass

use serde::Serialize;

use crate::domain::coerce;
use crate::domain::model::Addressing;
use crate::error::{ProbeError, ProbeResult};
use crate::probe::index::{AudioStream, Resolution, TrackIndex};
use crate::probe::locator::{ChannelLocator, ExtractDirective};

/// Snapshot of the attributes transcoding jobs ask for most
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaAttributes {
    pub path: String,
    pub stream_count: usize,
    pub stream_types: Vec<String>,
    pub video_count: usize,
    pub video_streams: Vec<u32>,
    pub audio_count: u32,
    pub audio_streams: Vec<AudioStream>,
    pub fps: Option<f64>,
    pub resolution: Option<Resolution<u32>>,
    pub frame_count: Option<u64>,
    pub start_timecode: Option<String>,
}

impl MediaAttributes {
    /// Collect every attribute, leaving unavailable ones empty
    pub fn collect(index: &TrackIndex<'_>) -> ProbeResult<Self> {
        let stream_types = index.stream_types()?;
        let fps = index
            .frame_rate()
            .map(|fps| coerce::frame_rate(&fps))
            .transpose()?;
        let frame_count = index
            .frame_count()
            .map(|frames| coerce::frame_count(&frames))
            .transpose()?;

        Ok(Self {
            path: index.record().path.clone(),
            stream_count: stream_types.len(),
            stream_types,
            video_count: index.video_count(),
            video_streams: index.video_streams(Addressing::StreamOrder)?,
            audio_count: index.audio_count()?,
            audio_streams: index.audio_streams(Addressing::StreamOrder)?,
            fps,
            resolution: index.resolution_px()?,
            frame_count,
            start_timecode: index.start_timecode(),
        })
    }

    /// Collect every attribute, failing if frame rate, resolution or frame count is missing
    pub fn collect_strict(index: &TrackIndex<'_>) -> ProbeResult<Self> {
        let attributes = Self::collect(index)?;
        attributes.require_complete()?;
        Ok(attributes)
    }

    /// Fail naming each of frame rate, resolution and frame count that is absent
    pub fn require_complete(&self) -> ProbeResult<()> {
        let mut missing = Vec::new();
        if self.fps.is_none() {
            missing.push("framerate".to_string());
        }
        if self.resolution.is_none() {
            missing.push("resolution".to_string());
        }
        if self.frame_count.is_none() {
            missing.push("framecount".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProbeError::IncompleteAttributes {
                path: self.path.clone(),
                missing,
            })
        }
    }

    pub fn locator(&self) -> ChannelLocator {
        ChannelLocator::new(self.audio_streams.clone())
    }

    /// Stream order of the stream holding audio channel `channel`
    pub fn find_audio_stream(&self, channel: i64) -> ProbeResult<u32> {
        self.locator().stream_for(channel)
    }

    /// FFmpeg options extracting audio channel `channel`
    pub fn find_audio_directive(&self, channel: i64) -> ProbeResult<ExtractDirective> {
        self.locator().directive(channel)
    }
}
