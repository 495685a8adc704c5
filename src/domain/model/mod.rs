// Domain models - Canonical media record and track types

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ProbeError, ProbeResult};

#[cfg(test)]
mod tests;

/// Field holding the track type discriminator
pub const TYPE_FIELD: &str = "@type";
/// Type-scoped order field, used when `StreamOrder` is absent
pub const TYPE_ORDER_FIELD: &str = "@typeorder";
pub const STREAM_ORDER_FIELD: &str = "StreamOrder";
pub const ID_FIELD: &str = "ID";
pub const CHANNELS_FIELD: &str = "Channels";
pub const FRAME_RATE_FIELD: &str = "FrameRate";
pub const FRAME_COUNT_FIELD: &str = "FrameCount";
pub const DURATION_FIELD: &str = "Duration";
pub const WIDTH_FIELD: &str = "Width";
pub const HEIGHT_FIELD: &str = "Height";
pub const COLOR_SPACE_FIELD: &str = "ColorSpace";
pub const TIMECODE_FIELD: &str = "TimeCode_FirstFrame";

/// Closed set of track types a query can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    General,
    Video,
    Audio,
    Image,
    Data,
    Other,
}

impl TrackType {
    pub const ALL: [TrackType; 6] = [
        TrackType::General,
        TrackType::Video,
        TrackType::Audio,
        TrackType::Image,
        TrackType::Data,
        TrackType::Other,
    ];

    /// Title-case label as MediaInfo emits it
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::General => "General",
            TrackType::Video => "Video",
            TrackType::Audio => "Audio",
            TrackType::Image => "Image",
            TrackType::Data => "Data",
            TrackType::Other => "Other",
        }
    }

    /// Case-insensitive match against the closed set
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
            ProbeError::invalid_argument(format!(
                "'{}' is not a valid track type. Valid types: {}",
                s,
                valid.join(", ")
            ))
        })
    }
}

/// Which per-track field addresses a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// Presentation order within the file (`StreamOrder`)
    #[default]
    StreamOrder,
    /// Physical identifier (`ID`)
    Pid,
}

impl Addressing {
    pub fn from_pid_flag(by_pid: bool) -> Self {
        if by_pid {
            Addressing::Pid
        } else {
            Addressing::StreamOrder
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Addressing::StreamOrder => STREAM_ORDER_FIELD,
            Addressing::Pid => ID_FIELD,
        }
    }
}

/// One stream-level record of a probed file.
///
/// Keeps every field of the report in emission order. The type discriminator
/// is lifted out at construction; well-known fields have typed accessors and
/// anything else is reachable through [`Track::field`].
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    kind: Option<TrackType>,
    label: String,
    fields: Map<String, Value>,
}

impl Track {
    /// Build a track from one entry of the report's track list.
    ///
    /// Fails when the entry has no textual `@type`.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, String> {
        let label = match fields.get(TYPE_FIELD) {
            Some(Value::String(label)) if !label.trim().is_empty() => label.trim().to_string(),
            Some(_) => return Err(format!("track has a non-text {} field", TYPE_FIELD)),
            None => return Err(format!("track is missing {}", TYPE_FIELD)),
        };
        let kind = TrackType::from_label(&label);
        let label = kind.map(|k| k.as_str().to_string()).unwrap_or(label);

        Ok(Self { kind, label, fields })
    }

    /// Type within the closed set, `None` for labels such as `Text` or `Menu`
    pub fn kind(&self) -> Option<TrackType> {
        self.kind
    }

    pub fn is(&self, track_type: TrackType) -> bool {
        self.kind == Some(track_type)
    }

    /// Type label, title case for known types and verbatim otherwise
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw JSON value of a field
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field rendered as text.
    ///
    /// Strings come back unchanged, numbers and booleans in decimal form,
    /// nested objects and arrays as compact JSON. `null` counts as absent.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Field text, treating an empty string as absent
    fn non_empty(&self, name: &str) -> Option<String> {
        self.field(name).filter(|v| !v.trim().is_empty())
    }

    pub fn stream_order(&self) -> Option<String> {
        self.non_empty(STREAM_ORDER_FIELD)
    }

    pub fn type_order(&self) -> Option<String> {
        self.non_empty(TYPE_ORDER_FIELD)
    }

    pub fn id(&self) -> Option<String> {
        self.non_empty(ID_FIELD)
    }

    pub fn channels(&self) -> Option<String> {
        self.non_empty(CHANNELS_FIELD)
    }

    pub fn frame_rate(&self) -> Option<String> {
        self.field(FRAME_RATE_FIELD)
    }

    pub fn frame_count(&self) -> Option<String> {
        self.field(FRAME_COUNT_FIELD)
    }

    pub fn duration(&self) -> Option<String> {
        self.field(DURATION_FIELD)
    }

    pub fn width(&self) -> Option<String> {
        self.field(WIDTH_FIELD)
    }

    pub fn height(&self) -> Option<String> {
        self.field(HEIGHT_FIELD)
    }

    pub fn color_space(&self) -> Option<String> {
        self.field(COLOR_SPACE_FIELD)
    }

    pub fn timecode_first_frame(&self) -> Option<String> {
        self.field(TIMECODE_FIELD)
    }

    /// Iterate fields in report order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Track {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Normalized output for one probed file.
///
/// Exactly two things survive normalization: the self-referenced path and the
/// track list, in the order MediaInfo emitted them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecord {
    pub path: String,
    pub tracks: Vec<Track>,
}

impl MediaRecord {
    pub fn new(path: String, tracks: Vec<Track>) -> Self {
        Self { path, tracks }
    }

    /// Tracks of one type, in emission order
    pub fn tracks_of(&self, track_type: TrackType) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.is(track_type))
    }

    pub fn first_of(&self, track_type: TrackType) -> Option<&Track> {
        self.tracks_of(track_type).next()
    }

    pub fn general(&self) -> Option<&Track> {
        self.first_of(TrackType::General)
    }

    /// Checks the record holds a `General` track
    pub fn validate(&self) -> ProbeResult<()> {
        if self.general().is_none() {
            return Err(ProbeError::malformed(
                &self.path,
                "report contains no General track",
            ));
        }
        Ok(())
    }

    /// Human-readable listing of every track's fields.
    ///
    /// A blank line precedes each track, `key = value` per field.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.path);
        out.push('\n');
        for track in &self.tracks {
            for (key, _) in track.fields() {
                if key == TYPE_FIELD {
                    out.push('\n');
                }
                let value = track.field(key).unwrap_or_default();
                out.push_str(&format!("{} = {}\n", key, value));
            }
        }
        out
    }
}
