//! Error handling module for MediaProbe

use thiserror::Error;

/// Main error type for MediaProbe operations
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Input path is not a regular file
    #[error("'{path}' is not a path to a file or does not exist")]
    NotFound { path: String },

    /// The external tool produced nothing to parse
    #[error("Didn't read anything from MediaInfo for {path}")]
    EmptyOutput { path: String },

    /// Output present but not the expected report structure
    #[error("Unable to decode MediaInfo report for {path}: {message}")]
    MalformedOutput { path: String, message: String },

    /// Caller supplied an out-of-domain value
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Channel number beyond the file's audio channel total
    #[error("Channel {channel} is out of range: file has {total} audio channel(s)")]
    OutOfRange { channel: i64, total: u64 },

    /// Track lacks every field usable for ordering or addressing
    #[error("{track} track has no {field}; unable to get the stream order")]
    MissingOrderKey { track: String, field: String },

    /// Internal invariant violated
    #[error("Integrity error: {message}")]
    IntegrityError { message: String },

    /// External tool did not finish within the configured wait
    #[error("MediaInfo did not finish within {seconds}s for {path}")]
    Timeout { path: String, seconds: u64 },

    /// External tool could not be started
    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Field text is not the number its domain requires
    #[error("Field {field} has non-numeric value '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Required (non-order) field absent on a track
    #[error("{track} track is missing required field {field}")]
    MissingField { track: String, field: String },

    /// Strict attribute summary could not fill every attribute
    #[error("Unable to get {} for {path}", .missing.join(", "))]
    IncompleteAttributes { path: String, missing: Vec<String> },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Process exit status used by the command-line front end.
    ///
    /// Every variant maps to its own non-zero status.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::InvalidArgument { .. } => 2,
            ProbeError::NotFound { .. } => 3,
            ProbeError::EmptyOutput { .. } => 4,
            ProbeError::MalformedOutput { .. } => 5,
            ProbeError::OutOfRange { .. } => 6,
            ProbeError::MissingOrderKey { .. } => 7,
            ProbeError::IntegrityError { .. } => 8,
            ProbeError::Timeout { .. } => 9,
            ProbeError::ToolLaunch { .. } => 10,
            ProbeError::InvalidNumber { .. } => 11,
            ProbeError::MissingField { .. } => 12,
            ProbeError::IncompleteAttributes { .. } => 13,
            ProbeError::Config { .. } => 14,
            ProbeError::Io(_) => 15,
        }
    }

    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        ProbeError::MalformedOutput {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ProbeError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for MediaProbe operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
