//! Report loading: one MediaInfo run per file, reshaped into a [`MediaRecord`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::adapters::MediaInfoRunner;
use crate::config_initialization::ProbeConfig;
use crate::domain::model::{MediaRecord, Track};
use crate::error::{ProbeError, ProbeResult};
use crate::ports::ProbeRunner;

/// Wrapper key around the report body
const MEDIA_KEY: &str = "media";
/// Self-reference to the probed file inside the wrapper
const REF_KEY: &str = "@ref";
/// Track list inside the wrapper
const TRACK_KEY: &str = "track";

/// Loads and normalizes MediaInfo reports
pub struct ReportLoader {
    runner: Arc<dyn ProbeRunner>,
}

impl ReportLoader {
    /// Create a loader over any probe runner
    pub fn new(runner: Arc<dyn ProbeRunner>) -> Self {
        Self { runner }
    }

    /// Create a loader that spawns MediaInfo as configured
    pub fn from_config(config: ProbeConfig) -> Self {
        Self::new(Arc::new(MediaInfoRunner::new(config)))
    }

    /// Probe a file and return its canonical record
    pub async fn load(&self, path: impl AsRef<Path>) -> ProbeResult<MediaRecord> {
        let resolved = resolve_input(path.as_ref()).await?;
        let raw = self.invoke(&resolved).await?;
        let record = normalize(&resolved.to_string_lossy(), &raw)?;

        info!(
            path = %record.path,
            tracks = record.tracks.len(),
            "Loaded MediaInfo report"
        );
        Ok(record)
    }

    /// Probe a file and return MediaInfo's output verbatim
    pub async fn load_raw(&self, path: impl AsRef<Path>) -> ProbeResult<Vec<u8>> {
        let resolved = resolve_input(path.as_ref()).await?;
        self.invoke(&resolved).await
    }

    async fn invoke(&self, path: &Path) -> ProbeResult<Vec<u8>> {
        debug!(command = %self.runner.describe(path), "Running probe");
        let raw = self.runner.run(path).await?;
        debug!(bytes = raw.len(), "Probe output captured");
        Ok(raw)
    }
}

/// Reject anything that is not a regular file, then make the path absolute
async fn resolve_input(path: &Path) -> ProbeResult<PathBuf> {
    let not_found = || ProbeError::NotFound {
        path: path.display().to_string(),
    };

    let metadata = tokio::fs::metadata(path).await.map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    tokio::fs::canonicalize(path).await.map_err(|_| not_found())
}

/// Reshape raw MediaInfo JSON into a [`MediaRecord`].
///
/// `source` names the probed file in error messages. The `@ref` field becomes
/// `path`, the `track` list becomes `tracks`, and the wrapper is dropped.
pub fn normalize(source: &str, raw: &[u8]) -> ProbeResult<MediaRecord> {
    let empty = || ProbeError::EmptyOutput {
        path: source.to_string(),
    };

    if raw.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(empty());
    }

    let document: Value = serde_json::from_slice(raw).map_err(|e| {
        ProbeError::malformed(source, format!("JSON decode error: {}", e))
    })?;

    let mut root = match document {
        Value::Null => return Err(empty()),
        Value::Object(root) => root,
        _ => return Err(ProbeError::malformed(source, "top level is not an object")),
    };

    let mut media = match root.remove(MEDIA_KEY) {
        None => {
            return Err(ProbeError::malformed(
                source,
                format!("missing '{}' wrapper", MEDIA_KEY),
            ))
        }
        Some(Value::Null) => return Err(empty()),
        Some(Value::Object(media)) => media,
        Some(_) => {
            return Err(ProbeError::malformed(
                source,
                format!("'{}' is not an object", MEDIA_KEY),
            ))
        }
    };

    let path = match media.remove(REF_KEY) {
        Some(Value::String(path)) => path,
        Some(_) => {
            return Err(ProbeError::malformed(
                source,
                format!("'{}' is not text", REF_KEY),
            ))
        }
        None => {
            return Err(ProbeError::malformed(
                source,
                format!("missing '{}'", REF_KEY),
            ))
        }
    };

    let entries = match media.remove(TRACK_KEY) {
        Some(Value::Array(entries)) => entries,
        // Older MediaInfo builds emit a lone track as a bare object
        Some(Value::Object(entry)) => vec![Value::Object(entry)],
        Some(Value::Null) => Vec::new(),
        Some(_) => {
            return Err(ProbeError::malformed(
                source,
                format!("'{}' is not a list", TRACK_KEY),
            ))
        }
        None => {
            return Err(ProbeError::malformed(
                source,
                format!("missing '{}'", TRACK_KEY),
            ))
        }
    };

    if entries.is_empty() {
        return Err(empty());
    }

    let tracks = entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| track_from_entry(source, position, entry))
        .collect::<ProbeResult<Vec<Track>>>()?;

    let record = MediaRecord::new(path, tracks);
    record.validate()?;
    Ok(record)
}

fn track_from_entry(source: &str, position: usize, entry: Value) -> ProbeResult<Track> {
    let fields: Map<String, Value> = match entry {
        Value::Object(fields) => fields,
        _ => {
            return Err(ProbeError::malformed(
                source,
                format!("track {} is not an object", position),
            ))
        }
    };

    Track::from_fields(fields)
        .map_err(|message| ProbeError::malformed(source, format!("track {}: {}", position, message)))
}
