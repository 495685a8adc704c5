// Domain coercion - Text-to-number boundary for report fields
//
// MediaInfo reports numbers as decimal text. Each numeric domain gets one
// parser here so a bad value surfaces as a named error at the query that
// needed it.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::model::{CHANNELS_FIELD, FRAME_COUNT_FIELD, FRAME_RATE_FIELD};
use crate::error::{ProbeError, ProbeResult};

fn invalid(field: &str, value: &str) -> ProbeError {
    ProbeError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Presentation-order key.
///
/// Program-stream containers report orders like `0-1`, so a key is a list of
/// unsigned segments compared left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey(Vec<u64>);

impl OrderKey {
    pub fn segments(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        f.write_str(&parts.join("-"))
    }
}

/// Parse an order key such as `2` or `0-1`
pub fn order_key(field: &str, text: &str) -> ProbeResult<OrderKey> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, text));
    }
    trimmed
        .split('-')
        .map(|segment| segment.trim().parse::<u64>().map_err(|_| invalid(field, text)))
        .collect::<ProbeResult<Vec<u64>>>()
        .map(OrderKey)
}

/// Parse a stream address (`StreamOrder` or `ID`), which must be a plain integer
pub fn stream_address(field: &str, text: &str) -> ProbeResult<u32> {
    text.trim().parse::<u32>().map_err(|_| invalid(field, text))
}

/// Parse an audio track's channel count
pub fn channel_count(text: &str) -> ProbeResult<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| invalid(CHANNELS_FIELD, text))
}

/// Parse a pixel dimension (`Width` / `Height`)
pub fn pixel_dimension(field: &str, text: &str) -> ProbeResult<u32> {
    text.trim().parse::<u32>().map_err(|_| invalid(field, text))
}

/// Parse the General track's total frame count
pub fn frame_count(text: &str) -> ProbeResult<u64> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| invalid(FRAME_COUNT_FIELD, text))
}

/// Parse a frame rate such as `23.976`
pub fn frame_rate(text: &str) -> ProbeResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(fps) if fps.is_finite() && fps >= 0.0 => Ok(fps),
        _ => Err(invalid(FRAME_RATE_FIELD, text)),
    }
}
