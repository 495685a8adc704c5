//! Media report loading and querying
//!
//! [`loader`] turns one MediaInfo run into a [`MediaRecord`](crate::domain::model::MediaRecord),
//! [`index`] answers typed questions about it, [`locator`] maps flat audio
//! channel numbers onto streams and [`attributes`] bundles the usual answers.

pub mod attributes;
pub mod index;
pub mod loader;
pub mod locator;

pub use attributes::MediaAttributes;
pub use index::{AudioStream, Resolution, SequencePolicy, TrackIndex};
pub use loader::{normalize, ReportLoader};
pub use locator::{ChannelLocation, ChannelLocator, ExtractDirective, StereoSide};
