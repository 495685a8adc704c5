use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use mediaprobe::*;

/// Test utilities for driving the loader without MediaInfo
mod test_utils {
    use super::*;

    /// Runner replaying one canned report and counting invocations
    pub struct CannedRunner {
        output: Vec<u8>,
        calls: AtomicUsize,
    }

    impl CannedRunner {
        pub fn new(output: impl Into<Vec<u8>>) -> Arc<Self> {
            Arc::new(Self {
                output: output.into(),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProbeRunner for CannedRunner {
        async fn run(&self, _path: &Path) -> ProbeResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }

        fn describe(&self, path: &Path) -> String {
            format!("canned {}", path.display())
        }
    }

    /// A MediaInfo report for `tracks`
    pub fn report(tracks: Value) -> Vec<u8> {
        json!({
            "creatingLibrary": {"name": "MediaInfoLib", "version": "23.04"},
            "media": {"@ref": "/media/sample.mov", "track": tracks}
        })
        .to_string()
        .into_bytes()
    }

    /// An on-disk stand-in for the probed media file
    pub fn media_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"media").unwrap();
        file
    }

    pub async fn load(tracks: Value) -> MediaRecord {
        let file = media_file();
        ReportLoader::new(CannedRunner::new(report(tracks)))
            .load(file.path())
            .await
            .unwrap()
    }
}

use test_utils::*;

#[tokio::test]
async fn test_no_audio_tracks_is_empty_not_error() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Video", "StreamOrder": "0", "ID": "1"}
    ]))
    .await;
    let index = TrackIndex::new(&record);

    assert_eq!(index.audio_count().unwrap(), 0);
    assert!(index.audio_streams(Addressing::StreamOrder).unwrap().is_empty());
    assert!(index.audio_streams(Addressing::Pid).unwrap().is_empty());
}

#[tokio::test]
async fn test_channel_map_sums_to_audio_count() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Audio", "StreamOrder": "3", "ID": "4", "Channels": "2"},
        {"@type": "Audio", "StreamOrder": "1", "ID": "2", "Channels": "6"},
        {"@type": "Audio", "StreamOrder": "2", "ID": "3", "Channels": "1"}
    ]))
    .await;
    let index = TrackIndex::new(&record);

    let streams = index.audio_streams(Addressing::StreamOrder).unwrap();
    let sum: u32 = streams.iter().map(|s| s.channels).sum();
    assert_eq!(sum, index.audio_count().unwrap());
    assert_eq!(sum, 9);

    let locator = ChannelLocator::from_index(&index, Addressing::StreamOrder).unwrap();
    for channel in 1..=9 {
        assert!(locator.locate(channel).is_ok(), "channel {}", channel);
    }
    assert!(matches!(
        locator.locate(0),
        Err(ProbeError::InvalidArgument { .. })
    ));
    assert!(matches!(
        locator.locate(-1),
        Err(ProbeError::InvalidArgument { .. })
    ));
    assert!(matches!(
        locator.locate(10),
        Err(ProbeError::OutOfRange { channel: 10, total: 9 })
    ));
}

#[tokio::test]
async fn test_six_channel_stream() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Audio", "StreamOrder": "2", "ID": "3", "Channels": "6"}
    ]))
    .await;
    let locator =
        ChannelLocator::from_index(&TrackIndex::new(&record), Addressing::StreamOrder).unwrap();

    assert_eq!(locator.stream_for(3).unwrap(), 2);
    let directive = locator.directive(3).unwrap();
    assert_eq!(directive, ExtractDirective::MapChannel { stream: 2, offset: 2 });
    assert_eq!(directive.to_string(), "-map_channel 0.2.2");
}

#[tokio::test]
async fn test_single_stereo_stream_splits() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Audio", "StreamOrder": "1", "ID": "2", "Channels": "2"}
    ]))
    .await;
    let locator =
        ChannelLocator::from_index(&TrackIndex::new(&record), Addressing::StreamOrder).unwrap();

    assert_eq!(
        locator.directive(1).unwrap().to_string(),
        "-filter_complex \"[0:1]channelsplit=channel_layout=stereo:channels=FL[left]\" -map \"[left]\""
    );
    assert_eq!(
        locator.directive(2).unwrap().to_args(),
        vec![
            "-filter_complex".to_string(),
            "[0:1]channelsplit=channel_layout=stereo:channels=FR[right]".to_string(),
            "-map".to_string(),
            "[right]".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_stream_types_follow_order_key() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Video", "StreamOrder": "0"},
        {"@type": "Audio", "StreamOrder": "2", "Format": "AAC"},
        {"@type": "Audio", "StreamOrder": "1", "Format": "PCM"}
    ]))
    .await;
    let index = TrackIndex::new(&record);

    assert_eq!(index.stream_types().unwrap(), vec!["Video", "Audio", "Audio"]);
    assert_eq!(index.search("Format", TrackType::Audio), Some("AAC".to_string()));
}

#[tokio::test]
async fn test_missing_file_never_runs_probe() {
    let runner = CannedRunner::new(report(json!([{"@type": "General"}])));
    let loader = ReportLoader::new(runner.clone());

    let err = loader.load("/no/such/file.mov").await.unwrap_err();
    assert!(matches!(err, ProbeError::NotFound { .. }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(runner.calls(), 0);
}

#[tokio::test]
async fn test_unparsable_output_is_malformed() {
    let file = media_file();
    let loader = ReportLoader::new(CannedRunner::new(b"<html>not json</html>".to_vec()));

    let err = loader.load(file.path()).await.unwrap_err();
    assert!(matches!(err, ProbeError::MalformedOutput { .. }));
}

#[tokio::test]
async fn test_integer_resolution_matches_text() {
    let record = load(json!([
        {"@type": "General"},
        {"@type": "Video", "StreamOrder": "0", "Width": "3840", "Height": "2160"}
    ]))
    .await;
    let index = TrackIndex::new(&record);

    let text = index.resolution().unwrap();
    let pixels = index.resolution_px().unwrap().unwrap();
    assert_eq!(pixels.width, text.width.parse::<u32>().unwrap());
    assert_eq!(pixels.height, text.height.parse::<u32>().unwrap());
    assert_eq!(pixels.to_string(), "3840x2160");
}

#[tokio::test]
async fn test_attributes_from_fixture() {
    let file = media_file();
    let fixture = include_str!("fixtures/stereo_single.json");
    let loader = ReportLoader::new(CannedRunner::new(fixture));
    let record = loader.load(file.path()).await.unwrap();

    let attributes = MediaAttributes::collect_strict(&TrackIndex::new(&record)).unwrap();
    assert_eq!(attributes.path, "/Volumes/media/interview.mp4");
    assert_eq!(attributes.stream_types, vec!["Video", "Audio"]);
    assert_eq!(attributes.fps, Some(25.0));
    assert_eq!(attributes.frame_count, Some(313));
    assert_eq!(attributes.audio_count, 2);
    assert_eq!(attributes.find_audio_stream(2).unwrap(), 1);
    assert_eq!(
        attributes.find_audio_directive(1).unwrap(),
        ExtractDirective::StereoSplit {
            stream: 1,
            side: StereoSide::Left
        }
    );
}

#[tokio::test]
async fn test_loader_is_shareable_across_tasks() {
    let runner = CannedRunner::new(include_str!("fixtures/eight_channel_mov.json"));
    let loader = Arc::new(ReportLoader::new(runner.clone()));
    let file = Arc::new(media_file());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let loader = loader.clone();
            let file = file.clone();
            tokio::spawn(async move { loader.load(file.path()).await.map(|r| r.tracks.len()) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 5);
    }
    assert_eq!(runner.calls(), 4);
}
