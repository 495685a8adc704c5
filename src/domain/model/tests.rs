// Unit tests for domain models

use super::*;
use serde_json::json;

fn track(value: Value) -> Track {
    match value {
        Value::Object(map) => Track::from_fields(map).unwrap(),
        _ => panic!("fixture track must be an object"),
    }
}

#[test]
fn test_track_type_parse_is_case_insensitive() {
    assert_eq!("vIdEo".parse::<TrackType>().unwrap(), TrackType::Video);
    assert_eq!("general".parse::<TrackType>().unwrap(), TrackType::General);
    assert_eq!(" OTHER ".parse::<TrackType>().unwrap(), TrackType::Other);
}

#[test]
fn test_track_type_parse_rejects_unknown() {
    let err = "subtitle".parse::<TrackType>().unwrap_err();
    assert!(matches!(err, ProbeError::InvalidArgument { .. }));
    assert!(err.to_string().contains("'subtitle'"));
}

#[test]
fn test_track_type_display() {
    assert_eq!(format!("{}", TrackType::Image), "Image");
    assert_eq!(TrackType::ALL.len(), 6);
}

#[test]
fn test_addressing_field_names() {
    assert_eq!(Addressing::from_pid_flag(false).field_name(), "StreamOrder");
    assert_eq!(Addressing::from_pid_flag(true).field_name(), "ID");
    assert_eq!(Addressing::default(), Addressing::StreamOrder);
}

#[test]
fn test_track_requires_type() {
    let mut map = Map::new();
    map.insert("StreamOrder".into(), json!("0"));
    assert!(Track::from_fields(map).is_err());

    let mut map = Map::new();
    map.insert("@type".into(), json!(3));
    assert!(Track::from_fields(map).is_err());
}

#[test]
fn test_track_label_normalization() {
    let t = track(json!({"@type": "audio", "Channels": "2"}));
    assert_eq!(t.kind(), Some(TrackType::Audio));
    assert_eq!(t.label(), "Audio");

    let t = track(json!({"@type": "Text", "StreamOrder": "3"}));
    assert_eq!(t.kind(), None);
    assert_eq!(t.label(), "Text");
}

#[test]
fn test_field_rendering() {
    let t = track(json!({
        "@type": "Video",
        "Width": 1920,
        "Height": "1080",
        "Default": true,
        "Missing": null,
        "extra": {"Codec": "apch"}
    }));

    assert_eq!(t.width().as_deref(), Some("1920"));
    assert_eq!(t.height().as_deref(), Some("1080"));
    assert_eq!(t.field("Default").as_deref(), Some("true"));
    assert_eq!(t.field("Missing"), None);
    assert_eq!(t.field("extra").as_deref(), Some(r#"{"Codec":"apch"}"#));
    assert_eq!(t.field("Nope"), None);
}

#[test]
fn test_empty_order_fields_count_as_absent() {
    let t = track(json!({"@type": "Audio", "StreamOrder": "", "@typeorder": " ", "ID": "2"}));
    assert_eq!(t.stream_order(), None);
    assert_eq!(t.type_order(), None);
    assert_eq!(t.id().as_deref(), Some("2"));
}

#[test]
fn test_record_validation_requires_general() {
    let record = MediaRecord::new(
        "/media/clip.mov".into(),
        vec![track(json!({"@type": "Video", "StreamOrder": "0"}))],
    );
    assert!(matches!(record.validate(), Err(ProbeError::MalformedOutput { .. })));

    let record = MediaRecord::new(
        "/media/clip.mov".into(),
        vec![track(json!({"@type": "General"}))],
    );
    assert!(record.validate().is_ok());
}

#[test]
fn test_record_serializes_with_path_and_tracks_only() {
    let record = MediaRecord::new(
        "/media/clip.mov".into(),
        vec![track(json!({"@type": "General", "FrameCount": "24"}))],
    );
    let value = serde_json::to_value(&record).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["path", "tracks"]);
    assert_eq!(value["tracks"][0]["FrameCount"], "24");
}

#[test]
fn test_render_listing_separates_tracks() {
    let record = MediaRecord::new(
        "/media/clip.mov".into(),
        vec![
            track(json!({"@type": "General", "Format": "MPEG-4"})),
            track(json!({"@type": "Audio", "Channels": "2"})),
        ],
    );
    let listing = record.render_listing();
    assert_eq!(
        listing,
        "/media/clip.mov\n\n@type = General\nFormat = MPEG-4\n\n@type = Audio\nChannels = 2\n"
    );
}
