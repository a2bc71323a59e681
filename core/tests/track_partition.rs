use chrono::{TimeZone, Utc};
use site_core::{DEFAULT_DISPLAY_TIMEZONE, NowPlayingView, RawTrack, format_for_display, partition_tracks};

fn track(artist: &str, name: &str, url: &str, played_at: Option<i64>) -> RawTrack {
    RawTrack {
        artist: artist.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        played_at,
    }
}

#[test]
fn test_track_without_timestamp_is_current() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
    let raw = vec![track("X", "Y", "u1", None), track("A", "B", "u2", Some(1000))];

    let result = partition_tracks(&raw, now, DEFAULT_DISPLAY_TIMEZONE);

    let current = result.current_track.expect("current track");
    assert_eq!(current.artist, "X");
    assert_eq!(current.song, "Y");
    assert_eq!(current.song_url, "u1");
    assert_eq!(current.timestamp, now);
    assert!(current.is_current);

    assert_eq!(result.last_played.len(), 1);
    let played = &result.last_played[0];
    assert_eq!(played.artist, "A");
    assert_eq!(played.song, "B");
    assert_eq!(played.song_url, "u2");
    assert_eq!(played.timestamp.timestamp(), 1000);
    assert!(!played.is_current);
}

#[test]
fn test_history_keeps_upstream_order() {
    let now = Utc::now();
    let raw = vec![
        track("A", "1", "u1", Some(1_700_000_300)),
        track("B", "2", "u2", Some(1_700_000_200)),
        track("C", "3", "u3", Some(1_700_000_100)),
    ];

    let result = partition_tracks(&raw, now, DEFAULT_DISPLAY_TIMEZONE);

    assert!(result.current_track.is_none());
    let songs: Vec<&str> = result.last_played.iter().map(|t| t.song.as_str()).collect();
    assert_eq!(songs, vec!["1", "2", "3"]);
}

#[test]
fn test_only_first_untimestamped_track_is_current() {
    let now = Utc::now();
    let raw = vec![
        track("A", "1", "u1", None),
        track("B", "2", "u2", None),
        track("C", "3", "u3", Some(1_700_000_000)),
    ];

    let result = partition_tracks(&raw, now, DEFAULT_DISPLAY_TIMEZONE);

    assert_eq!(result.current_track.as_ref().unwrap().song, "1");
    assert_eq!(result.last_played.len(), 2);
    assert!(result.last_played.iter().all(|t| !t.is_current));
    assert_eq!(result.last_played[0].timestamp, now);
}

#[test]
fn test_unrepresentable_timestamp_is_not_current() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
    let raw = vec![track("A", "1", "u1", Some(i64::MAX)), track("B", "2", "u2", None)];

    let result = partition_tracks(&raw, now, DEFAULT_DISPLAY_TIMEZONE);

    assert_eq!(result.current_track.as_ref().unwrap().song, "2");
    assert_eq!(result.last_played.len(), 1);
    assert!(!result.last_played[0].is_current);
    assert_eq!(result.last_played[0].timestamp, now);
}

#[test]
fn test_counts_add_up_to_raw_length() {
    let now = Utc::now();
    let cases = vec![
        vec![],
        vec![track("A", "1", "u1", None)],
        vec![track("A", "1", "u1", Some(1_700_000_000))],
        vec![track("A", "1", "u1", None), track("B", "2", "u2", Some(1_700_000_000))],
        vec![track("A", "1", "u1", Some(1_700_000_000)), track("B", "2", "u2", None)],
    ];

    for raw in cases {
        let result = partition_tracks(&raw, now, DEFAULT_DISPLAY_TIMEZONE);
        let current = usize::from(result.current_track.is_some());
        assert_eq!(result.last_played.len() + current, raw.len());
    }
}

#[test]
fn test_empty_upstream_list() {
    let result = partition_tracks(&[], Utc::now(), DEFAULT_DISPLAY_TIMEZONE);

    assert!(result.current_track.is_none());
    assert!(result.last_played.is_empty());
}

#[test]
fn test_display_date_uses_target_timezone() {
    let winter = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let summer = Utc.timestamp_opt(1_690_000_000, 0).unwrap();

    assert_eq!(format_for_display(winter, DEFAULT_DISPLAY_TIMEZONE), "14 November 23 22:13");
    assert_eq!(format_for_display(summer, DEFAULT_DISPLAY_TIMEZONE), "22 July 23 05:26");
    assert_eq!(format_for_display(winter, chrono_tz::America::New_York), "14 November 23 17:13");
}

#[test]
fn test_partitioned_dates_are_formatted() {
    let raw = vec![track("A", "B", "u", Some(1_700_000_000))];
    let result = partition_tracks(&raw, Utc::now(), DEFAULT_DISPLAY_TIMEZONE);

    assert_eq!(result.last_played[0].date, "14 November 23 22:13");
}

#[test]
fn test_view_from_tracks_and_failure() {
    let raw = vec![track("X", "Y", "u1", None), track("A", "B", "u2", Some(1_700_000_000))];
    let partitioned = partition_tracks(&raw, Utc::now(), DEFAULT_DISPLAY_TIMEZONE);

    let view = NowPlayingView::from_tracks(partitioned, None);
    assert_eq!(view.track_count(), 2);
    assert!(view.error.is_none());

    let failed = NowPlayingView::failed("User not found", None);
    assert!(failed.current_track.is_none());
    assert!(failed.last_played.is_empty());
    assert_eq!(failed.error.as_deref(), Some("User not found"));
}

#[test]
fn test_view_serializes_with_template_keys() {
    let view = NowPlayingView::default();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["current_track"], serde_json::Value::Null);
    assert_eq!(json["lastplayed"], serde_json::json!([]));
    assert!(json.get("error").is_none());
}
