use site_web::error::UpstreamError;
use site_web::lastfm::{parse_recent_tracks, parse_user_info};

#[test]
fn recent_tracks_with_now_playing() {
    let body = r##"{
        "recenttracks": {
            "track": [
                {
                    "artist": { "mbid": "", "#text": "X" },
                    "name": "Y",
                    "url": "u1",
                    "@attr": { "nowplaying": "true" }
                },
                {
                    "artist": { "mbid": "", "#text": "A" },
                    "name": "B",
                    "url": "u2",
                    "date": { "uts": "1000", "#text": "01 Jan 1970, 00:16" }
                }
            ],
            "@attr": { "user": "tester", "page": "1", "total": "2" }
        }
    }"##;

    let tracks = parse_recent_tracks(body).unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].artist, "X");
    assert_eq!(tracks[0].name, "Y");
    assert_eq!(tracks[0].url, "u1");
    assert_eq!(tracks[0].played_at, None);
    assert_eq!(tracks[1].played_at, Some(1000));
}

#[test]
fn numeric_timestamps_are_accepted() {
    let body = r##"{"recenttracks": {"track": [
        {"artist": {"#text": "A"}, "name": "B", "url": "u2", "date": {"uts": 1000}}
    ]}}"##;

    assert_eq!(parse_recent_tracks(body).unwrap()[0].played_at, Some(1000));
}

#[test]
fn single_track_object_is_accepted() {
    let body = r##"{"recenttracks": {"track":
        {"artist": {"#text": "A"}, "name": "B", "url": "u2", "date": {"uts": "1700000000"}}
    }}"##;

    let tracks = parse_recent_tracks(body).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].played_at, Some(1_700_000_000));
}

#[test]
fn empty_history_parses() {
    let body = r##"{"recenttracks": {"track": [], "@attr": {"total": "0"}}}"##;
    assert!(parse_recent_tracks(body).unwrap().is_empty());

    let body = r##"{"recenttracks": {"@attr": {"total": "0"}}}"##;
    assert!(parse_recent_tracks(body).unwrap().is_empty());
}

#[test]
fn error_payload_becomes_response_error() {
    let body = r##"{"error": 6, "message": "User not found", "links": []}"##;

    match parse_recent_tracks(body) {
        Err(UpstreamError::Response { code, message }) => {
            assert_eq!(code, 6);
            assert_eq!(message, "User not found");
        }
        other => panic!("expected response error, got {other:?}"),
    }

    let error = parse_user_info(body).unwrap_err();
    assert_eq!(error.to_string(), "User not found");
}

#[test]
fn malformed_payloads_are_decode_errors() {
    assert!(matches!(parse_recent_tracks("<html>"), Err(UpstreamError::Decode(_))));

    let body = r##"{"recenttracks": {"track": [
        {"artist": {"#text": "A"}, "name": "B", "url": "u2", "date": {"uts": "yesterday"}}
    ]}}"##;
    assert!(matches!(parse_recent_tracks(body), Err(UpstreamError::Decode(_))));
}

#[test]
fn out_of_range_timestamps_are_decode_errors() {
    let body = r##"{"recenttracks": {"track": [
        {"artist": {"#text": "A"}, "name": "B", "url": "u2", "date": {"uts": "9223372036854775807"}}
    ]}}"##;

    match parse_recent_tracks(body) {
        Err(UpstreamError::Decode(message)) => assert!(message.contains("out of range")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn user_info_returns_the_user_object() {
    let body = r##"{"user": {"name": "tester", "playcount": "1234", "url": "https://www.last.fm/user/tester"}}"##;

    let account = parse_user_info(body).unwrap();

    assert_eq!(account["name"], "tester");
    assert_eq!(account["playcount"], "1234");
}
