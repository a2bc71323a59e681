use crate::display_time::{format_for_display, from_epoch_seconds};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A track as the upstream scrobble service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrack {
    pub artist: String,
    pub name: String,
    pub url: String,
    /// Epoch seconds of the scrobble. Upstream leaves it out for the track
    /// that is playing right now.
    pub played_at: Option<i64>,
}

impl RawTrack {
    pub fn is_now_playing(&self) -> bool {
        self.played_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub artist: String,
    pub song: String,
    pub song_url: String,
    pub timestamp: DateTime<Utc>,
    pub date: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedTracks {
    pub current_track: Option<TrackRecord>,
    pub last_played: Vec<TrackRecord>,
}

/// Splits an upstream track list into the playing track and the history.
///
/// The first record without a play timestamp is the current one and is
/// stamped with `now`. Everything else keeps upstream order in
/// `last_played`; a further timestamp-less record (upstream should never send
/// one) is also stamped with `now` but stays in the history. Only the absence
/// of a timestamp makes a record current.
pub fn partition_tracks(raw: &[RawTrack], now: DateTime<Utc>, timezone: Tz) -> PartitionedTracks {
    let mut partitioned = PartitionedTracks {
        current_track: None,
        last_played: Vec::with_capacity(raw.len()),
    };

    for track in raw {
        let is_current = track.is_now_playing() && partitioned.current_track.is_none();
        // an instant chrono cannot represent falls back to `now`
        let timestamp = track.played_at.and_then(from_epoch_seconds).unwrap_or(now);

        let record = TrackRecord {
            artist: track.artist.clone(),
            song: track.name.clone(),
            song_url: track.url.clone(),
            timestamp,
            date: format_for_display(timestamp, timezone),
            is_current,
        };

        if is_current {
            partitioned.current_track = Some(record);
        } else {
            partitioned.last_played.push(record);
        }
    }

    partitioned
}
