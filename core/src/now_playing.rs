use crate::tracks::{PartitionedTracks, TrackRecord};
use serde::{Deserialize, Serialize};

/// What the homepage widget shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingView {
    pub current_track: Option<TrackRecord>,
    #[serde(rename = "lastplayed")]
    pub last_played: Vec<TrackRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NowPlayingView {
    pub fn from_tracks(tracks: PartitionedTracks, account: Option<serde_json::Value>) -> Self {
        Self {
            current_track: tracks.current_track,
            last_played: tracks.last_played,
            account,
            error: None,
        }
    }

    /// Empty track lists with the failure message.
    pub fn failed(message: impl Into<String>, account: Option<serde_json::Value>) -> Self {
        Self {
            current_track: None,
            last_played: Vec::new(),
            account,
            error: Some(message.into()),
        }
    }

    pub fn track_count(&self) -> usize {
        self.last_played.len() + usize::from(self.current_track.is_some())
    }
}
