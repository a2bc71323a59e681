use crate::error::UpstreamError;
use async_trait::async_trait;
use site_core::RawTrack;

/// The scrobble service behind the now-playing widget.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Account profile for `username`, kept as the raw JSON object.
    async fn user_info(&self, username: &str) -> Result<serde_json::Value, UpstreamError>;

    /// Most recent plays first, at most `limit` of them plus a track that is
    /// playing right now.
    async fn recent_tracks(&self, username: &str, limit: u32) -> Result<Vec<RawTrack>, UpstreamError>;
}
