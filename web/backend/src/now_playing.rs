use crate::cache::{Beta, CachePool, Computed};
use crate::error::{NowPlayingError, UpstreamError};
use crate::upstream::TrackSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_core::{NowPlayingView, RawTrack, Tz, partition_tracks};
use std::sync::Arc;
use std::time::Duration;

pub const ACCOUNT_CACHE_KEY: &str = "lastfm__account";
pub const TRACKS_CACHE_KEY: &str = "lastfm__tracks";
pub const CACHE_TAGS: [&str; 2] = ["lastfm", "api"];

pub const ACCOUNT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const TRACKS_TTL: Duration = Duration::from_secs(30);
pub const RECENT_TRACK_LIMIT: u32 = 8;

pub const MISSING_USERNAME: &str = "LAST_FM_USER is not configured";

/// Recent tracks as cached, with the instant they were fetched. The playing
/// track is stamped with `fetched_at`, so repeated renders from one cache
/// entry agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentTracksSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub tracks: Vec<RawTrack>,
}

pub struct NowPlayingResolver {
    cache: CachePool,
    source: Arc<dyn TrackSource>,
    username: Option<String>,
    beta: Beta,
    timezone: Tz,
}

impl NowPlayingResolver {
    pub fn new(
        cache: CachePool,
        source: Arc<dyn TrackSource>,
        username: Option<String>,
        beta: Beta,
        timezone: Tz,
    ) -> Self {
        Self {
            cache,
            source,
            username,
            beta,
            timezone,
        }
    }

    pub async fn resolve(&self) -> NowPlayingView {
        let Some(username) = self.username.as_deref() else {
            tracing::error!("{}", MISSING_USERNAME);
            return NowPlayingView::failed(MISSING_USERNAME, None);
        };

        let account = self.account_info(username).await;

        match self.recent_tracks(username).await {
            Ok(snapshot) => {
                let view = NowPlayingView::from_tracks(
                    partition_tracks(&snapshot.tracks, snapshot.fetched_at, self.timezone),
                    account,
                );
                tracing::debug!(
                    tracks = view.track_count(),
                    playing = view.current_track.is_some(),
                    "Resolved now playing"
                );
                view
            }
            Err(e) => {
                tracing::error!("{}", e);
                NowPlayingView::failed(e.to_string(), account)
            }
        }
    }

    /// Best effort: a failed lookup is logged and leaves the account empty.
    async fn account_info(&self, username: &str) -> Option<serde_json::Value> {
        let mut failure: Option<UpstreamError> = None;

        let result = self
            .cache
            .get(ACCOUNT_CACHE_KEY, self.beta, {
                let failure = &mut failure;
                let source = &self.source;
                move || async move {
                    tracing::debug!("Last.fm account cache miss: refreshing from the API");
                    let computed = match source.user_info(username).await {
                        Ok(account) => Computed::expires_in(Some(account), ACCOUNT_TTL),
                        Err(e) => {
                            *failure = Some(e);
                            Computed::expired_now(None)
                        }
                    };
                    computed.tagged(&CACHE_TAGS)
                }
            })
            .await;

        if let Some(e) = failure {
            tracing::warn!("Last.fm account lookup failed, retrying on next request: {}", e);
        }

        result.unwrap_or_else(|e| {
            tracing::warn!("Last.fm account cache unavailable: {}", e);
            None
        })
    }

    async fn recent_tracks(&self, username: &str) -> Result<RecentTracksSnapshot, NowPlayingError> {
        let mut failure: Option<UpstreamError> = None;

        let cached = self
            .cache
            .get(TRACKS_CACHE_KEY, self.beta, {
                let failure = &mut failure;
                let source = &self.source;
                move || async move {
                    tracing::debug!("Last.fm tracks cache miss: refreshing from the API");
                    let computed = match source.recent_tracks(username, RECENT_TRACK_LIMIT).await {
                        Ok(tracks) => Computed::expires_in(
                            Some(RecentTracksSnapshot {
                                fetched_at: Utc::now(),
                                tracks,
                            }),
                            TRACKS_TTL,
                        ),
                        Err(e) => {
                            *failure = Some(e);
                            Computed::expired_now(None)
                        }
                    };
                    computed.tagged(&CACHE_TAGS)
                }
            })
            .await?;

        if let Some(e) = failure {
            return Err(e.into());
        }

        Ok(cached.unwrap_or_else(|| RecentTracksSnapshot {
            fetched_at: Utc::now(),
            tracks: Vec::new(),
        }))
    }
}
