#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Response;
use serde_json::json;
use site_core::{DEFAULT_DISPLAY_TIMEZONE, RawTrack, RouteTable};
use site_web::cache::{Beta, CachePool};
use site_web::config::MailerConfig;
use site_web::error::{MailError, UpstreamError};
use site_web::mailer::{Email, Mailer};
use site_web::now_playing::NowPlayingResolver;
use site_web::render::HtmlRenderer;
use site_web::state::AppState;
use site_web::upstream::TrackSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub fn track(artist: &str, name: &str, url: &str, played_at: Option<i64>) -> RawTrack {
    RawTrack {
        artist: artist.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        played_at,
    }
}

pub fn scenario_tracks() -> Vec<RawTrack> {
    vec![
        track("X", "Y", "u1", None),
        track("A", "B", "u2", Some(1_700_000_000)),
    ]
}

/// Scripted stand-in for Last.fm that counts its calls.
pub struct FakeTrackSource {
    tracks: Mutex<Result<Vec<RawTrack>, String>>,
    account: Mutex<Result<serde_json::Value, String>>,
    track_calls: AtomicUsize,
    account_calls: AtomicUsize,
}

impl FakeTrackSource {
    pub fn new(tracks: Vec<RawTrack>) -> Self {
        Self {
            tracks: Mutex::new(Ok(tracks)),
            account: Mutex::new(Ok(json!({ "name": "tester", "playcount": "1234" }))),
            track_calls: AtomicUsize::new(0),
            account_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_tracks(&self, tracks: Result<Vec<RawTrack>, String>) {
        *self.tracks.lock().unwrap() = tracks;
    }

    pub fn set_account(&self, account: Result<serde_json::Value, String>) {
        *self.account.lock().unwrap() = account;
    }

    pub fn track_calls(&self) -> usize {
        self.track_calls.load(Ordering::SeqCst)
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }
}

fn response_error(message: &str) -> UpstreamError {
    UpstreamError::Response {
        code: 8,
        message: message.to_string(),
    }
}

#[async_trait]
impl TrackSource for FakeTrackSource {
    async fn user_info(&self, _username: &str) -> Result<serde_json::Value, UpstreamError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.account.lock().unwrap().clone().map_err(|m| response_error(&m))
    }

    async fn recent_tracks(&self, _username: &str, _limit: u32) -> Result<Vec<RawTrack>, UpstreamError> {
        self.track_calls.fetch_add(1, Ordering::SeqCst);
        self.tracks.lock().unwrap().clone().map_err(|m| response_error(&m))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub async fn open_cache() -> (CachePool, TempDir) {
    let dir = TempDir::new().unwrap();
    let cache = CachePool::open(dir.path(), "test").await.unwrap();
    (cache, dir)
}

pub fn resolver(cache: &CachePool, source: &Arc<FakeTrackSource>) -> NowPlayingResolver {
    NowPlayingResolver::new(
        cache.clone(),
        source.clone(),
        Some("tester".to_string()),
        Beta::HARD_EXPIRY,
        DEFAULT_DISPLAY_TIMEZONE,
    )
}

pub struct TestSite {
    pub app: Router,
    pub state: Arc<AppState>,
    pub source: Arc<FakeTrackSource>,
    pub mailer: Arc<RecordingMailer>,
    _cache_dir: TempDir,
}

/// Test app; `with_lastfm = false` mimics a missing API key.
pub async fn create_test_site(with_lastfm: bool, mailer: RecordingMailer) -> TestSite {
    let (cache, cache_dir) = open_cache().await;
    let source = Arc::new(FakeTrackSource::new(scenario_tracks()));
    let mailer = Arc::new(mailer);

    let now_playing = with_lastfm.then(|| resolver(&cache, &source));

    let state = Arc::new(AppState {
        routes: RouteTable::site(),
        cache,
        now_playing,
        renderer: Arc::new(HtmlRenderer::new("test site")),
        mailer: mailer.clone(),
        mailer_config: MailerConfig {
            from: "site@example.com".to_string(),
            to: "owner@example.com".to_string(),
            dsn: None,
        },
    });

    TestSite {
        app: site_web::router(state.clone()),
        state,
        source,
        mailer,
        _cache_dir: cache_dir,
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
