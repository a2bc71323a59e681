use crate::cache::CachePool;
use crate::config::{Config, MailerConfig};
use crate::error::StartupError;
use crate::lastfm::LastFmClient;
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::now_playing::NowPlayingResolver;
use crate::render::{HtmlRenderer, Renderer};
use site_core::{NowPlayingView, RouteTable};
use std::sync::Arc;

pub const SITE_NAME: &str = "pixiekat";

pub struct AppState {
    pub routes: RouteTable,
    pub cache: CachePool,
    /// Absent when no Last.fm API key is configured.
    pub now_playing: Option<NowPlayingResolver>,
    pub renderer: Arc<dyn Renderer>,
    pub mailer: Arc<dyn Mailer>,
    pub mailer_config: MailerConfig,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, StartupError> {
        let cache = CachePool::open(&config.cache_dir, &config.app_env).await?;
        tracing::info!(
            entries = cache.len().await,
            "Cache ready at {:?}",
            cache.file_path()
        );

        let now_playing = match &config.lastfm {
            Some(lastfm) => {
                let client = LastFmClient::with_api_base(lastfm.api_key.clone(), lastfm.api_base.clone());
                Some(NowPlayingResolver::new(
                    cache.clone(),
                    Arc::new(client),
                    lastfm.username.clone(),
                    config.cache_beta,
                    config.display_timezone,
                ))
            }
            None => {
                tracing::info!("LAST_FM_API_KEY not set, now playing widget disabled");
                None
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.mailer.dsn {
            Some(dsn) => Arc::new(SmtpMailer::from_dsn(dsn)?),
            None => {
                tracing::info!("MAILER_DSN not set, contact mail is only logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self {
            routes: RouteTable::site(),
            cache,
            now_playing,
            renderer: Arc::new(HtmlRenderer::new(SITE_NAME)),
            mailer,
            mailer_config: config.mailer.clone(),
        })
    }

    pub async fn now_playing_view(&self) -> NowPlayingView {
        match &self.now_playing {
            Some(resolver) => resolver.resolve().await,
            None => NowPlayingView::default(),
        }
    }
}
