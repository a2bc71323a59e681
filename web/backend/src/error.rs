use site_core::RouteNotFound;
use thiserror::Error;

/// Failures talking to the scrobble service.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("http error: {0}")]
    Http(String),
    /// The API answered with an error payload (`{"error": 6, "message": ...}`).
    #[error("{message}")]
    Response { code: i64, message: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        UpstreamError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        UpstreamError::Decode(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache encode error: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render error: {0}")]
    Failed(String),
}

/// Anything that stops a page from rendering. `NotFound` maps to 404,
/// everything else to 500.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    NotFound(#[from] RouteNotFound),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{0}")]
    Unhandled(String),
}

impl SiteError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            SiteError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Why the recent-tracks half of the widget came back empty.
#[derive(Error, Debug)]
pub enum NowPlayingError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),
    #[error("mail compose error: {0}")]
    Compose(String),
}

/// Failures building the shared application state at startup.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Mail(#[from] MailError),
}
