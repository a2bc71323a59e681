use crate::cache::Beta;
use crate::error::ConfigError;
use crate::lastfm::DEFAULT_API_BASE;
use site_core::{DEFAULT_DISPLAY_TIMEZONE, Tz};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LastFmConfig {
    pub api_key: String,
    pub username: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub from: String,
    pub to: String,
    /// SMTP relay from `MAILER_DSN`. `None` (unset or `null://`) logs
    /// contact mail instead of sending it.
    pub dsn: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when `LAST_FM_API_KEY` is unset; the widget is then skipped.
    pub lastfm: Option<LastFmConfig>,
    pub cache_beta: Beta,
    pub app_env: String,
    pub debug: bool,
    pub cache_dir: PathBuf,
    pub display_timezone: Tz,
    pub bind_addr: SocketAddr,
    pub mailer: MailerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values count as unset
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let lastfm = var("LAST_FM_API_KEY").map(|api_key| LastFmConfig {
            api_key,
            username: var("LAST_FM_USER"),
            api_base: var("LAST_FM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        });

        let cache_beta = match var("CACHE_DEFAULT_BETA") {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .and_then(Beta::new)
                .ok_or_else(|| ConfigError::Invalid(format!("CACHE_DEFAULT_BETA invalid: {raw}")))?,
            None => Beta::HARD_EXPIRY,
        };

        let display_timezone = match var("DISPLAY_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid(format!("DISPLAY_TIMEZONE invalid: {raw}")))?,
            None => DEFAULT_DISPLAY_TIMEZONE,
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid(format!("BIND_ADDR invalid: {bind_addr}")))?;

        let mailer_dsn = match var("MAILER_DSN") {
            Some(dsn) => parse_mailer_dsn(dsn)?,
            None => None,
        };

        Ok(Self {
            lastfm,
            cache_beta,
            app_env: var("APP_ENV").unwrap_or_else(|| "dev".to_string()),
            debug: var("APP_DEBUG").is_some_and(|value| parse_flag(&value)),
            cache_dir: var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("var/cache")),
            display_timezone,
            bind_addr,
            mailer: MailerConfig {
                from: var("MAILER_FROM").unwrap_or_else(|| "site@localhost".to_string()),
                to: var("MAILER_TO").unwrap_or_else(|| "owner@localhost".to_string()),
                dsn: mailer_dsn,
            },
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Keeps `smtp://` and `smtps://` DSNs, maps `null://` to no transport. The
/// DSN is left out of the error since it may carry credentials.
fn parse_mailer_dsn(dsn: String) -> Result<Option<String>, ConfigError> {
    match dsn.split_once("://") {
        Some(("null", _)) => Ok(None),
        Some(("smtp" | "smtps", host)) if !host.is_empty() => Ok(Some(dsn)),
        _ => Err(ConfigError::Invalid(
            "MAILER_DSN must be a smtp://, smtps:// or null:// URL".to_string(),
        )),
    }
}
