use crate::error::UpstreamError;
use crate::upstream::TrackSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use site_core::{RawTrack, from_epoch_seconds};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LastFmErrorResponse {
    error: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LastFmUserInfoResponse {
    user: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LastFmRecentTracksResponse {
    recenttracks: LastFmRecentTracks,
}

#[derive(Debug, Deserialize)]
struct LastFmRecentTracks {
    #[serde(default)]
    track: OneOrMany<LastFmRecentTrack>,
}

/// Last.fm collapses a one-element list into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct LastFmRecentTrack {
    artist: LastFmText,
    name: String,
    url: String,
    date: Option<LastFmDate>,
}

#[derive(Debug, Deserialize)]
struct LastFmText {
    #[serde(rename = "#text")]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LastFmDate {
    uts: Uts,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Uts {
    Number(i64),
    Text(String),
}

impl Uts {
    fn seconds(&self) -> Result<i64, UpstreamError> {
        let seconds = match self {
            Uts::Number(seconds) => *seconds,
            Uts::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| UpstreamError::Decode(format!("invalid play timestamp: {text:?}")))?,
        };

        match from_epoch_seconds(seconds) {
            Some(_) => Ok(seconds),
            None => Err(UpstreamError::Decode(format!("play timestamp out of range: {seconds}"))),
        }
    }
}

fn check_for_error(body: &serde_json::Value) -> Result<(), UpstreamError> {
    if body.get("error").is_some() {
        let error: LastFmErrorResponse = serde_json::from_value(body.clone())?;
        return Err(UpstreamError::Response {
            code: error.error,
            message: error.message,
        });
    }
    Ok(())
}

pub fn parse_user_info(body: &str) -> Result<serde_json::Value, UpstreamError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    check_for_error(&value)?;

    let response: LastFmUserInfoResponse = serde_json::from_value(value)?;
    Ok(response.user)
}

pub fn parse_recent_tracks(body: &str) -> Result<Vec<RawTrack>, UpstreamError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    check_for_error(&value)?;

    let response: LastFmRecentTracksResponse = serde_json::from_value(value)?;
    response
        .recenttracks
        .track
        .into_vec()
        .into_iter()
        .map(|track| -> Result<RawTrack, UpstreamError> {
            let played_at = track.date.as_ref().map(|date| date.uts.seconds()).transpose()?;
            Ok(RawTrack {
                artist: track.artist.text,
                name: track.name,
                url: track.url,
                played_at,
            })
        })
        .collect()
}

pub struct LastFmClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl LastFmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(api_key: String, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base,
        }
    }

    fn method_url(&self, method: &str, username: &str) -> String {
        format!(
            "{}?method={}&user={}&api_key={}&format=json",
            self.api_base,
            method,
            urlencoding::encode(username),
            urlencoding::encode(&self.api_key)
        )
    }

    async fn fetch(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self.client.get(url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error payloads come with 4xx statuses; let the parser report them.
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(UpstreamError::Http(format!("unexpected status {status}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl TrackSource for LastFmClient {
    async fn user_info(&self, username: &str) -> Result<serde_json::Value, UpstreamError> {
        let url = self.method_url("user.getinfo", username);
        let body = self.fetch(&url).await?;
        parse_user_info(&body)
    }

    async fn recent_tracks(&self, username: &str, limit: u32) -> Result<Vec<RawTrack>, UpstreamError> {
        let url = format!("{}&limit={}", self.method_url("user.getrecenttracks", username), limit);
        let body = self.fetch(&url).await?;
        parse_recent_tracks(&body)
    }
}
