//! LRCLIB lyrics client
//!
//! LRCLIB is a free lyrics API keyed by track title and artist name.
//! API Documentation: https://lrclib.net/docs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::clients::{
    catalog::LyricsProvider,
    entities::Lyrics,
    errors::{Error, Result},
};

/// LRCLIB API record
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LrclibRecord {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl LrclibRecord {
    /// Plain lyrics when present, LRC text otherwise. `None` when the record has neither.
    pub fn into_lyrics(self) -> Option<Lyrics> {
        let (text, synced) = match (self.plain_lyrics, self.synced_lyrics) {
            (Some(plain), _) if !plain.trim().is_empty() => (plain, false),
            (_, Some(lrc)) if !lrc.trim().is_empty() => (lrc, true),
            _ => return None,
        };
        Some(Lyrics {
            title: self.track_name,
            artist: self.artist_name,
            text,
            synced,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl LrclibClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = concat!("tunescope/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: impl Into<String>, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    // Default endpoint with LYRICS_ACCESS_TOKEN picked up when set
    pub fn try_default() -> Result<Self> {
        let access_token = std::env::var("LYRICS_ACCESS_TOKEN").ok();
        Self::new(Self::DEFAULT_BASE_URL, access_token, Duration::from_secs(10))
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}/{path}", self.base_url));
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Exact match on title and artist
    async fn get_exact(&self, title: &str, artist: &str) -> Result<Option<LrclibRecord>> {
        let response = self
            .get("get")
            .query(&[("track_name", title), ("artist_name", artist)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::LyricsUnexpectedResponse(format!(
                "get returned {}",
                response.status()
            )));
        }
        Ok(Some(response.json().await?))
    }

    async fn search(&self, title: &str, artist: &str) -> Result<Vec<LrclibRecord>> {
        let response = self
            .get("search")
            .query(&[("track_name", title), ("artist_name", artist)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(Error::LyricsUnexpectedResponse(format!(
                "search returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

/// First search record that actually carries lyrics
pub fn first_with_lyrics(records: Vec<LrclibRecord>) -> Option<Lyrics> {
    records
        .into_iter()
        .filter(|record| !record.instrumental)
        .find_map(LrclibRecord::into_lyrics)
}

#[async_trait]
impl LyricsProvider for LrclibClient {
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Lyrics> {
        debug!("Looking up lyrics for {title:?} by {artist:?}");
        if let Some(lyrics) = self
            .get_exact(title, artist)
            .await?
            .and_then(LrclibRecord::into_lyrics)
        {
            return Ok(lyrics);
        }

        debug!("No exact lyrics match, falling back to search");
        first_with_lyrics(self.search(title, artist).await?).ok_or_else(|| Error::LyricsNotFound {
            title: title.to_string(),
            artist: artist.to_string(),
        })
    }
}
