use std::sync::Arc;
use std::time::Duration;

use futures::stream::{StreamExt, iter};
use log::{debug, info, warn};
use serde::Serialize;

use crate::clients::{
    ArtworkSource, Catalog, HttpArtwork, LrclibClient, LyricsProvider, SpotifyClient,
    entities::{Artwork, Lyrics, Track},
    errors::{Error, Result},
};
use crate::features::FeatureTable;

pub const DEFAULT_RECOMMEND_LIMIT: u32 = 5;
/// Spotify rejects recommendation requests above this
pub const MAX_RECOMMEND_LIMIT: u32 = 100;
pub const DEFAULT_TITLE: &str = "BBIBBI";
// thumbnails downloaded in parallel
const DEFAULT_CONCURRENCY: usize = 5;
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// Configuration for the Analyzer struct
pub struct Config {
    pub catalog: Arc<dyn Catalog>,
    pub lyrics: Arc<dyn LyricsProvider>,
    pub artwork: Arc<dyn ArtworkSource>,
    pub recommend_limit: u32,
    pub concurrency: usize,
}

#[derive(Default)]
pub struct ConfigBuilder {
    catalog: Option<Arc<dyn Catalog>>,
    lyrics: Option<Arc<dyn LyricsProvider>>,
    artwork: Option<Arc<dyn ArtworkSource>>,
    lyrics_url: Option<String>,
    http_timeout: Option<Duration>,
    recommend_limit: Option<u32>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn lyrics(mut self, lyrics: Arc<dyn LyricsProvider>) -> Self {
        self.lyrics = Some(lyrics);
        self
    }

    #[must_use]
    pub fn artwork(mut self, artwork: Arc<dyn ArtworkSource>) -> Self {
        self.artwork = Some(artwork);
        self
    }

    #[must_use]
    pub fn lyrics_url(mut self, url: impl Into<String>) -> Self {
        self.lyrics_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn recommend_limit(mut self, limit: u32) -> Self {
        self.recommend_limit = Some(limit);
        self
    }

    /// Fill every capability that was not injected from the environment.
    ///
    /// A Spotify client built here is authorized before it is returned.
    pub async fn build(self) -> Result<Config> {
        let timeout = self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);
        let catalog: Arc<dyn Catalog> = match self.catalog {
            Some(c) => c,
            None => {
                let spotify = SpotifyClient::try_default()?;
                spotify.authorize_client().await?;
                Arc::new(spotify)
            }
        };
        let lyrics: Arc<dyn LyricsProvider> = match (self.lyrics, self.lyrics_url) {
            (Some(l), _) => l,
            (None, Some(url)) => Arc::new(LrclibClient::new(
                url,
                std::env::var("LYRICS_ACCESS_TOKEN").ok(),
                timeout,
            )?),
            (None, None) => Arc::new(LrclibClient::try_default()?),
        };
        let artwork: Arc<dyn ArtworkSource> = match self.artwork {
            Some(a) => a,
            None => Arc::new(HttpArtwork::new(timeout)?),
        };
        let recommend_limit = self.recommend_limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);
        if recommend_limit == 0 || recommend_limit > MAX_RECOMMEND_LIMIT {
            return Err(Error::ConfigurationError(format!(
                "recommendation limit must be between 1 and {MAX_RECOMMEND_LIMIT}, got {recommend_limit}"
            )));
        }
        Ok(Config {
            catalog,
            lyrics,
            artwork,
            recommend_limit,
            concurrency: DEFAULT_CONCURRENCY,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LyricsOutcome {
    Found(Lyrics),
    NotFound { title: String, artist: String },
    /// The provider failed, e.g. timed out or answered with a 5xx
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub track: Track,
    pub play_url: String,
    pub features: FeatureTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<LyricsOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub track: Track,
    #[serde(skip)]
    pub thumbnail: Option<Artwork>,
}

// Runs the lookups behind every page, CLI command and API endpoint
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Analyzer { config }
    }

    /// Resolve a title to the first catalog match. Empty titles never reach the catalog.
    pub async fn resolve(&self, title: &str) -> Result<Track> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("song title is empty".into()));
        }
        let track = self.config.catalog.search_track(title).await?;
        info!(
            "Resolved {title:?} to {} - {} ({})",
            track.name, track.artist.name, track.id
        );
        Ok(track)
    }

    pub async fn analyze(&self, track: &Track, with_lyrics: bool) -> Result<Analysis> {
        debug!("Fetching audio features for {}", track.id);
        let features = self.config.catalog.audio_features(&track.id).await?;
        let lyrics = if with_lyrics {
            Some(self.lyrics(track).await)
        } else {
            None
        };
        Ok(Analysis {
            play_url: track.play_url(),
            track: track.clone(),
            features: FeatureTable::new(&features),
            lyrics,
        })
    }

    /// Lyrics for the track's title and first artist.
    ///
    /// Lyrics are optional on every page, so neither a missing match nor a
    /// provider failure is returned as an error.
    pub async fn lyrics(&self, track: &Track) -> LyricsOutcome {
        match self
            .config
            .lyrics
            .lyrics(&track.name, &track.artist.name)
            .await
        {
            Ok(lyrics) => LyricsOutcome::Found(lyrics),
            Err(Error::LyricsNotFound { title, artist }) => {
                info!("No lyrics found for {title:?} by {artist:?}");
                LyricsOutcome::NotFound { title, artist }
            }
            Err(e) => {
                warn!("Error fetching lyrics for {:?}: {e}", track.name);
                LyricsOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Recommendations seeded by `track`, without thumbnails
    pub async fn recommended_tracks(&self, track: &Track, limit: Option<u32>) -> Result<Vec<Track>> {
        let limit = limit
            .unwrap_or(self.config.recommend_limit)
            .clamp(1, MAX_RECOMMEND_LIMIT);
        let tracks = self
            .config
            .catalog
            .recommendations(&track.id, limit)
            .await?;
        debug!("Catalog returned {} recommendations", tracks.len());

        // Providers are allowed to ignore the limit, the page is not
        Ok(tracks.into_iter().take(limit as usize).collect())
    }

    /// Recommendations with thumbnails, downloaded concurrently in list order
    pub async fn recommend(&self, track: &Track) -> Result<Vec<Recommendation>> {
        let tracks = self.recommended_tracks(track, None).await?;
        let recommendations = iter(tracks)
            .map(|t| async move {
                let thumbnail = self.artwork(t.thumbnail_url.as_deref()).await;
                Recommendation {
                    track: t,
                    thumbnail,
                }
            })
            .buffered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(recommendations)
    }

    /// Download an image into memory. Failures are logged and leave the image out.
    pub async fn artwork(&self, url: Option<&str>) -> Option<Artwork> {
        let url = url?;
        match self.config.artwork.fetch(url).await {
            Ok(art) => Some(art),
            Err(e) => {
                warn!("Error fetching artwork {url}: {e}");
                None
            }
        }
    }
}
