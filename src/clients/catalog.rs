use async_trait::async_trait;

use crate::clients::{
    entities::{Artwork, AudioFeatures, Lyrics, Track},
    errors::Result,
};

/// Read-only access to a music catalog.
///
/// The page and CLI only talk to the catalog through this trait, so tests can
/// swap in canned responses.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve a free-text title to the first matching track.
    ///
    /// Returns [`Error::TrackNotFound`](crate::clients::errors::Error::TrackNotFound)
    /// when the search has no results.
    async fn search_track(&self, title: &str) -> Result<Track>;

    async fn audio_features(&self, track_id: &str) -> Result<AudioFeatures>;

    /// Tracks similar to the seed track, at most `limit` of them.
    async fn recommendations(&self, seed_track_id: &str, limit: u32) -> Result<Vec<Track>>;
}

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Returns [`Error::LyricsNotFound`](crate::clients::errors::Error::LyricsNotFound)
    /// when the provider has no match for the pair.
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Lyrics>;
}

#[async_trait]
pub trait ArtworkSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Artwork>;
}
