use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::clients::{
    catalog::Catalog,
    entities::{Artist, AudioFeatures, Track},
    errors::{Error, Result},
};
use rspotify::{
    ClientCredsSpotify, Config, Credentials,
    model::{
        ArtistId, AudioFeatures as SpotifyAudioFeatures, FullTrack, Image,
        RecommendationsAttribute, SearchResult, SearchType, SimplifiedArtist, SimplifiedTrack,
        TrackId,
    },
    prelude::*,
};

// Spotify lists album images largest first: 640px, 300px, 64px
const ALBUM_IMAGE_INDEX: usize = 1;
const THUMBNAIL_IMAGE_INDEX: usize = 2;
const SEARCH_LIMIT: u32 = 1;

fn pick_image(images: &[Image], index: usize) -> Option<String> {
    images
        .get(index)
        .or_else(|| images.last())
        .map(|image| image.url.clone())
}

fn first_artist(artists: &[SimplifiedArtist]) -> Artist {
    Artist {
        name: artists
            .first()
            .map(|artist| artist.name.clone())
            .unwrap_or_default(),
    }
}

impl TryFrom<FullTrack> for Track {
    type Error = Error;

    fn try_from(f: FullTrack) -> Result<Track> {
        let id = f
            .id
            .ok_or_else(|| Error::ParseError(format!("track \"{}\" has no Spotify id", f.name)))?;
        Ok(Track {
            id: id.id().to_string(),
            artist: first_artist(&f.artists),
            image_url: pick_image(&f.album.images, ALBUM_IMAGE_INDEX),
            thumbnail_url: pick_image(&f.album.images, THUMBNAIL_IMAGE_INDEX),
            album: f.album.name,
            name: f.name,
            preview_url: f.preview_url,
        })
    }
}

impl TryFrom<SimplifiedTrack> for Track {
    type Error = Error;

    fn try_from(s: SimplifiedTrack) -> Result<Track> {
        let id = s
            .id
            .ok_or_else(|| Error::ParseError(format!("track \"{}\" has no Spotify id", s.name)))?;
        let (album, images) = match s.album {
            Some(album) => (album.name, album.images),
            None => (String::new(), Vec::new()),
        };
        Ok(Track {
            id: id.id().to_string(),
            artist: first_artist(&s.artists),
            image_url: pick_image(&images, ALBUM_IMAGE_INDEX),
            thumbnail_url: pick_image(&images, THUMBNAIL_IMAGE_INDEX),
            album,
            name: s.name,
            preview_url: s.preview_url,
        })
    }
}

impl From<SpotifyAudioFeatures> for AudioFeatures {
    fn from(f: SpotifyAudioFeatures) -> AudioFeatures {
        AudioFeatures {
            acousticness: f64::from(f.acousticness),
            danceability: f64::from(f.danceability),
            energy: f64::from(f.energy),
            liveness: f64::from(f.liveness),
            speechiness: f64::from(f.speechiness),
            valence: f64::from(f.valence),
            tempo: f64::from(f.tempo),
        }
    }
}

/// Take the first track of a search result, whatever it is.
///
/// No ranking is applied: the catalog's own ordering decides which track wins.
pub fn first_track(result: SearchResult, title: &str) -> Result<Track> {
    match result {
        SearchResult::Tracks(page) => page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::TrackNotFound(title.to_string()))
            .and_then(Track::try_from),
        _ => Err(Error::ParseError(
            "track search returned a non-track result".into(),
        )),
    }
}

pub struct SpotifyClient {
    pub spotify: ClientCredsSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: ClientCredsSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Request an app token via the client credentials flow. No user login is involved.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Requesting Spotify client credentials token ...");
        self.spotify.request_token().await?;
        debug!("Spotify token acquired");
        Ok(())
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = credentials_from_env()?;

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".tunescope_token_cache");

        let spotify = ClientCredsSpotify::with_config(
            creds,
            Config {
                token_cached: true,
                token_refreshing: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { spotify })
    }
}

// rspotify's RSPOTIFY_CLIENT_ID/RSPOTIFY_CLIENT_SECRET first, then the plain client_id/client_secret pair
fn credentials_from_env() -> Result<Credentials> {
    if let Some(creds) = Credentials::from_env() {
        return Ok(creds);
    }
    let missing = || {
        Error::ConfigurationError(
            "Missing Spotify credentials: set RSPOTIFY_CLIENT_ID and RSPOTIFY_CLIENT_SECRET".into(),
        )
    };
    let id = std::env::var("client_id").map_err(|_| missing())?;
    let secret = std::env::var("client_secret").map_err(|_| missing())?;
    Ok(Credentials::new(&id, &secret))
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search_track(&self, title: &str) -> Result<Track> {
        let query = format!("track:{title}");
        debug!("Searching Spotify for {query:?}");
        let result = self
            .spotify
            .search(&query, SearchType::Track, None, None, Some(SEARCH_LIMIT), None)
            .await?;
        first_track(result, title)
    }

    async fn audio_features(&self, track_id: &str) -> Result<AudioFeatures> {
        let id = TrackId::from_id(track_id)?;
        #[allow(deprecated)]
        let features = self.spotify.track_features(id).await?;
        Ok(AudioFeatures::from(features))
    }

    async fn recommendations(&self, seed_track_id: &str, limit: u32) -> Result<Vec<Track>> {
        let seed = TrackId::from_id(seed_track_id)?;
        debug!("Fetching up to {limit} recommendations for {seed_track_id}");
        #[allow(deprecated)]
        let response = self
            .spotify
            .recommendations(
                Vec::<RecommendationsAttribute>::new(),
                None::<Vec<ArtistId>>,
                None::<Vec<&str>>,
                Some(vec![seed]),
                None,
                Some(limit),
            )
            .await?;
        response.tracks.into_iter().map(Track::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rspotify::model::Page;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct SearchBody {
        tracks: Page<FullTrack>,
    }

    #[derive(Deserialize)]
    struct RecommendationsBody {
        tracks: Vec<SimplifiedTrack>,
    }

    fn search_fixture(raw: &str) -> SearchResult {
        let body: SearchBody = serde_json::from_str(raw).unwrap();
        SearchResult::Tracks(body.tracks)
    }

    #[test]
    fn test_first_track_fields_unchanged() {
        let result = search_fixture(include_str!("../../tests/fixtures/search_whats_the_use.json"));
        let track = first_track(result, "What's the Use").unwrap();

        assert_eq!(track.id, "5vqPKQbzOUB2a5Yjtbnb3x");
        assert_eq!(track.name, "What's the Use?");
        assert_eq!(track.album, "Swimming");
        assert_eq!(track.artist.name, "Mac Miller");
        assert_eq!(
            track.image_url.as_deref(),
            Some("https://i.scdn.co/image/ab67616d00001e02swimming300")
        );
        assert_eq!(
            track.thumbnail_url.as_deref(),
            Some("https://i.scdn.co/image/ab67616d00004851swimming64")
        );
    }

    #[test]
    fn test_first_track_ignores_later_matches() {
        let result = search_fixture(include_str!("../../tests/fixtures/search_whats_the_use.json"));
        let track = first_track(result, "What's the Use").unwrap();
        assert_ne!(track.id, "1rHrmrxRlPaLkXqHVTcFVb");
    }

    #[test]
    fn test_play_url_from_search() {
        let result = search_fixture(include_str!("../../tests/fixtures/search_whats_the_use.json"));
        let track = first_track(result, "What's the Use").unwrap();
        assert_eq!(
            track.play_url(),
            "https://open.spotify.com/track/5vqPKQbzOUB2a5Yjtbnb3x"
        );
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let result = search_fixture(include_str!("../../tests/fixtures/search_empty.json"));
        match first_track(result, "zzzz no such song") {
            Err(Error::TrackNotFound(title)) => assert_eq!(title, "zzzz no such song"),
            other => panic!("expected TrackNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendations_use_first_artist() {
        let body: RecommendationsBody =
            serde_json::from_str(include_str!("../../tests/fixtures/recommendations.json")).unwrap();
        let tracks: Vec<Track> = body
            .tracks
            .into_iter()
            .map(Track::try_from)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "Self Care");
        assert_eq!(tracks[0].artist.name, "Mac Miller");
        assert_eq!(tracks[1].artist.name, "Anderson .Paak");
        assert_eq!(
            tracks[1].thumbnail_url.as_deref(),
            Some("https://i.scdn.co/image/ab67616d00004851venice64")
        );
    }

    #[test]
    fn test_pick_image_falls_back_to_last() {
        let images: Vec<Image> = serde_json::from_str(
            r#"[{"height": 640, "url": "https://i.scdn.co/image/big", "width": 640}]"#,
        )
        .unwrap();
        assert_eq!(
            pick_image(&images, THUMBNAIL_IMAGE_INDEX).as_deref(),
            Some("https://i.scdn.co/image/big")
        );
        assert_eq!(pick_image(&[], ALBUM_IMAGE_INDEX), None);
    }
}
