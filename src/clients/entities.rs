use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

const TRACK_URL_PREFIX: &str = "https://open.spotify.com/track/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub album: String,
    pub artist: Artist, // first listed artist only
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
}

impl Track {
    /// Public Spotify web player link for this track
    pub fn play_url(&self) -> String {
        format!("{TRACK_URL_PREFIX}{}", self.id)
    }
}

/// Audio analysis scores for a single track.
///
/// All fields except `tempo` are in `0.0..=1.0`. `tempo` is in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub acousticness: f64,
    pub danceability: f64,
    pub energy: f64,
    pub liveness: f64,
    pub speechiness: f64,
    pub valence: f64,
    pub tempo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lyrics {
    pub title: String,
    pub artist: String,
    pub text: String,
    /// `text` is in LRC format with timestamps
    pub synced: bool,
}

/// Downloaded image kept in memory until the page is rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Artwork {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Artwork {
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}
