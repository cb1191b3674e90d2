use rspotify::ClientError;
use rspotify::model::IdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse response data, error: {0}")]
    ParseError(String),

    #[error("No track found matching \"{0}\"")]
    TrackNotFound(String),

    #[error("No lyrics found for \"{title}\" by {artist}")]
    LyricsNotFound { title: String, artist: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Lyrics API unexpected response: {0}")]
    LyricsUnexpectedResponse(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether the error means "nothing matched" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TrackNotFound(_) | Error::LyricsNotFound { .. })
    }

    /// Whether the error was caused by a third-party service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::SpotifyError(_) | Error::HttpError(_) | Error::LyricsUnexpectedResponse(_)
        )
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<IdError> for Error {
    fn from(err: IdError) -> Self {
        Error::ParseError(format!("invalid Spotify id: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
