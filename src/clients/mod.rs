/// HTTP download of album art into memory
pub mod artwork;
/// Capability traits implemented by the service clients
pub mod catalog;
/// Data entities for tracks, features and lyrics
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// LRCLIB lyrics client
pub mod lyrics;
/// Spotify API client
pub mod spotify;

pub use artwork::HttpArtwork;
pub use catalog::{ArtworkSource, Catalog, LyricsProvider};
pub use lyrics::LrclibClient;
pub use spotify::SpotifyClient;
