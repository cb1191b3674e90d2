//! Tunescope - look up a song on Spotify and chart it
//!
//! This library resolves a free-text song title to a Spotify track, fetches its
//! audio features, similar tracks and lyrics, and renders them as an HTML page
//! with an SVG bar chart.

/// Orchestration of the lookups behind a page request
pub mod analyzer;
/// Client modules for interacting with external services
pub mod clients;
/// Ordered feature table and chart axis
pub mod features;
/// HTML and SVG rendering
pub mod page;
/// HTTP server exposing the page and a JSON API
pub mod server;
