use std::fmt::Write as _;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use tunescope::analyzer::{
    Analysis, Analyzer, ConfigBuilder, DEFAULT_RECOMMEND_LIMIT, DEFAULT_TITLE, LyricsOutcome,
};
use tunescope::clients::{LrclibClient, entities::Track, errors::Result};
use tunescope::server::{self, AppState};

#[derive(Parser)]
#[command(name = "tunescope")]
#[command(version, about = "Chart a song's Spotify audio features, recommendations and lyrics", long_about = None)]
struct Cli {
    /// Number of recommended tracks to show
    #[arg(long, global = true, env = "TUNESCOPE_RECOMMEND_LIMIT", default_value_t = DEFAULT_RECOMMEND_LIMIT)]
    recommend_limit: u32,

    /// Base URL of the LRCLIB API
    #[arg(long, global = true, env = "TUNESCOPE_LYRICS_URL", default_value = LrclibClient::DEFAULT_BASE_URL)]
    lyrics_url: String,

    /// Timeout for lyrics and artwork requests
    #[arg(long, global = true, env = "TUNESCOPE_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the song page over HTTP
    Serve {
        #[arg(long, env = "TUNESCOPE_ADDR", default_value = "127.0.0.1:8501")]
        addr: String,
        /// Title searched when the page is opened without one
        #[arg(long, env = "TUNESCOPE_DEFAULT_TITLE", default_value = DEFAULT_TITLE)]
        default_title: String,
    },
    /// Print the audio features of the first track matching TITLE
    Analyze { title: String },
    /// Print tracks similar to the first track matching TITLE
    Recommend {
        title: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the lyrics of the first track matching TITLE
    Lyrics { title: String },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    info!("Building config ...");
    let config = ConfigBuilder::new()
        .recommend_limit(cli.recommend_limit)
        .lyrics_url(cli.lyrics_url)
        .http_timeout(Duration::from_secs(cli.http_timeout_secs))
        .build()
        .await?;
    let analyzer = Analyzer::new(config);

    match cli.command {
        Commands::Serve {
            addr,
            default_title,
        } => server::serve(&addr, AppState::new(analyzer, &default_title)).await,
        Commands::Analyze { title } => {
            let track = analyzer.resolve(&title).await?;
            let analysis = analyzer.analyze(&track, false).await?;
            print!("{}", format_analysis(&analysis));
            Ok(())
        }
        Commands::Recommend { title, limit } => {
            let track = analyzer.resolve(&title).await?;
            let tracks = analyzer.recommended_tracks(&track, limit).await?;
            print!("{}", format_recommendations(&tracks));
            Ok(())
        }
        Commands::Lyrics { title } => {
            let track = analyzer.resolve(&title).await?;
            let outcome = analyzer.lyrics(&track).await;
            print!("{}", format_lyrics(&outcome));
            Ok(())
        }
    }
}

fn format_analysis(analysis: &Analysis) -> String {
    let track = &analysis.track;
    let mut out = format!(
        "\"{}\" - {} ({})\nPlay: {}\n",
        track.name, track.artist.name, track.album, analysis.play_url
    );
    for row in &analysis.features.rows {
        let _ = writeln!(out, "{:<14}{:.3}", row.feature.as_str(), row.value);
    }
    let _ = writeln!(out, "{}", analysis.features.bpm_label());
    out
}

fn format_recommendations(tracks: &[Track]) -> String {
    tracks
        .iter()
        .map(|t| format!("\"{}\" - {}\n", t.name, t.artist.name))
        .collect()
}

fn format_lyrics(outcome: &LyricsOutcome) -> String {
    match outcome {
        LyricsOutcome::Found(lyrics) => format!("{}\n", lyrics.text.trim_end()),
        LyricsOutcome::NotFound { title, artist } => {
            format!("Lyrics not found for \"{title}\" by {artist}.\n")
        }
        LyricsOutcome::Unavailable { reason } => format!("Lyrics unavailable: {reason}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunescope::clients::entities::{Artist, AudioFeatures};
    use tunescope::features::FeatureTable;

    fn track(name: &str, artist: &str) -> Track {
        Track {
            id: "5vqPKQbzOUB2a5Yjtbnb3x".into(),
            name: name.into(),
            album: "Swimming".into(),
            artist: Artist {
                name: artist.into(),
            },
            image_url: None,
            thumbnail_url: None,
            preview_url: None,
        }
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from(["tunescope", "recommend", "Dang!", "--limit", "10"]).unwrap();
        match cli.command {
            Commands::Recommend { title, limit } => {
                assert_eq!(title, "Dang!");
                assert_eq!(limit, Some(10));
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_format_analysis() {
        let track = track("What's the Use?", "Mac Miller");
        let analysis = Analysis {
            play_url: track.play_url(),
            features: FeatureTable::new(&AudioFeatures {
                acousticness: 0.1,
                danceability: 0.2,
                energy: 0.3,
                liveness: 0.4,
                speechiness: 0.5,
                valence: 0.6,
                tempo: 96.04,
            }),
            track,
            lyrics: None,
        };
        let out = format_analysis(&analysis);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "\"What's the Use?\" - Mac Miller (Swimming)");
        assert_eq!(lines[1], "Play: https://open.spotify.com/track/5vqPKQbzOUB2a5Yjtbnb3x");
        assert_eq!(lines[2], "acousticness  0.100");
        assert_eq!(lines[7], "valence       0.600");
        assert_eq!(lines[8], "BPM: 96.0");
    }

    #[test]
    fn test_format_recommendations() {
        let out = format_recommendations(&[
            track("Self Care", "Mac Miller"),
            track("Milk n' Honey", "Anderson .Paak"),
        ]);
        assert_eq!(out, "\"Self Care\" - Mac Miller\n\"Milk n' Honey\" - Anderson .Paak\n");
    }

    #[test]
    fn test_format_lyrics_not_found() {
        let out = format_lyrics(&LyricsOutcome::NotFound {
            title: "Ladders".into(),
            artist: "Mac Miller".into(),
        });
        assert_eq!(out, "Lyrics not found for \"Ladders\" by Mac Miller.\n");
    }

    #[test]
    fn test_format_lyrics_unavailable() {
        let out = format_lyrics(&LyricsOutcome::Unavailable {
            reason: "timed out".into(),
        });
        assert_eq!(out, "Lyrics unavailable: timed out\n");
    }
}
