use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tunescope::analyzer::{Analyzer, ConfigBuilder};
use tunescope::clients::{
    ArtworkSource, Catalog, LyricsProvider,
    entities::{Artist, Artwork, AudioFeatures, Lyrics, Track},
    errors::{Error, Result},
};
use tunescope::page::{Mode, PageForm};
use tunescope::server::render;

const WHATS_THE_USE_ID: &str = "5vqPKQbzOUB2a5Yjtbnb3x";

fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.into(),
        name: name.into(),
        album: "Swimming".into(),
        artist: Artist {
            name: artist.into(),
        },
        image_url: Some(format!("https://i.scdn.co/image/{id}-300")),
        thumbnail_url: Some(format!("https://i.scdn.co/image/{id}-64")),
        preview_url: Some(format!("https://p.scdn.co/mp3-preview/{id}")),
    }
}

/// Canned catalog: knows a single song and a fixed pool of recommendations
struct MockCatalog {
    recommendations: Vec<Track>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockCatalog {
    fn new(pool: usize) -> Self {
        MockCatalog {
            recommendations: (0..pool)
                .map(|i| track(&format!("rec{i}"), &format!("Song {i}"), &format!("Artist {i}")))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn search_track(&self, title: &str) -> Result<Track> {
        self.calls.lock().unwrap().push("search");
        if title.eq_ignore_ascii_case("What's the Use") {
            Ok(track(WHATS_THE_USE_ID, "What's the Use?", "Mac Miller"))
        } else {
            Err(Error::TrackNotFound(title.to_string()))
        }
    }

    async fn audio_features(&self, _track_id: &str) -> Result<AudioFeatures> {
        self.calls.lock().unwrap().push("features");
        Ok(AudioFeatures {
            acousticness: 0.13,
            danceability: 0.79,
            energy: 0.55,
            liveness: 0.12,
            speechiness: 0.18,
            valence: 0.62,
            tempo: 95.3,
        })
    }

    // ignores the limit on purpose, like a misbehaving provider
    async fn recommendations(&self, _seed: &str, _limit: u32) -> Result<Vec<Track>> {
        self.calls.lock().unwrap().push("recommendations");
        Ok(self.recommendations.clone())
    }
}

struct MockLyrics;

#[async_trait]
impl LyricsProvider for MockLyrics {
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Lyrics> {
        if artist == "Mac Miller" && title == "What's the Use?" {
            Ok(Lyrics {
                title: title.into(),
                artist: artist.into(),
                text: "What's the use?".into(),
                synced: false,
            })
        } else {
            Err(Error::LyricsNotFound {
                title: title.into(),
                artist: artist.into(),
            })
        }
    }
}

struct NoLyrics;

#[async_trait]
impl LyricsProvider for NoLyrics {
    async fn lyrics(&self, title: &str, artist: &str) -> Result<Lyrics> {
        Err(Error::LyricsNotFound {
            title: title.into(),
            artist: artist.into(),
        })
    }
}

/// Lyrics service that is down
struct BrokenLyrics;

#[async_trait]
impl LyricsProvider for BrokenLyrics {
    async fn lyrics(&self, _title: &str, _artist: &str) -> Result<Lyrics> {
        Err(Error::LyricsUnexpectedResponse("get returned 503".into()))
    }
}

struct MockArtwork;

#[async_trait]
impl ArtworkSource for MockArtwork {
    async fn fetch(&self, _url: &str) -> Result<Artwork> {
        Ok(Artwork::new("image/jpeg", vec![0xff, 0xd8, 0xff]))
    }
}

async fn analyzer(
    catalog: Arc<MockCatalog>,
    lyrics: Arc<dyn LyricsProvider>,
    limit: u32,
) -> Analyzer {
    let config = ConfigBuilder::new()
        .catalog(catalog)
        .lyrics(lyrics)
        .artwork(Arc::new(MockArtwork))
        .recommend_limit(limit)
        .build()
        .await
        .unwrap();
    Analyzer::new(config)
}

#[tokio::test]
async fn play_link_for_whats_the_use() {
    let catalog = Arc::new(MockCatalog::new(0));
    let analyzer = analyzer(catalog, Arc::new(MockLyrics), 5).await;

    let html = render(&analyzer, &PageForm::new("What's the Use")).await;

    let expected = format!("https://open.spotify.com/track/{WHATS_THE_USE_ID}");
    assert!(html.contains(&format!("Play: <a href=\"{expected}\">{expected}</a>")));
    assert!(html.contains("BPM: 95.3"));
    assert!(html.contains("<figcaption>Swimming</figcaption>"));
    assert!(html.contains("data:image/jpeg;base64,/9j/"));
}

#[tokio::test]
async fn unknown_title_shows_one_error_and_stops() {
    let catalog = Arc::new(MockCatalog::new(3));
    let analyzer = analyzer(catalog.clone(), Arc::new(MockLyrics), 5).await;

    let html = render(&analyzer, &PageForm::new("No Such Song")).await;

    assert_eq!(html.matches(r#"class="error""#).count(), 1);
    assert!(html.contains("No track found matching &quot;No Such Song&quot;"));
    assert!(!html.contains("<svg"));
    assert_eq!(catalog.calls(), vec!["search"]);
}

#[tokio::test]
async fn empty_title_never_searches() {
    let catalog = Arc::new(MockCatalog::new(3));
    let analyzer = analyzer(catalog.clone(), Arc::new(MockLyrics), 5).await;

    let html = render(&analyzer, &PageForm::new("  ")).await;

    assert!(html.contains("Invalid input: song title is empty"));
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn recommendations_respect_limit_and_first_artist() {
    for limit in [1, 5, 10] {
        let catalog = Arc::new(MockCatalog::new(12));
        let analyzer = analyzer(catalog, Arc::new(MockLyrics), limit).await;
        let mut form = PageForm::new("What's the Use");
        form.mode = Mode::Recommend;

        let html = render(&analyzer, &form).await;

        let entries = html.matches(r#"<li class="recommendation">"#).count();
        assert_eq!(entries, limit as usize);
        for i in 0..entries {
            assert!(html.contains(&format!("&quot;Song {i}&quot; - Artist {i}</span>")));
        }
        assert!(!html.contains("<svg"));
    }
}

#[tokio::test]
async fn fewer_recommendations_than_limit() {
    let catalog = Arc::new(MockCatalog::new(2));
    let analyzer = analyzer(catalog, Arc::new(MockLyrics), 5).await;
    let mut form = PageForm::new("What's the Use");
    form.mode = Mode::Recommend;

    let html = render(&analyzer, &form).await;

    assert_eq!(html.matches(r#"<li class="recommendation">"#).count(), 2);
}

#[tokio::test]
async fn lyrics_shown_when_requested() {
    let catalog = Arc::new(MockCatalog::new(0));
    let analyzer = analyzer(catalog, Arc::new(MockLyrics), 5).await;
    let mut form = PageForm::new("What's the Use");
    form.lyrics = true;

    let html = render(&analyzer, &form).await;

    assert!(html.contains(r#"<pre class="lyrics">What&#39;s the use?</pre>"#));
}

#[tokio::test]
async fn missing_lyrics_reported_not_failed() {
    let catalog = Arc::new(MockCatalog::new(0));
    let analyzer = analyzer(catalog, Arc::new(NoLyrics), 5).await;
    let mut form = PageForm::new("What's the Use");
    form.lyrics = true;

    let html = render(&analyzer, &form).await;

    assert!(html.contains("Lyrics not found for &quot;What&#39;s the Use?&quot; by Mac Miller."));
    // the rest of the analysis still renders
    assert!(html.contains("<svg"));
}

#[tokio::test]
async fn lyrics_outage_keeps_chart() {
    let catalog = Arc::new(MockCatalog::new(0));
    let analyzer = analyzer(catalog, Arc::new(BrokenLyrics), 5).await;
    let mut form = PageForm::new("What's the Use");
    form.lyrics = true;

    let html = render(&analyzer, &form).await;

    assert!(html.contains("<svg"));
    assert!(html.contains("BPM: 95.3"));
    assert!(html.contains("Lyrics unavailable: "));
    assert!(html.contains("get returned 503"));
    assert_eq!(html.matches(r#"class="error""#).count(), 1);
}
