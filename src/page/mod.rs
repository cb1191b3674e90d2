//! HTML rendering for the song page.
//!
//! Everything here is pure string building; the data is fetched beforehand by
//! [`Analyzer`](crate::analyzer::Analyzer).

/// SVG bar chart of the feature table
pub mod chart;

use serde::Deserialize;

use crate::analyzer::{Analysis, LyricsOutcome, Recommendation};
use crate::clients::entities::Artwork;
use crate::features::Feature;

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; }
aside.sidebar { width: 260px; padding: 1rem; background: #f0f2f6; min-height: 100vh; }
aside.sidebar img { width: 100%; }
main { padding: 1rem 2rem; max-width: 760px; }
form { display: flex; flex-wrap: wrap; gap: .75rem; align-items: center; }
.error { color: #b00020; }
ul.recommendations { list-style: none; padding: 0; }
ul.recommendations li { display: flex; align-items: center; gap: .75rem; margin: .5rem 0; }
pre.lyrics { white-space: pre-wrap; }
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Analyze,
    Recommend,
}

/// What the user asked for on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageForm {
    pub title: String,
    pub mode: Mode,
    pub explain: bool,
    pub preview: bool,
    pub lyrics: bool,
}

impl PageForm {
    pub fn new(title: impl Into<String>) -> Self {
        PageForm {
            title: title.into(),
            mode: Mode::default(),
            explain: false,
            preview: false,
            lyrics: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sidebar {
    pub album: String,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Analysis(Analysis),
    Recommendations(Vec<Recommendation>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Error(String),
    Track { sidebar: Sidebar, content: Content },
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn checked(on: bool) -> &'static str {
    if on { " checked" } else { "" }
}

fn selected(on: bool) -> &'static str {
    if on { " selected" } else { "" }
}

fn render_form(form: &PageForm) -> String {
    format!(
        r#"<form method="get" action="/">
<label>Enter a song title <input type="text" name="title" value="{title}"></label>
<label>Display <select name="mode"><option value="analyze"{analyze}>Analyze</option><option value="recommend"{recommend}>Recommend</option></select></label>
<label><input type="checkbox" name="explain"{explain}> What do these mean?</label>
<label><input type="checkbox" name="preview"{preview}> Preview audio</label>
<label><input type="checkbox" name="lyrics"{lyrics}> Show lyrics</label>
<button type="submit">Go</button>
</form>"#,
        title = escape(&form.title),
        analyze = selected(form.mode == Mode::Analyze),
        recommend = selected(form.mode == Mode::Recommend),
        explain = checked(form.explain),
        preview = checked(form.preview),
        lyrics = checked(form.lyrics),
    )
}

fn render_sidebar(sidebar: &Sidebar) -> String {
    match &sidebar.artwork {
        Some(art) => format!(
            r#"<figure><img src="{}" alt="{album}"><figcaption>{album}</figcaption></figure>"#,
            art.data_uri(),
            album = escape(&sidebar.album)
        ),
        None => format!(
            r#"<figure><figcaption>{}</figcaption></figure>"#,
            escape(&sidebar.album)
        ),
    }
}

fn render_explanations() -> String {
    let mut html = String::from(r#"<dl class="explain">"#);
    for feature in Feature::ALL {
        html.push_str(&format!(
            "<dt><strong>{}</strong></dt><dd>{}</dd>",
            feature.label(),
            escape(feature.description())
        ));
    }
    html.push_str("</dl>");
    html
}

fn render_lyrics(outcome: &LyricsOutcome) -> String {
    match outcome {
        LyricsOutcome::Found(lyrics) => format!(
            r#"<section class="lyrics"><h2>Lyrics</h2><pre class="lyrics">{}</pre></section>"#,
            escape(&lyrics.text)
        ),
        LyricsOutcome::NotFound { title, artist } => format!(
            r#"<p class="error">{}</p>"#,
            escape(&format!("Lyrics not found for \"{title}\" by {artist}."))
        ),
        LyricsOutcome::Unavailable { reason } => format!(
            r#"<p class="error">{}</p>"#,
            escape(&format!("Lyrics unavailable: {reason}"))
        ),
    }
}

fn render_analysis(form: &PageForm, analysis: &Analysis) -> String {
    let mut html = format!(
        r#"<p class="play">Play: <a href="{url}">{url}</a></p><p class="bpm">{bpm}</p>"#,
        url = escape(&analysis.play_url),
        bpm = analysis.features.bpm_label()
    );
    html.push_str(&chart::render_chart(&form.title, &analysis.features));
    if form.explain {
        html.push_str(&render_explanations());
    }
    if form.preview {
        match &analysis.track.preview_url {
            Some(url) => html.push_str(&format!(
                r#"<audio class="preview" controls src="{}"></audio>"#,
                escape(url)
            )),
            None => html.push_str(r#"<p class="note">No preview available for this track.</p>"#),
        }
    }
    if let Some(outcome) = &analysis.lyrics {
        html.push_str(&render_lyrics(outcome));
    }
    html
}

fn render_recommendations(recommendations: &[Recommendation]) -> String {
    let mut html = String::from(r#"<h2>Recommendations</h2><ul class="recommendations">"#);
    for rec in recommendations {
        let thumbnail = rec
            .thumbnail
            .as_ref()
            .map(|art| format!(r#"<img src="{}" width="64" height="64" alt="">"#, art.data_uri()))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<li class="recommendation">{thumbnail}<span>{}</span></li>"#,
            escape(&format!("\"{}\" - {}", rec.track.name, rec.track.artist.name))
        ));
    }
    html.push_str("</ul>");
    html
}

/// Full HTML document for one page request
pub fn render_page(form: &PageForm, body: &PageBody) -> String {
    let (sidebar, content) = match body {
        PageBody::Error(message) => (
            String::new(),
            format!(r#"<p class="error">{}</p>"#, escape(message)),
        ),
        PageBody::Track { sidebar, content } => (
            render_sidebar(sidebar),
            match content {
                Content::Analysis(analysis) => render_analysis(form, analysis),
                Content::Recommendations(recs) => render_recommendations(recs),
            },
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Spotify Song Analyzer</title>
<style>{STYLE}</style>
</head>
<body>
<aside class="sidebar">{sidebar}</aside>
<main>
<h1>Spotify Song Analyzer</h1>
<p>Input a song title and the app will return the features of the song as well as recommendations.</p>
{form}
{content}
</main>
</body>
</html>
"#,
        form = render_form(form),
    )
}
