use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{info, warn};
use serde::{Deserialize, Deserializer};

use crate::analyzer::{Analysis, Analyzer};
use crate::clients::{
    entities::Track,
    errors::{Error, Result},
};
use crate::page::{Content, Mode, PageBody, PageForm, Sidebar, render_page};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub default_title: Arc<str>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, default_title: &str) -> Self {
        AppState {
            analyzer: Arc::new(analyzer),
            default_title: Arc::from(default_title),
        }
    }
}

// HTML checkboxes submit "on" when ticked and nothing otherwise
fn checkbox<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some("on" | "true" | "1")))
}

/// Query string of the song page
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub title: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, deserialize_with = "checkbox")]
    pub explain: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub preview: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub lyrics: bool,
}

impl PageQuery {
    /// A missing title falls back to the default; an empty one is kept and rejected later.
    pub fn into_form(self, default_title: &str) -> PageForm {
        PageForm {
            title: self.title.unwrap_or_else(|| default_title.to_string()),
            mode: self.mode,
            explain: self.explain,
            preview: self.preview,
            lyrics: self.lyrics,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiQuery {
    pub title: String,
    pub limit: Option<u32>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if matches!(self, Error::InvalidInput(_)) {
            StatusCode::BAD_REQUEST
        } else if self.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

async fn page_body(analyzer: &Analyzer, form: &PageForm) -> Result<PageBody> {
    let track = analyzer.resolve(&form.title).await?;

    let artwork = analyzer.artwork(track.image_url.as_deref());
    let content = async {
        let content = match form.mode {
            Mode::Analyze => Content::Analysis(analyzer.analyze(&track, form.lyrics).await?),
            Mode::Recommend => Content::Recommendations(analyzer.recommend(&track).await?),
        };
        Ok::<_, Error>(content)
    };
    let (artwork, content) = futures::join!(artwork, content);

    Ok(PageBody::Track {
        sidebar: Sidebar {
            album: track.album.clone(),
            artwork,
        },
        content: content?,
    })
}

/// Run one page request top to bottom and render the result.
///
/// Any failure ends up as a single message on the page.
pub async fn render(analyzer: &Analyzer, form: &PageForm) -> String {
    let body = match page_body(analyzer, form).await {
        Ok(body) => body,
        Err(e) => {
            if !e.is_not_found() && !matches!(e, Error::InvalidInput(_)) {
                warn!("Error rendering page for {:?}: {e:?}", form.title);
            }
            PageBody::Error(e.to_string())
        }
    };
    render_page(form, &body)
}

async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let form = query.into_form(&state.default_title);
    Html(render(&state.analyzer, &form).await)
}

async fn api_analyze(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<Analysis>> {
    let track = state.analyzer.resolve(&query.title).await?;
    Ok(Json(state.analyzer.analyze(&track, false).await?))
}

async fn api_recommend(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Json<Vec<Track>>> {
    let track = state.analyzer.resolve(&query.title).await?;
    Ok(Json(
        state
            .analyzer
            .recommended_tracks(&track, query.limit)
            .await?,
    ))
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/analyze", get(api_analyze))
        .route("/api/recommend", get(api_recommend))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving song page on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
