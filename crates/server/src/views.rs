//! Server-rendered pages: search with result grid, movie details, API keys.

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use moviematch_core::types::{CredentialKind, Credentials};
use moviematch_metadata::DetailRecord;
use moviematch_metadata::provider::SearchResult;
use moviematch_search::{Notice, NoticeLevel};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::state::AppState;

const PLACEHOLDER_POSTER: &str = "https://images.unsplash.com/photo-1478720568477-152d9b164e26?auto=format&fit=crop&w=600&q=80";

const SEARCH_HINT: &str = "Try searching for something like \"Interstellar but funnier\" or \"Something like The Godfather but set in modern times\"";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/movie/{id}", get(movie_page))
        .route("/settings", get(settings_page).post(save_settings))
}

/// Both keys are required when saved together. Returns field errors or `None`.
pub fn validate_key_pair(analysis_key: &str, metadata_key: &str) -> Option<Value> {
    let mut fields = serde_json::Map::new();
    if analysis_key.is_empty() {
        fields.insert("analysis_key".to_string(), json!(["must not be empty"]));
    }
    if metadata_key.is_empty() {
        fields.insert("metadata_key".to_string(), json!(["must not be empty"]));
    }

    if fields.is_empty() {
        None
    } else {
        Some(Value::Object(fields))
    }
}

// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct HomeQuery {
    q: Option<String>,
}

async fn home(State(state): State<AppState>, Query(params): Query<HomeQuery>) -> Html<String> {
    let Some(raw) = params.q else {
        return render_home("", &[], &hint_section());
    };

    let query = raw.trim();
    if query.is_empty() {
        let notice = Notice {
            level: NoticeLevel::Error,
            message: "Please enter a search query".to_string(),
        };
        return render_home("", &[notice], &hint_section());
    }

    let credentials = state.credentials.get().await;
    let outcome = state.search.search(query, &credentials).await;

    let section = if outcome.results.is_empty() {
        empty_section(query)
    } else {
        results_section(query, &outcome.results)
    };
    render_home(query, &outcome.notices, &section)
}

fn render_home(query: &str, notices: &[Notice], section: &str) -> Html<String> {
    let body = format!(
        r#"<section class="hero">
  <h1>Find Your Perfect Movie Match</h1>
  <p>Describe the movie you're looking for in natural language, and we'll find it for you.</p>
  <form class="search-bar" method="get" action="/">
    <input type="text" name="q" value="{value}" placeholder="Try 'Interstellar but funnier'" autofocus>
    <button type="submit">Search</button>
  </form>
</section>
{notices}
<section class="results">
{section}
</section>"#,
        value = escape(query),
        notices = render_notices(notices),
    );
    layout("Movie Match", &body)
}

fn hint_section() -> String {
    format!(r#"<p class="hint">{}</p>"#, escape(SEARCH_HINT))
}

fn empty_section(query: &str) -> String {
    format!(
        r#"<div class="empty-state">
  <h2>No results found for "{}"</h2>
  <p>Try a different description or be more specific about the type of movie you're looking for.</p>
</div>"#,
        escape(query)
    )
}

fn results_section(query: &str, results: &[SearchResult]) -> String {
    let cards: String = results.iter().map(movie_card).collect();
    format!(
        r#"<h2>Results for "{}"</h2>
<div class="movie-grid">
{cards}</div>"#,
        escape(query)
    )
}

fn movie_card(movie: &SearchResult) -> String {
    format!(
        r#"  <a class="movie-card" href="/movie/{id}">
    <img src="{poster}" alt="{title}" loading="lazy">
    <h3>{title}</h3>
    <span class="year">{year}</span>
  </a>
"#,
        id = escape(&movie.id),
        poster = escape(poster_or_placeholder(movie.poster.as_deref())),
        title = escape(&movie.title),
        year = escape(&movie.year),
    )
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            let class = match n.level {
                NoticeLevel::Info => "notice-info",
                NoticeLevel::Error => "notice-error",
            };
            format!(
                "<div class=\"notice {class}\">{}</div>\n",
                escape(&n.message)
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Details page
// ---------------------------------------------------------------------------

async fn movie_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    let credentials = state.credentials.get().await;
    match state
        .search
        .catalog()
        .get_details(&id, &credentials.metadata_key)
        .await
    {
        Some(detail) => (StatusCode::OK, render_detail(&detail)),
        None => (
            StatusCode::NOT_FOUND,
            layout(
                "Movie not found",
                r#"<div class="not-found"><h2>Movie not found</h2><a class="button" href="/">Return Home</a></div>"#,
            ),
        ),
    }
}

fn render_detail(movie: &DetailRecord) -> Html<String> {
    let mut facts = String::new();
    if let Some(rating) = &movie.imdb_rating {
        facts.push_str(&format!(
            "<div class=\"rating\"><strong>{}/10</strong> IMDb Rating</div>\n",
            escape(rating)
        ));
    }
    if let Some(runtime) = &movie.runtime {
        facts.push_str(&format!("<div class=\"runtime\">{}</div>\n", escape(runtime)));
    }
    if let Some(rated) = &movie.rated {
        facts.push_str(&format!("<span class=\"badge\">{}</span>\n", escape(rated)));
    }
    let genres = movie.genres();
    if !genres.is_empty() {
        facts.push_str(&format!("<div class=\"chips\">{}</div>\n", chips(&genres)));
    }
    for (label, value) in [
        ("Released", &movie.released),
        ("Director", &movie.director),
        ("Writer", &movie.writer),
    ] {
        if let Some(value) = value {
            facts.push_str(&format!(
                "<div><span class=\"label\">{label}: </span>{}</div>\n",
                escape(value)
            ));
        }
    }

    let mut main = String::new();
    if let Some(awards) = &movie.awards {
        main.push_str(&format!("<p class=\"awards\">{}</p>\n", escape(awards)));
    }
    main.push_str(&format!(
        "<h2>Overview</h2>\n<p class=\"plot\">{}</p>\n",
        escape(movie.plot.as_deref().unwrap_or_default())
    ));
    let cast = movie.cast();
    if !cast.is_empty() {
        main.push_str(&format!("<h2>Cast</h2>\n<div class=\"chips\">{}</div>\n", chips(&cast)));
    }

    let body = format!(
        r#"<header class="detail-hero">
  <a class="button" href="/">Back</a>
  <h1>{title} <span class="year">({year})</span></h1>
</header>
<div class="detail">
  <aside>
    <img src="{poster}" alt="{title}">
{facts}  </aside>
  <main>
{main}  </main>
</div>"#,
        title = escape(&movie.title),
        year = escape(&movie.year),
        poster = escape(poster_or_placeholder(movie.poster.as_deref())),
    );
    layout(&movie.title, &body)
}

fn chips(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<span class=\"chip\">{}</span>", escape(item)))
        .collect()
}

// ---------------------------------------------------------------------------
// API key settings
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SettingsForm {
    #[serde(default)]
    analysis_key: String,
    #[serde(default)]
    metadata_key: String,
}

async fn settings_page(State(state): State<AppState>) -> Html<String> {
    render_settings(&state.credentials.get().await, None)
}

async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> (StatusCode, Html<String>) {
    let analysis_key = form.analysis_key.trim();
    let metadata_key = form.metadata_key.trim();

    if validate_key_pair(analysis_key, metadata_key).is_some() {
        let notice = Notice {
            level: NoticeLevel::Error,
            message: "Please enter both API keys".to_string(),
        };
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            render_settings(&state.credentials.get().await, Some(notice)),
        );
    }

    let notice = match state.credentials.set_both(analysis_key, metadata_key).await {
        Ok(()) => Notice {
            level: NoticeLevel::Info,
            message: "API keys saved successfully".to_string(),
        },
        Err(e) => {
            warn!(error = %e, "failed to save API keys");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                render_settings(
                    &state.credentials.get().await,
                    Some(Notice {
                        level: NoticeLevel::Error,
                        message: "Failed to save API keys".to_string(),
                    }),
                ),
            );
        }
    };
    (
        StatusCode::OK,
        render_settings(&state.credentials.get().await, Some(notice)),
    )
}

fn render_settings(creds: &Credentials, notice: Option<Notice>) -> Html<String> {
    let status = |kind: CredentialKind| if creds.is_set(kind) { "set" } else { "not set" };
    let body = format!(
        r#"<h1>API Keys</h1>
{notices}<form class="settings" method="post" action="/settings">
  <label>Gemini API key ({analysis})
    <input type="password" name="analysis_key" autocomplete="off">
  </label>
  <label>OMDb API key ({metadata})
    <input type="password" name="metadata_key" autocomplete="off">
  </label>
  <button type="submit">Save</button>
</form>"#,
        notices = render_notices(notice.as_slice()),
        analysis = status(CredentialKind::Analysis),
        metadata = status(CredentialKind::Metadata),
    );
    layout("API Keys", &body)
}

// ---------------------------------------------------------------------------
// Shared markup
// ---------------------------------------------------------------------------

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Movie Match</a> <a href="/settings">API Keys</a></nav>
{body}
</body>
</html>"#,
        title = escape(title),
    ))
}

fn poster_or_placeholder(poster: Option<&str>) -> &str {
    poster.unwrap_or(PLACEHOLDER_POSTER)
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use moviematch_core::types::MediaType;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn card_uses_placeholder_without_poster() {
        let card = movie_card(&SearchResult {
            id: "tt0133093".into(),
            title: "The Matrix".into(),
            year: "1999".into(),
            poster: None,
            media_type: MediaType::Movie,
        });
        assert!(card.contains("href=\"/movie/tt0133093\""));
        assert!(card.contains(PLACEHOLDER_POSTER.split('&').next().unwrap()));
    }

    #[test]
    fn key_pair_validation_names_missing_fields() {
        assert!(validate_key_pair("g", "o").is_none());
        let fields = validate_key_pair("", "o").unwrap();
        assert!(fields.get("analysis_key").is_some());
        assert!(fields.get("metadata_key").is_none());
    }
}
