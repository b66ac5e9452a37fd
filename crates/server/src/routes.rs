use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use moviematch_core::error::ApiError;
use moviematch_core::types::{CredentialKind, Credentials};
use moviematch_metadata::DetailRecord;
use moviematch_metadata::provider::SearchResult;
use moviematch_search::{Notice, Strategy};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router().layer(CorsLayer::permissive()))
        .merge(crate::views::router())
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/credentials", get(get_credentials).put(put_credentials))
        .route("/credentials/{kind}", put(put_credential))
        .route("/search", post(search))
        .route("/movies/{id}", get(get_movie))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::Internal(format!("database check failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Which keys are configured. The keys themselves are never echoed back.
#[derive(Serialize)]
pub struct CredentialStatus {
    pub analysis_key_set: bool,
    pub metadata_key_set: bool,
    pub complete: bool,
}

impl From<&Credentials> for CredentialStatus {
    fn from(creds: &Credentials) -> Self {
        Self {
            analysis_key_set: creds.is_set(CredentialKind::Analysis),
            metadata_key_set: creds.is_set(CredentialKind::Metadata),
            complete: creds.is_complete(),
        }
    }
}

async fn get_credentials(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(CredentialStatus::from(&state.credentials.get().await))
}

#[derive(Deserialize)]
struct PutCredentialsRequest {
    #[serde(default)]
    analysis_key: String,
    #[serde(default)]
    metadata_key: String,
}

/// Replace both keys. Both are required, as on the key-entry form.
async fn put_credentials(
    State(state): State<AppState>,
    Json(body): Json<PutCredentialsRequest>,
) -> Result<Json<CredentialStatus>, AppError> {
    let analysis_key = body.analysis_key.trim();
    let metadata_key = body.metadata_key.trim();

    if let Some(fields) = crate::views::validate_key_pair(analysis_key, metadata_key) {
        return Err(ApiError::validation(fields).into());
    }

    state.credentials.set_both(analysis_key, metadata_key).await?;
    Ok(Json(CredentialStatus::from(&state.credentials.get().await)))
}

#[derive(Deserialize)]
struct PutCredentialRequest {
    value: String,
}

/// Replace a single key. Any value is accepted, including an empty one.
async fn put_credential(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<PutCredentialRequest>,
) -> Result<Json<CredentialStatus>, AppError> {
    let kind: CredentialKind = kind.parse().map_err(ApiError::NotFound)?;

    state.credentials.set(kind, body.value.trim()).await?;
    Ok(Json(CredentialStatus::from(&state.credentials.get().await)))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    /// Opaque client token echoed back so a client can drop stale responses.
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    request_id: Option<String>,
    strategy: Option<Strategy>,
    matched_query: Option<String>,
    notices: Vec<Notice>,
    results: Vec<SearchResult>,
}

async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Please enter a search query".into()).into());
    }

    info!(query, "search requested");
    let credentials = state.credentials.get().await;
    let outcome = state.search.search(query, &credentials).await;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        request_id: body.request_id,
        strategy: outcome.strategy,
        matched_query: outcome.matched_query,
        notices: outcome.notices,
        results: outcome.results,
    }))
}

// ---------------------------------------------------------------------------
// Movie details
// ---------------------------------------------------------------------------

async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailRecord>, AppError> {
    let credentials = state.credentials.get().await;
    let detail = state
        .search
        .catalog()
        .get_details(&id, &credentials.metadata_key)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("movie {id}")))?;

    Ok(Json(detail))
}
