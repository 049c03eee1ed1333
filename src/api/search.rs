use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::cache::tags::TagCache;
use crate::content::client::ContentStore;
use crate::error::AppError;
use crate::search::models::{EntityKind, RankedResult};
use crate::search::service;

/// Cache key of the exported index in the tag cache.
pub const SEARCH_INDEX_CACHE_KEY: &str = "search-index";
pub const SEARCH_INDEX_TTL: Duration = Duration::from_secs(86_400);
pub const SEARCH_INDEX_CACHE_CONTROL: &str =
    "public, s-maxage=86400, stale-while-revalidate=86400";

/// Tags whose revalidation must expire the export: one per searchable kind.
fn search_index_tags() -> Vec<&'static str> {
    let mut tags = Vec::new();
    for tag in EntityKind::ALL.map(EntityKind::cache_tag) {
        if !tags.contains(&tag.as_str()) {
            tags.push(tag.as_str());
        }
    }
    tags
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<RankedResult>,
}

/// Axum handler for `GET /api/search?q=`.
///
/// Failures never surface as faults: they are logged and rendered as
/// `500 { error, results: [] }`. An unparseable query string counts as no
/// query.
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let query = match params {
        Ok(Query(params)) => params.q,
        Err(rejection) => {
            tracing::debug!("[search] ignoring malformed query string: {rejection}");
            None
        }
    };

    match service::search(state.content_store.as_ref(), query.as_deref()).await {
        Ok(results) => Json(SearchResponse { results }).into_response(),
        Err(err) => {
            tracing::error!("[search] {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Search failed",
                    "results": []
                })),
            )
                .into_response()
        }
    }
}

/// Normalized export of every searchable entity, served from the tag cache.
pub async fn load_search_index(
    cache: &TagCache,
    store: &dyn ContentStore,
) -> Result<serde_json::Value, AppError> {
    let tags = search_index_tags();
    cache
        .get_or_try_insert_with(SEARCH_INDEX_CACHE_KEY, &tags, SEARCH_INDEX_TTL, move || async move {
            let entities = service::fetch_searchable_entities(store).await?;
            tracing::info!(entities = entities.len(), "search index rebuilt");
            serde_json::to_value(entities)
                .map_err(|e| AppError::Internal(format!("Failed to encode search index: {e}")))
        })
        .await
}

/// Axum handler for `GET /api/search-index`.
pub async fn search_index_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let index = load_search_index(&state.cache, state.content_store.as_ref())
        .await
        .inspect_err(|err| tracing::error!("[search-index] {err}"))?;

    Ok((
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static(SEARCH_INDEX_CACHE_CONTROL),
        )],
        Json(index),
    )
        .into_response())
}
