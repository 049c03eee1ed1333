use std::time::Duration;

use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::cache::tags::TagCache;
use crate::content::client::{fetch, ContentStore};
use crate::content::queries::NAVIGATION_AREAS_QUERY;
use crate::error::AppError;
use crate::navigation::menu::{build_navigation, NavigationAreas, STATIC_NAV};
use crate::revalidate::tags::CacheTag;

pub const NAVIGATION_CACHE_KEY: &str = "navigation";
pub const NAVIGATION_TTL: Duration = Duration::from_secs(86_400);

/// The header menu as JSON, served from the tag cache.
pub async fn load_navigation(
    cache: &TagCache,
    store: &dyn ContentStore,
) -> Result<serde_json::Value, AppError> {
    let tags = [CacheTag::Layout.as_str(), CacheTag::Politics.as_str()];
    cache
        .get_or_try_insert_with(NAVIGATION_CACHE_KEY, &tags, NAVIGATION_TTL, move || async move {
            let areas: NavigationAreas = fetch(store, NAVIGATION_AREAS_QUERY).await?;
            let menu = build_navigation(STATIC_NAV, &areas.geographical_areas, &areas.political_areas);
            serde_json::to_value(menu)
                .map_err(|e| AppError::Internal(format!("Failed to encode navigation: {e}")))
        })
        .await
}

/// Axum handler for `GET /api/navigation`.
pub async fn navigation_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    load_navigation(&state.cache, state.content_store.as_ref())
        .await
        .map(Json)
        .inspect_err(|err| tracing::error!("[navigation] {err}"))
}
