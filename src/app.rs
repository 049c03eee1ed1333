use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::cache::tags::TagCache;
use crate::config::AppConfig;
use crate::contact::mailer::{Mailer, ResendMailer};
use crate::content::client::{ContentStore, SanityClient};
use crate::error::AppError;

/// Contact submissions allowed per client before throttling.
pub const CONTACT_BURST: u32 = 5;
/// Seconds until one more contact submission is allowed.
pub const CONTACT_REPLENISH_SECS: u64 = 180;

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub content_store: Arc<dyn ContentStore>,
    pub cache: Arc<TagCache>,
    /// `None` when no mail API key is configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let content_store: Arc<dyn ContentStore> = Arc::new(SanityClient::from_config(&config)?);
        let mailer = ResendMailer::from_config(&config)?.map(|m| Arc::new(m) as Arc<dyn Mailer>);

        if config.revalidate_secret().is_none() {
            tracing::warn!("SANITY_REVALIDATE_SECRET is not set; revalidation requests will fail");
        }
        if mailer.is_none() {
            tracing::warn!("RESEND_API_KEY is not set; contact form submissions will fail");
        }

        Ok(Self {
            content_store,
            cache: Arc::new(TagCache::new()),
            mailer,
            config: Arc::new(config),
        })
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Build the HTTP router with every route and middleware layer.
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let governor = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(CONTACT_REPLENISH_SECS)
        .burst_size(CONTACT_BURST)
        .finish()
        .ok_or_else(|| AppError::Configuration("Invalid contact rate limit".into()))?;

    let contact = post(api::contact::contact_handler)
        .layer(GovernorLayer::new(Arc::new(governor)))
        .layer(middleware::map_response(api::contact::rate_limited_as_json));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .route("/api/revalidate", post(api::revalidate::revalidate_handler))
        .route("/api/search", get(api::search::search_handler))
        .route("/api/search-index", get(api::search::search_index_handler))
        .route("/api/navigation", get(api::navigation::navigation_handler))
        .route("/api/contact", contact)
        .route("/healthz", get(healthz))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}
