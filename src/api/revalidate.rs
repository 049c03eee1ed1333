use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::errors::MessageError;
use crate::app::AppState;
use crate::cache::tags::TagInvalidator;
use crate::error::AppError;
use crate::revalidate::signature::{self, SIGNATURE_HEADER};
use crate::revalidate::tags::{tags_for, CacheTag};

/// Change notification posted by the content store webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeNotification {
    #[serde(rename = "_type", default)]
    pub document_type: Option<String>,
    #[serde(rename = "_id", default)]
    pub document_id: Option<String>,
    /// Either a plain string or a slug object (`{ "current": ... }`).
    #[serde(default, deserialize_with = "slug_string")]
    pub slug: Option<String>,
    /// Listing page key (`news`, `politicians`, ...).
    #[serde(rename = "key", default)]
    pub listing_key: Option<String>,
}

fn slug_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SlugValue {
        Plain(String),
        Object { current: Option<String> },
    }

    Ok(match Option::<SlugValue>::deserialize(deserializer)? {
        Some(SlugValue::Plain(s)) => Some(s),
        Some(SlugValue::Object { current }) => current,
        None => None,
    })
}

/// Identifying fields echoed back for observability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEcho {
    #[serde(rename = "_type")]
    pub document_type: String,
    #[serde(rename = "_id")]
    pub document_id: Option<String>,
    pub slug: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub tags: Vec<CacheTag>,
    /// Unix time in milliseconds.
    pub now: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub body: NotificationEcho,
}

/// Core revalidation logic, separated from the HTTP layer for testability.
///
/// Verifies the signature, validates the payload, resolves cache tags and
/// expires each of them immediately. Fails closed: nothing is invalidated
/// unless every check passes.
pub async fn process_revalidation(
    invalidator: &dyn TagInvalidator,
    secret: Option<&str>,
    signature_header: Option<&str>,
    raw_body: &[u8],
) -> Result<RevalidateResponse, AppError> {
    // 1. The server must hold a secret
    let secret = secret
        .ok_or_else(|| AppError::Configuration("Missing SANITY_REVALIDATE_SECRET".into()))?;

    // 2. Authenticate
    let header = signature_header
        .ok_or_else(|| AppError::Auth("Invalid signature: missing signature header".into()))?;
    signature::verify(secret, header, raw_body)?;

    // 3. Validate the payload
    let notification: ChangeNotification = serde_json::from_slice(raw_body)
        .map_err(|e| AppError::BadRequest(format!("Bad request: {e}")))?;
    let document_type = notification
        .document_type
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Bad request: missing _type".into()))?;

    let echo = NotificationEcho {
        document_type,
        document_id: notification.document_id,
        slug: notification.slug,
        key: notification.listing_key,
    };

    // 4. Resolve tags
    let tags = tags_for(&echo.document_type, echo.document_id.as_deref());
    let now = chrono::Utc::now().timestamp_millis();

    if tags.is_empty() {
        tracing::info!(document_type = %echo.document_type, "no cache tags to revalidate");
        return Ok(RevalidateResponse {
            revalidated: false,
            tags,
            now,
            message: Some(format!(
                "No tags to revalidate for _type={}",
                echo.document_type
            )),
            body: echo,
        });
    }

    // 5. Expire every tag now
    for tag in &tags {
        invalidator.invalidate(tag.as_str(), Duration::ZERO).await;
    }

    tracing::info!(
        document_type = %echo.document_type,
        document_id = echo.document_id.as_deref().unwrap_or(""),
        tags = ?tags,
        "revalidated cache tags"
    );

    Ok(RevalidateResponse {
        revalidated: true,
        tags,
        now,
        message: None,
        body: echo,
    })
}

/// Axum handler for `POST /api/revalidate`.
pub async fn revalidate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<axum::Json<RevalidateResponse>, MessageError> {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let result = process_revalidation(
        state.cache.as_ref(),
        state.config.revalidate_secret(),
        signature_header,
        &body,
    )
    .await;

    match result {
        Ok(response) => Ok(axum::Json(response)),
        Err(err) => {
            match &err {
                AppError::Auth(_) | AppError::BadRequest(_) => {
                    tracing::warn!("[revalidate] rejected: {err}")
                }
                _ => tracing::error!("[revalidate] {err}"),
            }
            Err(err.into())
        }
    }
}
