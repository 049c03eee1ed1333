use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::contact::form::{is_valid_email, is_valid_sender, ContactRequest};
use crate::contact::mailer::{Mailer, OutgoingEmail};
use crate::error::AppError;

pub const SENT: &str = "Meddelandet har skickats!";
pub const MAIL_NOT_CONFIGURED: &str = "E-posttjänsten är inte konfigurerad";
pub const INVALID_SENDER: &str = "E-postkonfigurationen är ogiltig. Kontakta administratören.";
pub const INVALID_RECIPIENT: &str =
    "Mottagarens e-postadress är ogiltig. Kontakta administratören.";
pub const DELIVERY_FAILED: &str = "Kunde inte skicka e-post. Försök igen senare.";
pub const RATE_LIMITED: &str = "För många förfrågningar. Försök igen senare.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub success: bool,
}

/// Core contact form logic, separated from the HTTP layer for testability.
pub async fn process_contact(
    mailer: Option<&dyn Mailer>,
    config: &AppConfig,
    request: ContactRequest,
) -> Result<ContactResponse, AppError> {
    let contact = request.validate()?;

    let Some(mailer) = mailer else {
        tracing::error!("RESEND_API_KEY is not configured");
        return Err(AppError::Configuration(MAIL_NOT_CONFIGURED.into()));
    };

    let sender = config.mail_sender();
    if !is_valid_sender(&sender) {
        tracing::error!(sender = %sender, "invalid RESEND_FROM_EMAIL format");
        return Err(AppError::Configuration(INVALID_SENDER.into()));
    }

    let recipient = config.contact_email.trim();
    if !is_valid_email(recipient) {
        tracing::error!(recipient, "invalid CONTACT_EMAIL");
        return Err(AppError::Configuration(INVALID_RECIPIENT.into()));
    }

    let email = OutgoingEmail::from_contact(&sender, recipient, &contact);
    mailer.send(&email).await.map_err(|err| {
        tracing::error!("[contact] delivery failed: {err}");
        AppError::Mail(DELIVERY_FAILED.into())
    })?;

    tracing::info!(reply_to = %contact.email, "contact message delivered");
    Ok(ContactResponse {
        message: SENT.into(),
        success: true,
    })
}

/// Axum handler for `POST /api/contact`.
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    process_contact(state.mailer.as_deref(), &state.config, request)
        .await
        .map(Json)
}

/// Rewrite rate limiter rejections into the JSON error shape, keeping the
/// limiter's headers (`retry-after`, ...).
pub async fn rate_limited_as_json(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let body = AppError::RateLimited(RATE_LIMITED.into())
        .into_response()
        .into_body();
    Response::from_parts(parts, body)
}
