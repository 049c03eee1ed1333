use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

impl AppError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_)
            | AppError::Upstream(_)
            | AppError::Mail(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Renders `{ "error": message }` with the mapped status.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.message()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Wrapper rendering an [`AppError`] as `{ "message": message }`.
///
/// The revalidation webhook sender expects this shape rather than `error`.
#[derive(Debug)]
pub struct MessageError(pub AppError);

impl From<AppError> for MessageError {
    fn from(err: AppError) -> Self {
        MessageError(err)
    }
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let body = serde_json::json!({
            "message": self.0.message()
        });

        (status, axum::Json(body)).into_response()
    }
}
