use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid request signature.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A required server-side setting (secret, API key) is absent or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The content store could not be reached or rejected the query.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error("Too many requests: {0}")]
    RateLimited(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The message without the variant prefix, suitable for response bodies.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::BadRequest(msg)
            | AppError::Configuration(msg)
            | AppError::Upstream(msg)
            | AppError::Mail(msg)
            | AppError::RateLimited(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}
