use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;

/// Read access to the headless CMS.
///
/// Abstracted as a trait so tests can serve canned snapshots without a real
/// content store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a GROQ query against the published perspective and return the
    /// `result` member of the response.
    async fn query(&self, groq: &str) -> Result<serde_json::Value, AppError>;
}

/// Run a query and deserialize its result into `T`.
pub async fn fetch<T: DeserializeOwned>(store: &dyn ContentStore, groq: &str) -> Result<T, AppError> {
    let value = store.query(groq).await?;
    serde_json::from_value(value)
        .map_err(|e| AppError::Upstream(format!("Unexpected content store payload: {e}")))
}

/// Envelope returned by the Sanity query API.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: serde_json::Value,
}

/// Sanity HTTP API implementation of [`ContentStore`].
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl SanityClient {
    /// Build a client from the service configuration.
    ///
    /// Uses `apicdn.sanity.io` when `sanity_use_cdn` is set and no token is
    /// configured; authenticated requests always go to the live API.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let token = config
            .sanity_api_token
            .clone()
            .filter(|t| !t.trim().is_empty());
        let host = if config.sanity_use_cdn && token.is_none() {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let base = format!(
            "https://{}.{}/v{}/data/query/{}",
            config.sanity_project_id,
            host,
            config.sanity_api_version.trim_start_matches('v'),
            config.sanity_dataset
        );
        let endpoint = Url::parse(&base)
            .map_err(|e| AppError::Configuration(format!("Invalid Sanity endpoint '{base}': {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::new(http, endpoint, token))
    }

    /// Create with explicit values (useful for testing / DI).
    pub fn new(http: reqwest::Client, endpoint: Url, token: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            token,
        }
    }

    fn query_url(&self, groq: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", groq)
            .append_pair("perspective", "published");
        url
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn query(&self, groq: &str) -> Result<serde_json::Value, AppError> {
        let mut request = self.http.get(self.query_url(groq));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Content store returned {status}: {body}"
            )));
        }

        let envelope: QueryResponse = response.json().await?;
        Ok(envelope.result)
    }
}
