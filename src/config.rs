use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::AppError;

/// Fallback sender used by the mail API when neither an explicit sender nor a
/// verified domain is configured.
const DEFAULT_SENDER: &str = "onboarding@resend.dev";

/// Service configuration.
///
/// Sources, lowest precedence first: built-in defaults, an optional TOML file,
/// then environment variables (`SANITY_PROJECT_ID`, `SANITY_REVALIDATE_SECRET`,
/// `RESEND_API_KEY`, ...). Keys are the lowercase env var names.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Sanity project identifier.
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    /// Dated API version, e.g. `2024-01-01`.
    pub sanity_api_version: String,
    /// Query the CDN host instead of the live API.
    pub sanity_use_cdn: bool,
    /// Read token for private datasets.
    #[serde(default)]
    pub sanity_api_token: Option<String>,
    /// Shared secret for webhook signatures. Absence is reported per request.
    #[serde(default)]
    pub sanity_revalidate_secret: Option<String>,
    #[serde(default)]
    pub resend_api_key: Option<String>,
    /// Explicit sender, `addr` or `Name <addr>`.
    #[serde(default)]
    pub resend_from_email: Option<String>,
    /// Verified sending domain, used for `noreply@<domain>` when no sender is set.
    #[serde(default)]
    pub resend_domain: Option<String>,
    /// Recipient of contact form messages.
    pub contact_email: String,
    /// Request timeout for outbound HTTP calls, in seconds.
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Self::defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let builder = builder.add_source(Environment::default());
        Self::build(builder)
    }

    /// Load from defaults and a TOML document only, ignoring the environment.
    pub fn from_toml(toml: &str) -> Result<Self, AppError> {
        let builder = Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:3000")?
            .set_default("sanity_dataset", "production")?
            .set_default("sanity_api_version", "2024-01-01")?
            .set_default("sanity_use_cdn", true)?
            .set_default("contact_email", "nacka@moderaterna.se")?
            .set_default("http_timeout_secs", 10_i64)?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;

        if config.sanity_project_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "SANITY_PROJECT_ID must not be empty".into(),
            ));
        }

        Ok(config)
    }

    /// The webhook secret, treating an empty value as unset.
    pub fn revalidate_secret(&self) -> Option<&str> {
        non_empty(self.sanity_revalidate_secret.as_deref())
    }

    /// The mail API key, treating an empty value as unset.
    pub fn mail_api_key(&self) -> Option<&str> {
        non_empty(self.resend_api_key.as_deref())
    }

    /// Sender address for outgoing mail.
    ///
    /// Explicit sender first, then `noreply@<domain>`, then the provider's
    /// shared test sender.
    pub fn mail_sender(&self) -> String {
        if let Some(from) = non_empty(self.resend_from_email.as_deref()) {
            return from.to_string();
        }
        match non_empty(self.resend_domain.as_deref()) {
            Some(domain) => format!("noreply@{domain}"),
            None => DEFAULT_SENDER.to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
