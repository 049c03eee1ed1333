use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::config::AppConfig;
use crate::contact::form::ContactMessage;
use crate::error::AppError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const SITE_NAME: &str = "nackamoderaterna.se";

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    /// Compose the notification for a contact form submission.
    ///
    /// User input is escaped in the HTML part; line breaks become `<br>`.
    pub fn from_contact(from: &str, to: &str, contact: &ContactMessage) -> Self {
        let name = ammonia::clean_text(&contact.name);
        let email = ammonia::clean_text(&contact.email);
        let message = contact
            .message
            .lines()
            .map(ammonia::clean_text)
            .collect::<Vec<_>>()
            .join("<br>");

        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #0066cc; padding-bottom: 10px;">Nytt meddelande från kontaktformuläret</h2>
  <div style="margin: 20px 0;">
    <p><strong>Från:</strong> {name}</p>
    <p><strong>E-post:</strong> {email}</p>
  </div>
  <div style="margin: 20px 0; padding: 15px; background-color: #f5f5f5; border-left: 4px solid #0066cc;">
    <p><strong>Meddelande:</strong></p>
    <p style="white-space: pre-wrap;">{message}</p>
  </div>
  <p style="color: #666; font-size: 12px; margin-top: 30px;">Detta meddelande skickades via kontaktformuläret på {SITE_NAME}</p>
</div>"#
        );

        let text = format!(
            "Nytt meddelande från kontaktformuläret\n\nFrån: {}\nE-post: {}\n\nMeddelande:\n{}\n\n---\nDetta meddelande skickades via kontaktformuläret på {SITE_NAME}\n",
            contact.name, contact.email, contact.message
        );

        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            reply_to: contact.email.clone(),
            subject: format!("Nytt meddelande från {}", contact.name),
            html,
            text,
        }
    }
}

/// Transactional mail delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

/// Resend HTTP API implementation of [`Mailer`].
pub struct ResendMailer {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl ResendMailer {
    /// `None` when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, AppError> {
        let Some(api_key) = config.mail_api_key() else {
            return Ok(None);
        };

        let endpoint = Url::parse(RESEND_ENDPOINT)
            .map_err(|e| AppError::Configuration(format!("Invalid mail endpoint: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Some(Self::new(http, endpoint, api_key.to_string())))
    }

    pub fn new(http: reqwest::Client, endpoint: Url, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!("Mail API returned {status}: {body}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(message: &str) -> ContactMessage {
        ContactMessage {
            name: "Anna <b>".into(),
            email: "anna@example.se".into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_html_part_escapes_input() {
        let email = OutgoingEmail::from_contact(
            "noreply@example.se",
            "kansli@example.se",
            &contact("<script>alert(1)</script>\nrad två"),
        );

        assert!(!email.html.contains("<script>"));
        assert!(!email.html.contains("Anna <b>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("<br>"));
        // the plain text part is left as typed
        assert!(email.text.contains("<script>alert(1)</script>\nrad två"));
    }

    #[test]
    fn test_addressing() {
        let email = OutgoingEmail::from_contact(
            "Kansliet <noreply@example.se>",
            "kansli@example.se",
            &contact("Hej hej hej"),
        );
        assert_eq!(email.from, "Kansliet <noreply@example.se>");
        assert_eq!(email.to, vec!["kansli@example.se".to_string()]);
        assert_eq!(email.reply_to, "anna@example.se");
        assert_eq!(email.subject, "Nytt meddelande från Anna <b>");

        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["reply_to"], "anna@example.se");
    }
}
