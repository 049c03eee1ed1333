use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

pub const MISSING_FIELDS: &str = "Alla fält är obligatoriska";
pub const NAME_TOO_SHORT: &str = "Namnet måste vara minst 2 tecken";
pub const MESSAGE_TOO_SHORT: &str = "Meddelandet måste vara minst 10 tecken";
pub const INVALID_EMAIL: &str = "Ogiltig e-postadress";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// `addr` or `Name <addr>`.
static SENDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^<]+<)?([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})(?:>)?$")
        .unwrap()
});

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

pub fn is_valid_sender(sender: &str) -> bool {
    SENDER_RE.is_match(sender)
}

/// Contact form payload as submitted. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation. Fields are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ContactRequest {
    /// Validate in order: presence, name length, message length, email shape.
    pub fn validate(&self) -> Result<ContactMessage, AppError> {
        let (Some(name), Some(email), Some(message)) = (
            required(&self.name),
            required(&self.email),
            required(&self.message),
        ) else {
            return Err(AppError::BadRequest(MISSING_FIELDS.into()));
        };

        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::BadRequest(NAME_TOO_SHORT.into()));
        }
        if message.chars().count() < MIN_MESSAGE_CHARS {
            return Err(AppError::BadRequest(MESSAGE_TOO_SHORT.into()));
        }
        if !is_valid_email(email) {
            return Err(AppError::BadRequest(INVALID_EMAIL.into()));
        }

        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }
}
