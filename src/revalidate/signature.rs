use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

/// Header carrying `t=<timestamp>,v1=<base64url signature>`.
pub const SIGNATURE_HEADER: &str = "sanity-webhook-signature";

type HmacSha256 = Hmac<Sha256>;

/// A parsed signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp exactly as sent; it is part of the signed message.
    pub timestamp: String,
    /// Decoded HMAC bytes.
    pub signature: Vec<u8>,
}

/// Parse `t=<timestamp>,v1=<signature>`.
///
/// Unknown keys are ignored. The first `v1` wins.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, AppError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key.trim() {
            "t" if timestamp.is_none() => timestamp = Some(value.trim()),
            "v1" if signature.is_none() => signature = Some(value.trim()),
            _ => {}
        }
    }

    let timestamp = timestamp
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| AppError::Auth("Malformed signature header: missing timestamp".into()))?;
    let signature = signature
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Auth("Malformed signature header: missing signature".into()))?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature.trim_end_matches('='))
        .map_err(|_| AppError::Auth("Malformed signature header: invalid encoding".into()))?;

    Ok(SignatureHeader {
        timestamp: timestamp.to_string(),
        signature,
    })
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to initialize HMAC: {e}")))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(mac)
}

/// Compute the base64url (unpadded) signature of `"{timestamp}.{body}"`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String, AppError> {
    let mac = mac_for(secret, timestamp, body)?;
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Build a complete header value, as the content store would send it.
pub fn signature_header(secret: &str, timestamp: &str, body: &[u8]) -> Result<String, AppError> {
    Ok(format!("t={},v1={}", timestamp, sign(secret, timestamp, body)?))
}

/// Verify a signature header against the raw request body.
///
/// The comparison is constant-time.
pub fn verify(secret: &str, header: &str, body: &[u8]) -> Result<(), AppError> {
    let parsed = parse_signature_header(header)?;
    mac_for(secret, &parsed.timestamp, body)?
        .verify_slice(&parsed.signature)
        .map_err(|_| AppError::Auth("Invalid signature".into()))
}
