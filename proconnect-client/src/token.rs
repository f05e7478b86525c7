//! Bearer-token handling
//!
//! Tokens arrive from many places (env vars, files, pastes) in many shapes:
//! with or without the `Bearer ` prefix, wrapped in quotes or angle brackets,
//! or line-wrapped by an editor. Normalization makes all of those usable.
//! The JWT helpers decode the payload WITHOUT verification; they exist only
//! to warn about expiry before a run burns its call budget on 401s.

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

/// Tokens expiring within this window trigger a near-expiry warning.
const NEAR_EXPIRY_SECONDS: i64 = 10 * 60;

/// Normalize a raw token into the `Bearer <token>` header value.
///
/// Strips an existing prefix, surrounding quotes or angle brackets, and any
/// embedded whitespace (accidental line wraps from copy/paste).
pub fn normalize_bearer_token(token: &str) -> Result<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidToken("Bearer token is empty.".to_string()));
    }

    let mut raw = strip_bearer_prefix(trimmed).to_string();

    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0] == bytes[bytes.len() - 1] && (bytes[0] == b'\'' || bytes[0] == b'"') {
        raw = raw[1..raw.len() - 1].trim().to_string();
    }
    if raw.starts_with('<') && raw.ends_with('>') {
        raw = raw[1..raw.len() - 1].trim().to_string();
    }

    let raw: String = raw.split_whitespace().collect();
    if raw.is_empty() {
        return Err(ClientError::InvalidToken("Bearer token is invalid.".to_string()));
    }

    Ok(format!("Bearer {}", raw))
}

/// Drop a leading `Bearer ` prefix (case-insensitive) if present.
pub fn strip_bearer_prefix(token: &str) -> &str {
    let trimmed = token.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim(),
        _ => trimmed,
    }
}

/// Shorten a token to a loggable preview.
pub fn redact_token(token: &str) -> String {
    let raw = strip_bearer_prefix(token);
    if raw.len() <= 12 || !raw.is_ascii() {
        return "<redacted>".to_string();
    }
    format!("{}...{}", &raw[..6], &raw[raw.len() - 6..])
}

/// Decode a JWT payload without signature verification.
///
/// Returns the claims object, or an error string when the token is not
/// JWT-shaped. Never use this for trust decisions.
pub fn decode_jwt_payload_no_verify(token: &str) -> std::result::Result<Value, String> {
    let raw = strip_bearer_prefix(token);
    let mut parts = raw.split('.');
    let (_header, payload_b64) = match (parts.next(), parts.next()) {
        (Some(h), Some(p)) if !p.is_empty() => (h, p),
        _ => return Err("Token is not JWT-like.".to_string()),
    };

    let padding = "=".repeat((4 - payload_b64.len() % 4) % 4);
    let padded = format!("{}{}", payload_b64, padding);
    let decoded = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| format!("Could not decode JWT payload: {}", e))?;
    let payload: Value = serde_json::from_slice(&decoded)
        .map_err(|e| format!("Could not decode JWT payload: {}", e))?;

    if payload.is_object() {
        Ok(payload)
    } else {
        Err("Decoded JWT payload is not a JSON object.".to_string())
    }
}

/// Local token-health report derived from unverified JWT claims.
#[derive(Debug, Clone, Serialize)]
pub struct TokenHealth {
    /// Redacted preview for logs
    pub token_preview: String,
    /// `iat` claim as UTC, when present
    pub issued_at_utc: Option<DateTime<Utc>>,
    /// `exp` claim as UTC, when present
    pub expires_at_utc: Option<DateTime<Utc>>,
    /// Seconds until expiry (negative when already expired)
    pub seconds_to_expiry: Option<i64>,
    /// True when the token is past its `exp` claim
    pub is_expired: Option<bool>,
    /// True when expiry is within ten minutes
    pub is_near_expiry: Option<bool>,
    /// Decode problems and expiry warnings
    pub warnings: Vec<String>,
}

/// Summarize token expiry state for pre-flight logging.
pub fn token_health_summary(token: &str, now: DateTime<Utc>) -> TokenHealth {
    let mut health = TokenHealth {
        token_preview: redact_token(token),
        issued_at_utc: None,
        expires_at_utc: None,
        seconds_to_expiry: None,
        is_expired: None,
        is_near_expiry: None,
        warnings: Vec::new(),
    };

    let payload = match decode_jwt_payload_no_verify(token) {
        Ok(payload) => payload,
        Err(message) => {
            health.warnings.push(message);
            return health;
        }
    };

    if let Some(iat) = payload.get("iat").and_then(Value::as_i64) {
        health.issued_at_utc = Utc.timestamp_opt(iat, 0).single();
    }

    match payload.get("exp").and_then(Value::as_i64) {
        Some(exp) => {
            health.expires_at_utc = Utc.timestamp_opt(exp, 0).single();
            let remaining = exp - now.timestamp();
            health.seconds_to_expiry = Some(remaining);
            health.is_expired = Some(remaining <= 0);
            health.is_near_expiry = Some(remaining > 0 && remaining <= NEAR_EXPIRY_SECONDS);

            if remaining <= 0 {
                health.warnings.push("Token is expired.".to_string());
            } else if remaining <= NEAR_EXPIRY_SECONDS {
                health
                    .warnings
                    .push("Token is near expiry (<= 10 minutes).".to_string());
            }
        }
        None => {
            health
                .warnings
                .push("Token does not include an integer 'exp' claim.".to_string());
        }
    }

    health
}
