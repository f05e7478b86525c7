//! HTTP implementation of the ProConnect API seam
//!
//! A small GET-only `reqwest` client. Every request outcome (success,
//! HTTP error, or transport failure) is normalized into an `ApiResponse`
//! and appended to an in-memory call trace. The trace is append-only and
//! intended for a single caller per client instance; it is the audit trail
//! the enrichment engine attaches to its run artifacts.

use crate::api::{ApiResponse, ProConnectApi};
use crate::error::{ClientError, Result};
use crate::token::normalize_bearer_token;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default ProConnect base URL
pub const DEFAULT_BASE_URL: &str = "https://proconnect.protiviti.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0";

/// One entry in the append-only request trace.
#[derive(Debug, Clone, Serialize)]
pub struct CallTrace {
    /// HTTP method (always GET for this client)
    pub method: &'static str,
    /// Endpoint path as requested
    pub endpoint: String,
    /// Fully resolved URL
    pub url: String,
    /// Observed status code, if any
    pub status_code: Option<u16>,
    /// Whether the status was 2xx
    pub success: bool,
    /// Request duration
    pub elapsed_ms: u64,
    /// Failure description, if any
    pub error: Option<String>,
    /// UTC timestamp when the request started
    pub started_at: DateTime<Utc>,
}

/// GET-only ProConnect client with request tracing.
///
/// Holds a normalized bearer token and optional extra headers. Not designed
/// for sharing across concurrent callers: the call trace is a plain
/// append-only log keyed to one resolution run at a time.
pub struct HttpProConnectClient {
    http_client: Client,
    base_url: String,
    calls: Mutex<Vec<CallTrace>>,
}

impl HttpProConnectClient {
    /// Create a client for `base_url` authenticating with `bearer_token`.
    ///
    /// The token is normalized (prefix, quotes, whitespace) before use.
    /// Extra headers are applied to every request; an `Authorization` entry
    /// among them is ignored in favor of the token.
    pub fn new(
        base_url: &str,
        bearer_token: &str,
        timeout: Duration,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let token = normalize_bearer_token(bearer_token)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&token)
                .map_err(|e| ClientError::InvalidToken(e.to_string()))?,
        );
        for (key, value) in extra_headers {
            if key.eq_ignore_ascii_case("authorization") {
                continue;
            }
            let name = header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ClientError::Config(format!("Invalid header name '{}': {}", key, e)))?;
            let value = header::HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("Invalid header value for '{}': {}", key, e)))?;
            headers.insert(name, value);
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let base = if base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        Ok(Self {
            http_client,
            base_url: base.trim_end_matches('/').to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Create a client against the default base URL with default timeout.
    pub fn with_token(bearer_token: &str) -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, bearer_token, DEFAULT_TIMEOUT, &HashMap::new())
    }

    /// Snapshot of the append-only call trace.
    pub fn call_trace(&self) -> Vec<CallTrace> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn record(&self, trace: CallTrace) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(trace);
        }
    }
}

#[async_trait]
impl ProConnectApi for HttpProConnectClient {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> ApiResponse {
        let url = self.build_url(endpoint);
        let started_at = Utc::now();
        let started = Instant::now();

        let mut status_code: Option<u16> = None;
        let mut data = Value::Null;
        let mut error_message: Option<String> = None;

        let request = self.http_client.get(&url).query(params);
        match request.send().await {
            Ok(response) => {
                let status = response.status();
                status_code = Some(status.as_u16());
                let body = response.text().await.unwrap_or_default();
                data = parse_json_or_text(&body);

                if !status.is_success() {
                    error_message = Some(describe_http_error(status, &data));
                }
            }
            Err(e) => {
                error_message = Some(format!("Network error: {}", e));
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let success = matches!(status_code, Some(code) if (200..300).contains(&code));

        debug!(
            endpoint = %endpoint,
            status = ?status_code,
            elapsed_ms,
            success,
            "ProConnect GET complete"
        );

        self.record(CallTrace {
            method: "GET",
            endpoint: endpoint.to_string(),
            url: url.clone(),
            status_code,
            success,
            elapsed_ms,
            error: error_message.clone(),
            started_at,
        });

        ApiResponse {
            success,
            status_code,
            data,
            error: error_message,
            url,
            elapsed_ms,
            attempts: 1,
            auth_blocked: false,
        }
    }
}

/// Parse a response body as JSON, falling back to a raw-text wrapper.
///
/// Upstream occasionally serves HTML error pages with a 200-family proxy
/// status; wrapping keeps the envelope shape stable for callers.
fn parse_json_or_text(text: &str) -> Value {
    let content = text.trim();
    if content.is_empty() {
        return json!({});
    }
    serde_json::from_str(content).unwrap_or_else(|_| json!({ "raw_text": content }))
}

fn describe_http_error(status: StatusCode, data: &Value) -> String {
    let base = format!("HTTP {}", status.as_u16());
    if matches!(status.as_u16(), 401 | 403) {
        if let Some(detail) = extract_error_detail(data) {
            return format!("{}: {}", base, detail);
        }
        return format!("{}: authorization failed", base);
    }
    base
}

/// Pull a human-readable detail out of an error payload, trying the common
/// field names in order.
fn extract_error_detail(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;
    for key in ["message", "error_description", "error", "detail", "title"] {
        if let Some(value) = object.get(key).and_then(Value::as_str) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body() {
        let parsed = parse_json_or_text(r#"{"value": [1, 2]}"#);
        assert_eq!(parsed["value"][0], 1);
    }

    #[test]
    fn test_parse_non_json_body_wrapped() {
        let parsed = parse_json_or_text("<html>gateway timeout</html>");
        assert_eq!(parsed["raw_text"], "<html>gateway timeout</html>");
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_json_or_text("   "), json!({}));
    }

    #[test]
    fn test_error_detail_priority() {
        let payload = json!({ "detail": "late", "message": "token expired" });
        assert_eq!(extract_error_detail(&payload).as_deref(), Some("token expired"));
    }

    #[test]
    fn test_error_detail_skips_blank() {
        let payload = json!({ "message": "  ", "error": "forbidden scope" });
        assert_eq!(extract_error_detail(&payload).as_deref(), Some("forbidden scope"));
    }

    #[test]
    fn test_build_url_joins_cleanly() {
        let client = HttpProConnectClient::new(
            "https://example.test/",
            "Bearer abc.def.ghi",
            DEFAULT_TIMEOUT,
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(client.build_url("/api/prospects"), "https://example.test/api/prospects");
        assert_eq!(client.build_url("api/user"), "https://example.test/api/user");
    }

    #[test]
    fn test_extra_headers_cannot_override_authorization() {
        let mut extra = HashMap::new();
        extra.insert("Authorization".to_string(), "Bearer hijack".to_string());
        extra.insert("X-Trace".to_string(), "abc".to_string());
        // Construction succeeds; the authorization entry is ignored.
        let client =
            HttpProConnectClient::new("https://example.test", "token-value", DEFAULT_TIMEOUT, &extra);
        assert!(client.is_ok());
    }
}
