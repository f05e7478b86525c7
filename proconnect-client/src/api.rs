//! ProConnect API surface
//!
//! Defines the `ProConnectApi` trait consumed by the enrichment engine.
//! Implementors supply a single `get`; the semantic endpoints (prospects
//! search, account fetch, org-chart page) and the bounded-retry variant are
//! provided on top of it, so test doubles only script raw GET outcomes.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalized outcome of one GET request.
///
/// `success` is true exactly when a 2xx status was observed. A transport
/// failure (no response at all) leaves `status_code` as `None` and carries
/// the reason in `error`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    /// True when the HTTP status was 2xx
    pub success: bool,
    /// HTTP status code, if a response was received
    pub status_code: Option<u16>,
    /// Parsed JSON body; non-JSON bodies arrive as `{"raw_text": ...}`
    pub data: Value,
    /// Failure description (HTTP error or network error)
    pub error: Option<String>,
    /// Fully resolved request URL
    pub url: String,
    /// Wall-clock time spent on the request
    pub elapsed_ms: u64,
    /// Number of attempts made (1 unless retried)
    pub attempts: u32,
    /// Set when a 401/403 stopped a retrying call early
    pub auth_blocked: bool,
}

impl ApiResponse {
    /// Response representing "no request attempted"
    pub fn not_attempted() -> Self {
        Self {
            success: false,
            status_code: None,
            data: Value::Null,
            error: Some("No request attempted.".to_string()),
            url: String::new(),
            elapsed_ms: 0,
            attempts: 0,
            auth_blocked: false,
        }
    }

    /// True when the status code indicates an authorization failure
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status_code, Some(401) | Some(403))
    }

    /// True when the status code is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code, Some(code) if code >= 500)
    }
}

/// Retry behavior for [`ProConnectApi::get_with_retry`].
///
/// Backoff is linear: attempt N sleeps `delay * N` before retrying.
/// Authorization failures are never retried when `stop_on_auth` is set;
/// a widening loop cannot fix a 401/403 and would only burn call budget.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Number of retries on 5xx responses (0 = single attempt)
    pub retry_on_5xx: u32,
    /// Base delay between attempts
    pub retry_delay: Duration,
    /// Abandon immediately on 401/403
    pub stop_on_auth: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_on_5xx: 0,
            retry_delay: Duration::from_millis(250),
            stop_on_auth: false,
        }
    }
}

/// GET-only ProConnect API seam.
///
/// The engine holds this trait object-free via generics (constructor
/// injection); tests implement `get` with scripted responses and a call log.
#[async_trait]
pub trait ProConnectApi: Send + Sync {
    /// Issue one GET against `endpoint` with query `params`.
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> ApiResponse;

    /// Free-text company search against the prospects index.
    ///
    /// The search text is wrapped in single quotes, matching the upstream
    /// query convention.
    async fn search_prospects(&self, search_text: &str) -> ApiResponse {
        let params = vec![("search".to_string(), format!("'{}'", search_text))];
        self.get("/api/prospects", &params).await
    }

    /// Fetch a full account record by its identifier.
    async fn get_account_by_id(&self, account_id: &str) -> ApiResponse {
        let endpoint = format!("/api/accounts/{}", account_id);
        self.get(&endpoint, &[]).await
    }

    /// Fetch one org-chart page scoped to (directory id, department, job
    /// function). `page`/`size` are omitted from the query when `None`.
    async fn get_org_chart(
        &self,
        zoom_info_account_id: &str,
        department: &str,
        sfdc_job_function: &str,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApiResponse {
        let mut params = vec![
            (
                "zoomInfoAccountId".to_string(),
                zoom_info_account_id.to_string(),
            ),
            ("department".to_string(), department.to_string()),
            ("sfdcJobFunction".to_string(), sfdc_job_function.to_string()),
        ];
        if let Some(page) = page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = size {
            params.push(("size".to_string(), size.to_string()));
        }
        self.get("/api/OrgChart", &params).await
    }

    /// GET with bounded retries and optional auth short-circuit.
    ///
    /// Retries only 5xx responses, up to `policy.retry_on_5xx` times, with
    /// linear backoff. When `policy.stop_on_auth` is set a 401/403 returns
    /// immediately with `auth_blocked = true`.
    async fn get_with_retry(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        policy: RetryPolicy,
    ) -> ApiResponse {
        let max_attempts = policy.retry_on_5xx.saturating_add(1);
        let mut last_response = ApiResponse::not_attempted();

        for attempt in 0..max_attempts {
            let mut response = self.get(endpoint, params).await;
            response.attempts = attempt + 1;

            if policy.stop_on_auth && response.is_auth_failure() {
                response.auth_blocked = true;
                warn!(
                    endpoint = %endpoint,
                    status = ?response.status_code,
                    "Authorization failure; not retrying"
                );
                return response;
            }

            if response.is_server_error() && attempt + 1 < max_attempts {
                let delay = policy.retry_delay * (attempt + 1);
                debug!(
                    endpoint = %endpoint,
                    status = ?response.status_code,
                    delay_ms = delay.as_millis() as u64,
                    "Server error; retrying after backoff"
                );
                last_response = response;
                tokio::time::sleep(delay).await;
                continue;
            }

            return response;
        }

        last_response
    }
}

// Lets callers hand the engine a borrowed client (tests keep the mock and
// its call log).
#[async_trait]
impl<T: ProConnectApi + ?Sized> ProConnectApi for &T {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> ApiResponse {
        (**self).get(endpoint, params).await
    }
}
