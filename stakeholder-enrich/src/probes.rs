//! Undocumented-endpoint probing
//!
//! A fixed allowlist of relationship endpoints is probed with each
//! identifier the resolved account offers. Probes are strictly best-effort:
//! failures become warnings, an authorization failure abandons the endpoint
//! (the same token will keep failing), and successful payloads are handed
//! to extraction as-is.

use crate::config::EnrichConfig;
use crate::dedupe::dedupe_by_key;
use proconnect_client::{ProConnectApi, RetryPolicy};
use serde_json::Value;
use tracing::{debug, warn};

/// Endpoints eligible for probing. Nothing outside this list is ever called.
pub const PROBE_ENDPOINTS: &[&str] = &[
    "/api/taggedrelationships",
    "/api/relationshiplead",
    "/api/userHistory",
];

/// One successful probe response.
#[derive(Debug, Clone)]
pub struct ProbePayload {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub status_code: Option<u16>,
    pub data: Value,
}

pub struct ProbeOutcome {
    pub payloads: Vec<ProbePayload>,
    pub warnings: Vec<String>,
}

pub struct ProbeRunner<'a, C: ProConnectApi> {
    client: &'a C,
    config: &'a EnrichConfig,
}

impl<'a, C: ProConnectApi> ProbeRunner<'a, C> {
    pub fn new(client: &'a C, config: &'a EnrichConfig) -> Self {
        Self { client, config }
    }

    /// Probe every allowlisted endpoint with every distinct parameter
    /// template the account identifiers allow.
    pub async fn run(&self, account_id: Option<&str>, zoom_info_account_id: Option<&str>) -> ProbeOutcome {
        let templates = param_templates(account_id, zoom_info_account_id);
        let mut payloads = Vec::new();
        let mut warnings = Vec::new();

        if templates.is_empty() {
            warnings.push("No account identifiers available; probes skipped.".to_string());
            return ProbeOutcome { payloads, warnings };
        }

        let policy = RetryPolicy {
            retry_on_5xx: self.config.probe_retry_on_5xx,
            retry_delay: self.config.probe_retry_delay(),
            stop_on_auth: true,
        };

        'endpoints: for endpoint in PROBE_ENDPOINTS {
            for params in &templates {
                let response = self.client.get_with_retry(endpoint, params, policy).await;
                if response.auth_blocked {
                    warn!(endpoint = %endpoint, status = ?response.status_code, "probe blocked by authorization");
                    warnings.push(format!(
                        "Probe endpoint {} blocked by authorization ({}).",
                        endpoint,
                        describe_status(response.status_code)
                    ));
                    continue 'endpoints;
                }
                if !response.success {
                    warnings.push(format!(
                        "Probe endpoint {} failed with status {}.",
                        endpoint,
                        describe_status(response.status_code)
                    ));
                    continue;
                }
                debug!(endpoint = %endpoint, elapsed_ms = response.elapsed_ms, "probe succeeded");
                payloads.push(ProbePayload {
                    endpoint: endpoint.to_string(),
                    params: params.clone(),
                    status_code: response.status_code,
                    data: response.data,
                });
            }
        }

        ProbeOutcome { payloads, warnings }
    }
}

/// Parameter templates derived from the available identifiers: accountId
/// alone, zoomInfoAccountId alone, and both together when both exist.
/// Identical templates are collapsed.
pub fn param_templates(
    account_id: Option<&str>,
    zoom_info_account_id: Option<&str>,
) -> Vec<Vec<(String, String)>> {
    let account_id = account_id.map(str::trim).filter(|s| !s.is_empty());
    let zoom_id = zoom_info_account_id.map(str::trim).filter(|s| !s.is_empty());

    let mut templates: Vec<Vec<(String, String)>> = Vec::new();
    if let Some(id) = account_id {
        templates.push(vec![("accountId".to_string(), id.to_string())]);
    }
    if let Some(id) = zoom_id {
        templates.push(vec![("zoomInfoAccountId".to_string(), id.to_string())]);
    }
    if let (Some(a), Some(z)) = (account_id, zoom_id) {
        templates.push(vec![
            ("accountId".to_string(), a.to_string()),
            ("zoomInfoAccountId".to_string(), z.to_string()),
        ]);
    }
    dedupe_by_key(templates, |params| params.clone())
}

fn describe_status(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proconnect_client::ApiResponse;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedApi {
        /// status returned per endpoint; anything else gets 200
        statuses: Vec<(&'static str, u16)>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    #[async_trait]
    impl ProConnectApi for ScriptedApi {
        async fn get(&self, endpoint: &str, params: &[(String, String)]) -> ApiResponse {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint.to_string(), params.to_vec()));
            let status = self
                .statuses
                .iter()
                .find(|(e, _)| *e == endpoint)
                .map(|(_, s)| *s)
                .unwrap_or(200);
            ApiResponse {
                success: (200..300).contains(&status),
                status_code: Some(status),
                data: json!({ "people": [] }),
                error: None,
                url: endpoint.to_string(),
                elapsed_ms: 1,
                attempts: 1,
                auth_blocked: false,
            }
        }
    }

    fn fast_config() -> EnrichConfig {
        EnrichConfig {
            probe_retry_delay_ms: 1,
            ..EnrichConfig::default()
        }
    }

    #[test]
    fn test_param_templates_both_ids() {
        let templates = param_templates(Some("A-1"), Some("Z-1"));
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0], vec![("accountId".to_string(), "A-1".to_string())]);
        assert_eq!(templates[2].len(), 2);
    }

    #[test]
    fn test_param_templates_single_id() {
        let templates = param_templates(Some("A-1"), None);
        assert_eq!(templates.len(), 1);
        let templates = param_templates(None, Some("  Z-1 "));
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0][0].1, "Z-1");
    }

    #[test]
    fn test_param_templates_no_ids() {
        assert!(param_templates(None, Some("  ")).is_empty());
    }

    #[tokio::test]
    async fn test_all_endpoints_probed_with_all_templates() {
        let api = ScriptedApi { statuses: vec![], calls: Mutex::new(Vec::new()) };
        let config = fast_config();
        let outcome = ProbeRunner::new(&api, &config).run(Some("A-1"), Some("Z-1")).await;

        assert_eq!(outcome.payloads.len(), 9, "3 endpoints x 3 templates");
        assert!(outcome.warnings.is_empty());
        let calls = api.calls.lock().unwrap();
        assert!(calls.iter().all(|(e, _)| PROBE_ENDPOINTS.contains(&e.as_str())));
    }

    #[tokio::test]
    async fn test_auth_block_abandons_endpoint_not_run() {
        let api = ScriptedApi {
            statuses: vec![("/api/taggedrelationships", 403)],
            calls: Mutex::new(Vec::new()),
        };
        let config = fast_config();
        let outcome = ProbeRunner::new(&api, &config).run(Some("A-1"), Some("Z-1")).await;

        // blocked endpoint called once, the other two get all 3 templates
        let calls = api.calls.lock().unwrap();
        let blocked = calls.iter().filter(|(e, _)| e == "/api/taggedrelationships").count();
        assert_eq!(blocked, 1);
        assert_eq!(calls.len(), 7);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("blocked by authorization (403)")));
        assert_eq!(outcome.payloads.len(), 6);
    }

    #[tokio::test]
    async fn test_failed_probe_warns_and_continues() {
        let api = ScriptedApi {
            statuses: vec![("/api/userHistory", 404)],
            calls: Mutex::new(Vec::new()),
        };
        let config = fast_config();
        let outcome = ProbeRunner::new(&api, &config).run(Some("A-1"), None).await;

        assert_eq!(outcome.payloads.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("/api/userHistory failed with status 404")));
    }

    #[tokio::test]
    async fn test_no_ids_skips_everything() {
        let api = ScriptedApi { statuses: vec![], calls: Mutex::new(Vec::new()) };
        let config = fast_config();
        let outcome = ProbeRunner::new(&api, &config).run(None, None).await;
        assert!(outcome.payloads.is_empty());
        assert_eq!(api.calls.lock().unwrap().len(), 0);
        assert_eq!(outcome.warnings.len(), 1);
    }
}
