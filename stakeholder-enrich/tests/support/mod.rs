//! Scripted ProConnect API for scenario tests.

use async_trait::async_trait;
use proconnect_client::{ApiResponse, ProConnectApi};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Install a log subscriber for test output; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory API double: canned responses per endpoint plus a call log so
/// tests can assert on call counts and ordering.
#[derive(Default)]
pub struct MockApi {
    /// Raw search documents; wrapped in the `{"value":[{"document":..}]}`
    /// envelope on the way out.
    pub search_documents: Vec<Value>,
    pub search_status: Option<u16>,
    pub accounts: HashMap<String, Value>,
    /// Employees arrays keyed by (department, sfdcJobFunction).
    pub org_chart: HashMap<(String, String), Value>,
    /// Probe endpoint payloads; endpoints not listed return an empty object.
    pub probe_payloads: HashMap<String, Value>,
    /// Per-endpoint status override (applies to probes).
    pub status_overrides: HashMap<String, u16>,
    pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockApi {
    pub fn org_chart_call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(endpoint, _)| endpoint == "/api/OrgChart")
            .count()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .count()
    }

    fn ok(data: Value) -> ApiResponse {
        ApiResponse {
            success: true,
            status_code: Some(200),
            data,
            error: None,
            url: String::new(),
            elapsed_ms: 1,
            attempts: 1,
            auth_blocked: false,
        }
    }

    fn err(status: u16) -> ApiResponse {
        ApiResponse {
            success: false,
            status_code: Some(status),
            data: Value::Null,
            error: Some(format!("HTTP {}", status)),
            url: String::new(),
            elapsed_ms: 1,
            attempts: 1,
            auth_blocked: false,
        }
    }
}

#[async_trait]
impl ProConnectApi for MockApi {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> ApiResponse {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.to_vec()));

        if let Some(status) = self.status_overrides.get(endpoint) {
            return MockApi::err(*status);
        }

        if endpoint == "/api/prospects" {
            if let Some(status) = self.search_status {
                return MockApi::err(status);
            }
            let docs: Vec<Value> = self
                .search_documents
                .iter()
                .map(|doc| json!({ "document": doc }))
                .collect();
            return MockApi::ok(json!({ "value": docs }));
        }

        if let Some(account_id) = endpoint.strip_prefix("/api/accounts/") {
            return match self.accounts.get(account_id) {
                Some(account) => MockApi::ok(account.clone()),
                None => MockApi::err(404),
            };
        }

        if endpoint == "/api/OrgChart" {
            let get_param = |key: &str| {
                params
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            };
            let key = (get_param("department"), get_param("sfdcJobFunction"));
            let employees = self.org_chart.get(&key).cloned().unwrap_or_else(|| json!([]));
            return MockApi::ok(json!({ "employees": employees }));
        }

        let data = self
            .probe_payloads
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| json!({}));
        MockApi::ok(data)
    }
}
