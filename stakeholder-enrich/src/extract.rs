//! Payload extraction
//!
//! Converts the coarse endpoint payloads into the crate's record types.
//! Extraction is deliberately lenient: anything that does not parse is
//! skipped, never an error, because upstream shapes drift.

use crate::records::{PersonRecord, TechRecord};
use crate::value_util::{as_trimmed_string, iter_object_nodes, string_field};
use serde_json::Value;

/// Keys on an account payload that directly carry technology data, in
/// priority order.
const DIRECT_TECH_KEYS: &[&str] = &[
    "technologies",
    "technology",
    "companyTechnologies",
    "technologiesUsed",
];

const TECH_NAME_KEYS: &[&str] = &["technology", "name", "vendor", "tool", "value"];
const TECH_WEBSITE_KEYS: &[&str] = &["website", "websiteUrl", "url", "vendorWebsite"];

/// A company candidate lifted out of the prospect search envelope.
#[derive(Debug, Clone, Default)]
pub struct RawCompanyCandidate {
    pub account_id: Option<String>,
    pub company_name: Option<String>,
    pub name: Option<String>,
    pub company_ticker: Option<String>,
    pub company_url: Option<String>,
    pub company_description: Option<String>,
}

/// Prospect search results arrive as `{"value": [{"document": {...}}]}`.
/// Items without a `document` object are skipped.
pub fn extract_company_candidates(payload: &Value) -> Vec<RawCompanyCandidate> {
    let Some(items) = payload.get("value").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("document"))
        .filter(|doc| doc.is_object())
        .map(|doc| RawCompanyCandidate {
            account_id: string_field(doc, &["accountId", "account_id", "id"]),
            company_name: string_field(doc, &["companyName"]),
            name: string_field(doc, &["name"]),
            company_ticker: string_field(doc, &["companyTicker", "ticker"]),
            company_url: string_field(doc, &["companyUrl", "website", "url"]),
            company_description: string_field(doc, &["companyDescription", "description"]),
        })
        .collect()
}

/// Org-chart payloads carry their rows under `employees`.
pub fn extract_employees(payload: &Value, source: &str) -> Vec<PersonRecord> {
    let Some(rows) = payload.get("employees").and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .filter(|row| row.is_object())
        .map(|row| PersonRecord::from_value(row, source))
        .filter(|record| !record.full_name().is_empty())
        .collect()
}

/// Key buyers ride on the account payload itself.
pub fn extract_key_buyers(account: &Value) -> Vec<PersonRecord> {
    let Some(rows) = account.get("keyBuyers").and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter()
        .filter(|row| row.is_object())
        .map(|row| PersonRecord::from_value(row, "key_buyers"))
        .filter(|record| !record.full_name().is_empty())
        .collect()
}

/// Walk a probe payload for person-shaped objects. Probe responses nest
/// people at unpredictable depths, so every object node is tested through
/// the person-signal gate.
pub fn extract_probe_people(payload: &Value, endpoint: &str) -> Vec<PersonRecord> {
    let source = format!("probe:{}", endpoint);
    iter_object_nodes(payload)
        .into_iter()
        .filter_map(|node| PersonRecord::parse_person_like(&Value::Object(node.clone()), &source))
        .collect()
}

/// Collect technology mentions from a payload.
///
/// Direct keys on the top-level object are read first and tagged with
/// `direct_source`; then every nested object is scanned for keys containing
/// "technolog" and tagged with `scan_source`.
pub fn extract_technologies(payload: &Value, direct_source: &str, scan_source: &str) -> Vec<TechRecord> {
    let mut records = Vec::new();

    if let Some(object) = payload.as_object() {
        for key in DIRECT_TECH_KEYS {
            if let Some(value) = object.get(*key) {
                collect_tech_container(value, direct_source, &mut records);
            }
        }
    }

    let top_level = payload.as_object();
    for node in iter_object_nodes(payload) {
        let is_top = top_level.is_some_and(|top| std::ptr::eq(top, node));
        for (key, value) in node {
            let lowered = key.to_lowercase();
            if !lowered.contains("technolog") {
                continue;
            }
            // Top-level direct keys were already collected above.
            if is_top && DIRECT_TECH_KEYS.contains(&key.as_str()) {
                continue;
            }
            collect_tech_container(value, scan_source, &mut records);
        }
    }

    records
}

/// A technology container is a bare string, a list, or an object with a
/// name-like key plus an optional website.
fn collect_tech_container(value: &Value, source: &str, out: &mut Vec<TechRecord>) {
    match value {
        Value::String(_) | Value::Number(_) => {
            if let Some(technology) = as_trimmed_string(value) {
                out.push(TechRecord { technology, website: None, source: source.to_string() });
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_tech_container(item, source, out);
            }
        }
        Value::Object(_) => {
            if let Some(technology) = string_field(value, TECH_NAME_KEYS) {
                out.push(TechRecord {
                    technology,
                    website: string_field(value, TECH_WEBSITE_KEYS),
                    source: source.to_string(),
                });
            }
        }
        _ => {}
    }
}
