//! End-to-end case scenarios against a scripted API.

mod support;

use serde_json::{json, Value};
use stakeholder_enrich::types::{MatchTier, Presence};
use stakeholder_enrich::{
    CaseRequest, CheckStatus, EnrichConfig, EnrichError, MatchStatus, StakeholderEngine,
};
use support::MockApi;

fn acme_account() -> Value {
    json!({
        "id": "A-1",
        "name": "Acme Corporation",
        "industry": "Manufacturing",
        "websiteUrl": "https://acme.example",
        "zoomInfoAccountId": "Z-1",
        "numberOfProject": 1,
        "project": [{ "name": "ERP Rollout", "solution": "Technology Consulting" }],
        "keyBuyers": [
            { "firstName": "Jane", "lastName": "Doe", "title": "CFO", "numberOfWins": 2 }
        ],
        "technologies": ["SAP"]
    })
}

fn acme_search_doc() -> Value {
    json!({ "accountId": "A-1", "companyName": "Acme Corporation" })
}

fn request(company: &str, person: &str) -> CaseRequest {
    CaseRequest {
        company: company.to_string(),
        person: person.to_string(),
        department_hint: None,
        account_id_override: None,
        research_inputs: None,
        enable_probes: false,
    }
}

fn engine_with(api: MockApi) -> StakeholderEngine<MockApi> {
    StakeholderEngine::new(api, fast_config())
}

fn fast_config() -> EnrichConfig {
    EnrichConfig { probe_retry_delay_ms: 1, ..EnrichConfig::default() }
}

#[tokio::test]
async fn exact_company_match_resolves_account() {
    support::init_tracing();
    let mut api = MockApi::default();
    api.search_documents = vec![
        json!({ "accountId": "A-2", "companyName": "Acme Widgets LLC" }),
        acme_search_doc(),
    ];
    api.accounts.insert("A-1".to_string(), acme_account());
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();

    assert_eq!(result.company_resolution.selected_score, Some(1.0));
    let summary = result.account_summary.unwrap();
    assert_eq!(summary.account_id.as_deref(), Some("A-1"));
    assert_eq!(summary.account_name.as_deref(), Some("Acme Corporation"));
    assert_eq!(result.status, CheckStatus::Pass);
}

#[tokio::test]
async fn key_buyer_match_short_circuits_org_chart() {
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), acme_account());
    let engine = StakeholderEngine::new(&api, fast_config());

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();

    assert_eq!(result.person_resolution.status, MatchStatus::Matched);
    let matched = result.person_resolution.matched.unwrap();
    assert_eq!(matched.source, "key_buyers");
    assert_eq!(matched.tier, MatchTier::KeyBuyers);
    assert_eq!(matched.score, 1.0);
    // the whole point of tier 1: no org-chart traffic
    assert_eq!(api.org_chart_call_count(), 0);
}

#[tokio::test]
async fn unmatched_person_yields_sorted_suggestions() {
    let mut account = acme_account();
    account["keyBuyers"] = json!([]);
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), account);
    api.org_chart.insert(
        ("C-Suite".to_string(), "Executive".to_string()),
        json!([
            { "name": "Mary Quant", "title": "CEO" },
            { "name": "Mary Quayle", "title": "CFO" },
            { "name": "Mark Quill", "title": "COO" },
            { "name": "Ursula Vexing", "title": "CTO" }
        ]),
    );
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Mary Johnson"))
        .await
        .unwrap();

    assert_eq!(result.person_resolution.status, MatchStatus::NotFound);
    let suggestions = &result.person_resolution.suggestions;
    assert!(!suggestions.is_empty() && suggestions.len() <= 3);
    for pair in suggestions.windows(2) {
        assert!(pair[0].score >= pair[1].score, "suggestions must sort descending");
    }
    assert_eq!(result.status, CheckStatus::Warn);
    let profile = &result.stakeholder_payload.unwrap().person_profile;
    assert_eq!(profile.match_status, MatchStatus::NotFound);
    assert_eq!(profile.candidate_suggestions.len(), suggestions.len());
}

#[tokio::test]
async fn duplicate_person_across_tiers_collapses() {
    let mut account = acme_account();
    account["keyBuyers"] = json!([]);
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), account);
    // same identity surfaces from the executive page and a department page
    api.org_chart.insert(
        ("C-Suite".to_string(), "Executive".to_string()),
        json!([{ "id": 7, "name": "Alice Stone", "title": "CEO" }]),
    );
    api.org_chart.insert(
        ("Finance".to_string(), "Accounting and Finance".to_string()),
        json!([{ "id": 7, "name": "alice STONE", "title": "CEO" }]),
    );
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Nobody Relevant"))
        .await
        .unwrap();

    let alice_suggestions = result
        .person_resolution
        .suggestions
        .iter()
        .filter(|s| s.name.eq_ignore_ascii_case("alice stone"))
        .count();
    assert_eq!(alice_suggestions, 1);
    let payload = result.stakeholder_payload.unwrap();
    let alice_rows = payload
        .org_chart
        .items
        .iter()
        .filter(|item| item.executive_name.eq_ignore_ascii_case("alice stone"))
        .count();
    assert_eq!(alice_rows, 1);
}

#[tokio::test]
async fn missing_account_id_on_top_candidate_fails_run() {
    let mut api = MockApi::default();
    api.search_documents = vec![json!({ "companyName": "Acme Corporation" })];
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();

    assert_eq!(result.status, CheckStatus::Fail);
    assert!(!result.errors.is_empty());
    assert!(result.account_summary.is_none());
    assert!(result.stakeholder_payload.is_none());
    assert_eq!(result.person_resolution.status, MatchStatus::NotFound);
}

#[tokio::test]
async fn missing_directory_id_warns_without_org_chart_calls() {
    let mut account = acme_account();
    account.as_object_mut().unwrap().remove("zoomInfoAccountId");
    account["keyBuyers"] = json!([]);
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), account);
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();

    assert_eq!(result.person_resolution.status, MatchStatus::NotFound);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("zoomInfoAccountId")));
    assert_eq!(result.person_resolution.tiers.department_calls, 0);
    assert_eq!(result.status, CheckStatus::Warn);
}

#[tokio::test]
async fn probe_person_rescues_not_found() {
    let mut account = acme_account();
    account["keyBuyers"] = json!([]);
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), account);
    api.probe_payloads.insert(
        "/api/taggedrelationships".to_string(),
        json!({
            "relationships": [
                { "name": "Sam Hollis", "title": "VP Finance", "location": "Denver" }
            ]
        }),
    );
    let mut request = request("Acme Corporation", "Sam Hollis");
    request.enable_probes = true;
    let engine = engine_with(api);

    let result = engine.run_case(&request).await.unwrap();

    assert_eq!(result.person_resolution.status, MatchStatus::Matched);
    let matched = result.person_resolution.matched.unwrap();
    assert_eq!(matched.tier, MatchTier::Probe);
    assert!(matched.source.starts_with("probe:"));
    let profile = result.stakeholder_payload.unwrap().person_profile;
    assert_eq!(profile.location.as_deref(), Some("Denver"));
}

#[tokio::test]
async fn auth_blocked_probe_is_abandoned_with_warning() {
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), acme_account());
    api.status_overrides.insert("/api/userHistory".to_string(), 403);
    let mut request = request("Acme Corporation", "Jane Doe");
    request.enable_probes = true;
    let engine = StakeholderEngine::new(&api, fast_config());

    let result = engine.run_case(&request).await.unwrap();

    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("/api/userHistory blocked by authorization (403)")));
    // abandoned after the first 403, no retries and no further templates
    assert_eq!(api.calls_to("/api/userHistory"), 1);
    // the run itself still succeeds
    assert_eq!(result.person_resolution.status, MatchStatus::Matched);
}

#[tokio::test]
async fn provenance_distinguishes_present_from_missing() {
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), acme_account());
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();

    let payload = result.stakeholder_payload.unwrap();
    let provenance = &payload.provenance;
    assert_eq!(provenance.account_context.company_name.status, Presence::Present);
    assert_eq!(provenance.account_context.ticker.status, Presence::Missing);
    assert_eq!(provenance.key_buyers.items.status, Presence::Present);
    assert_eq!(provenance.opportunities.items.status, Presence::Missing);
}

#[tokio::test]
async fn department_hint_limits_sweep_to_hinted_department_first() {
    let mut account = acme_account();
    account["keyBuyers"] = json!([]);
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), account);
    api.org_chart.insert(
        ("Human Resources".to_string(), "Human Resource Management".to_string()),
        json!([{ "name": "Dana Field", "title": "CHRO" }]),
    );
    let mut request = request("Acme Corporation", "Dana Field");
    request.department_hint = Some("Human Resources".to_string());
    let engine = engine_with(api);

    let result = engine.run_case(&request).await.unwrap();

    let matched = result.person_resolution.matched.unwrap();
    assert_eq!(matched.tier, MatchTier::DepartmentSweep);
    // executive page + at most the two HR job functions
    assert!(result.person_resolution.tiers.department_calls <= 2);
}

#[tokio::test]
async fn account_id_override_skips_search() {
    let mut api = MockApi::default();
    api.accounts.insert("A-1".to_string(), acme_account());
    let mut request = request("Acme Corporation", "Jane Doe");
    request.account_id_override = Some("A-1".to_string());
    let engine = engine_with(api);

    let result = engine.run_case(&request).await.unwrap();

    assert!(result.company_resolution.account_id_override);
    assert_eq!(result.person_resolution.status, MatchStatus::Matched);
    let search_check = result
        .checks
        .iter()
        .find(|c| c.check == "Prospects search")
        .unwrap();
    assert_eq!(search_check.status, CheckStatus::Pass);
    assert!(search_check.details.contains("Skipped"));
}

#[tokio::test]
async fn malformed_research_inputs_rejected() {
    let api = MockApi::default();
    let mut request = request("Acme Corporation", "Jane Doe");
    request.research_inputs = Some(json!("not an object"));
    let engine = engine_with(api);

    let error = engine.run_case(&request).await.unwrap_err();
    assert!(matches!(error, EnrichError::InvalidInput(_)));
}

#[tokio::test]
async fn research_inputs_echoed_with_provenance() {
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), acme_account());
    let mut request = request("Acme Corporation", "Jane Doe");
    request.research_inputs = Some(json!({
        "provided_name": "Jane Doe",
        "provided_role": "CFO",
        "potential_service_needs": "SOX; Internal Audit"
    }));
    let engine = engine_with(api);

    let result = engine.run_case(&request).await.unwrap();
    let payload = result.stakeholder_payload.unwrap();
    assert_eq!(payload.research_inputs.provided_role.as_deref(), Some("CFO"));
    assert_eq!(
        payload.research_inputs.potential_service_needs,
        vec!["SOX", "Internal Audit"]
    );
    assert_eq!(
        payload.provenance.research_inputs.provided_name.status,
        Presence::Present
    );
    assert_eq!(
        payload.provenance.research_inputs.simulated_research_datapoint.status,
        Presence::Missing
    );
}

#[tokio::test]
async fn result_serializes_to_json() {
    let mut api = MockApi::default();
    api.search_documents = vec![acme_search_doc()];
    api.accounts.insert("A-1".to_string(), acme_account());
    let engine = engine_with(api);

    let result = engine
        .run_case(&request("Acme Corporation", "Jane Doe"))
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "PASS");
    assert_eq!(json["person_resolution"]["status"], "matched");
    assert_eq!(
        json["stakeholder_payload"]["person_profile"]["matched_person"]["tier"],
        "key_buyers"
    );
    assert!(json["run_id"].is_string());
}
