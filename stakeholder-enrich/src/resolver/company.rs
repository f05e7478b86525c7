//! Company to account resolution
//!
//! Runs the prospect search, scores every returned candidate against the
//! query, and fetches the full account record for the winner. Resolution
//! failures are reported on the `CompanyResolution` and as error strings;
//! they never abort the run here.

use crate::config::EnrichConfig;
use crate::extract::{extract_company_candidates, RawCompanyCandidate};
use crate::matching::{name_match_score, round4};
use crate::types::{CompanyCandidate, CompanyResolution};
use proconnect_client::ProConnectApi;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of company resolution: the diagnostic report, the raw account
/// payload when one was fetched, and any error strings.
pub struct CompanyOutcome {
    pub resolution: CompanyResolution,
    pub account: Option<Value>,
    pub errors: Vec<String>,
}

pub struct CompanyResolver<'a, C: ProConnectApi> {
    client: &'a C,
    config: &'a EnrichConfig,
}

impl<'a, C: ProConnectApi> CompanyResolver<'a, C> {
    pub fn new(client: &'a C, config: &'a EnrichConfig) -> Self {
        Self { client, config }
    }

    /// Search for `company`, rank candidates, and fetch the top account.
    ///
    /// `person_hint` nudges ranking: when the supplied person scores high
    /// against a candidate's associated name, that candidate gets a small
    /// boost. Useful when a franchise search returns near-identical entries.
    pub async fn resolve(&self, company: &str, person_hint: Option<&str>) -> CompanyOutcome {
        let mut resolution = CompanyResolution { query: company.to_string(), ..Default::default() };
        let mut errors = Vec::new();

        let response = self.client.search_prospects(company).await;
        resolution.search_status_code = response.status_code;
        resolution.search_success = Some(response.success);
        if !response.success {
            errors.push(format!(
                "Prospects search failed with status {}.",
                describe_status(response.status_code)
            ));
            return CompanyOutcome { resolution, account: None, errors };
        }

        let raw_candidates = extract_company_candidates(&response.data);
        resolution.candidate_count = raw_candidates.len();
        if raw_candidates.is_empty() {
            errors.push(format!("Prospects search returned no candidates for '{}'.", company));
            return CompanyOutcome { resolution, account: None, errors };
        }

        let mut scored: Vec<CompanyCandidate> = raw_candidates
            .iter()
            .map(|raw| self.score_candidate(company, person_hint, raw))
            .collect();
        // Stable sort keeps upstream relevance order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let selected = scored[0].clone();
        scored.truncate(self.config.candidate_display_limit);
        debug!(
            candidates = resolution.candidate_count,
            top_score = selected.score,
            "ranked company candidates"
        );
        resolution.selected_score = Some(selected.score);
        resolution.candidates = scored;

        let Some(account_id) = selected.account_id.clone() else {
            warn!(company = %company, "top candidate has no accountId");
            errors.push(format!(
                "Top candidate '{}' has no accountId; cannot fetch account.",
                selected.company_name.as_deref().or(selected.name.as_deref()).unwrap_or("?")
            ));
            resolution.selected_candidate = Some(selected);
            return CompanyOutcome { resolution, account: None, errors };
        };
        resolution.selected_candidate = Some(selected);

        let account_response = self.client.get_account_by_id(&account_id).await;
        resolution.account_fetch_status_code = account_response.status_code;
        if !account_response.success {
            errors.push(format!(
                "Account retrieval for {} failed with status {}.",
                account_id,
                describe_status(account_response.status_code)
            ));
            return CompanyOutcome { resolution, account: None, errors };
        }

        info!(account_id = %account_id, score = resolution.selected_score, "resolved company");
        CompanyOutcome { resolution, account: Some(account_response.data), errors }
    }

    /// Fetch an account directly, skipping search. Used when the caller
    /// pins the account id.
    pub async fn resolve_by_id(&self, account_id: &str) -> CompanyOutcome {
        let mut resolution = CompanyResolution {
            query: account_id.to_string(),
            account_id_override: true,
            ..Default::default()
        };
        let mut errors = Vec::new();

        let response = self.client.get_account_by_id(account_id).await;
        resolution.account_fetch_status_code = response.status_code;
        if !response.success {
            errors.push(format!(
                "Account retrieval for {} failed with status {}.",
                account_id,
                describe_status(response.status_code)
            ));
            return CompanyOutcome { resolution, account: None, errors };
        }
        CompanyOutcome { resolution, account: Some(response.data), errors }
    }

    fn score_candidate(
        &self,
        query: &str,
        person_hint: Option<&str>,
        raw: &RawCompanyCandidate,
    ) -> CompanyCandidate {
        let company_name = raw.company_name.as_deref().unwrap_or("");
        let alt_name = raw.name.as_deref().unwrap_or("");
        let mut score = name_match_score(query, company_name).max(name_match_score(query, alt_name));

        // Containment floor: "Acme" inside "Acme Corporation Ltd" is a near
        // certain hit even when edit distance says otherwise. Only the query
        // inside the company name qualifies; a bare fragment of the query
        // stays at its containment score.
        let normalized_query = crate::matching::normalize_text(query);
        let normalized_company = crate::matching::normalize_text(company_name);
        if !normalized_query.is_empty() && normalized_company.contains(&normalized_query) {
            score = score.max(self.config.containment_floor);
        }

        if let Some(hint) = person_hint {
            if !alt_name.is_empty()
                && name_match_score(hint, alt_name) >= self.config.key_person_boost_gate
            {
                score = (score + self.config.key_person_boost).min(1.0);
            }
        }

        CompanyCandidate {
            account_id: raw.account_id.clone(),
            company_name: raw.company_name.clone(),
            name: raw.name.clone(),
            company_ticker: raw.company_ticker.clone(),
            company_url: raw.company_url.clone(),
            score: round4(score),
        }
    }
}

fn describe_status(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}
