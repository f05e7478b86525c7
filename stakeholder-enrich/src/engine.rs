//! Case orchestration
//!
//! `StakeholderEngine::run_case` is the one exposed call: company resolution,
//! tiered person resolution, probing, payload assembly, and the check-list
//! report, executed strictly sequentially. Failures along the way degrade
//! the result; only malformed caller input returns `Err`.

use crate::assembler;
use crate::config::EnrichConfig;
use crate::dedupe::dedupe_people;
use crate::error::{EnrichError, Result};
use crate::extract::extract_probe_people;
use crate::probes::{ProbeOutcome, ProbeRunner};
use crate::records::PersonRecord;
use crate::resolver::person::{decide, find_exact_match};
use crate::resolver::{CompanyResolver, PersonResolver};
use crate::types::{
    derive_status, CaseRequest, CaseResult, Check, CheckStatus, MatchStatus, PersonResolution,
    StakeholderPayload,
};
use chrono::Utc;
use proconnect_client::ProConnectApi;
use tracing::info;
use uuid::Uuid;

pub struct StakeholderEngine<C: ProConnectApi> {
    client: C,
    config: EnrichConfig,
}

impl<C: ProConnectApi> StakeholderEngine<C> {
    pub fn new(client: C, config: EnrichConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Run one enrichment case end to end.
    ///
    /// Returns `Err` only for malformed caller input (blank company/person,
    /// non-object research inputs). Everything else, including total
    /// resolution failure, is reported inside the `CaseResult`.
    pub async fn run_case(&self, request: &CaseRequest) -> Result<CaseResult> {
        let company = request.company.trim();
        let person = request.person.trim();
        if company.is_empty() {
            return Err(EnrichError::InvalidInput("company must not be blank".to_string()));
        }
        if person.is_empty() {
            return Err(EnrichError::InvalidInput("person must not be blank".to_string()));
        }
        if let Some(inputs) = &request.research_inputs {
            if !inputs.is_object() {
                return Err(EnrichError::InvalidInput(
                    "research_inputs must be a JSON object".to_string(),
                ));
            }
        }

        let run_id = Uuid::new_v4();
        info!(%run_id, company, person, "starting case");

        let mut checks: Vec<Check> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        // Company resolution.
        let company_resolver = CompanyResolver::new(&self.client, &self.config);
        let outcome = match &request.account_id_override {
            Some(account_id) => company_resolver.resolve_by_id(account_id).await,
            None => company_resolver.resolve(company, Some(person)).await,
        };
        errors.extend(outcome.errors);

        if request.account_id_override.is_some() {
            checks.push(Check::new(
                "Prospects search",
                CheckStatus::Pass,
                None,
                "Skipped: account id supplied by caller.",
            ));
        } else {
            let search_ok = outcome.resolution.search_success == Some(true);
            checks.push(Check::new(
                "Prospects search",
                if search_ok { CheckStatus::Pass } else { CheckStatus::Fail },
                outcome.resolution.search_status_code,
                format!("{} candidate(s) returned.", outcome.resolution.candidate_count),
            ));
        }

        let account = outcome.account;
        checks.push(Check::new(
            "Account retrieval",
            if account.is_some() { CheckStatus::Pass } else { CheckStatus::Fail },
            outcome.resolution.account_fetch_status_code,
            match &account {
                Some(_) => "Account fetched.".to_string(),
                None => "No account resolved.".to_string(),
            },
        ));

        let Some(account) = account else {
            // Nothing downstream can run without an account.
            return Ok(CaseResult {
                run_id,
                generated_at: Utc::now(),
                status: derive_status(&checks),
                checks,
                warnings,
                errors,
                company_resolution: outcome.resolution,
                person_resolution: PersonResolution {
                    target: person.to_string(),
                    ..Default::default()
                },
                account_summary: None,
                stakeholder_payload: None,
            });
        };

        // Person resolution.
        let person_resolver = PersonResolver::new(&self.client, &self.config);
        let report = person_resolver
            .resolve(&account, person, request.department_hint.as_deref())
            .await;
        let org_chart_warnings = report.warnings.len();
        warnings.extend(report.warnings);
        checks.push(Check::new(
            "Org chart collection",
            if org_chart_warnings == 0 { CheckStatus::Pass } else { CheckStatus::Warn },
            None,
            format!("{} unique people collected.", report.pool.len()),
        ));

        // Probes.
        let account_summary = assembler::build_account_summary(&account);
        let (probe_outcome, probe_people) = if request.enable_probes {
            let runner = ProbeRunner::new(&self.client, &self.config);
            let outcome = runner
                .run(
                    account_summary.account_id.as_deref(),
                    account_summary.zoom_info_account_id.as_deref(),
                )
                .await;
            warnings.extend(outcome.warnings.iter().cloned());
            let people = collect_probe_people(&outcome);
            (outcome, people)
        } else {
            (ProbeOutcome { payloads: Vec::new(), warnings: Vec::new() }, Vec::new())
        };

        // Probe people widen the pool; an unresolved search gets one more
        // chance over the combined set.
        let mut resolution = report.resolution;
        let mut pool = report.pool;
        if !probe_people.is_empty() {
            pool.extend(probe_people.iter().cloned());
            pool = dedupe_people(pool);
            if resolution.status == MatchStatus::NotFound {
                let tiers = resolution.tiers;
                resolution = decide(person, &pool, find_exact_match(&pool, person), tiers, &self.config);
            }
        }

        checks.push(Check::new(
            "Exact person match",
            match resolution.status {
                MatchStatus::Matched => CheckStatus::Pass,
                MatchStatus::NotFound => CheckStatus::Warn,
            },
            None,
            match &resolution.matched {
                Some(matched) => format!("Matched '{}' via {}.", matched.name, matched.source),
                None => format!("Not found; {} suggestion(s).", resolution.suggestions.len()),
            },
        ));

        // Payload assembly.
        let matched_record = resolution
            .matched
            .as_ref()
            .and_then(|matched| find_exact_match(&pool, &matched.name));
        let person_profile = assembler::build_person_profile(
            person,
            matched_record
                .as_ref()
                .zip(resolution.matched.as_ref()),
            &resolution.suggestions,
            &probe_people,
            &mut warnings,
        );

        let technologies =
            assembler::build_technologies_section(&account, &probe_outcome.payloads);
        checks.push(Check::new(
            "Technologies",
            if technologies.items.is_empty() { CheckStatus::Warn } else { CheckStatus::Pass },
            None,
            format!("{} technology record(s).", technologies.items.len()),
        ));

        let mut payload = StakeholderPayload {
            account_context: assembler::build_account_context(&account),
            projects: assembler::build_projects_section(&account),
            opportunities: assembler::build_opportunities_section(&account),
            key_buyers: assembler::build_key_buyers_section(&account),
            org_chart: assembler::build_org_chart_section(&report.org_chart_people),
            technologies,
            person_profile,
            research_inputs: assembler::build_research_inputs(request.research_inputs.as_ref()),
            provenance: Default::default(),
        };
        payload.provenance =
            assembler::build_provenance(&payload, !probe_outcome.payloads.is_empty());

        let status = derive_status(&checks);
        info!(%run_id, ?status, "case finished");
        Ok(CaseResult {
            run_id,
            generated_at: Utc::now(),
            status,
            checks,
            warnings,
            errors,
            company_resolution: outcome.resolution,
            person_resolution: resolution,
            account_summary: Some(account_summary),
            stakeholder_payload: Some(payload),
        })
    }
}

fn collect_probe_people(outcome: &ProbeOutcome) -> Vec<PersonRecord> {
    let mut people = Vec::new();
    for payload in &outcome.payloads {
        people.extend(extract_probe_people(&payload.data, &payload.endpoint));
    }
    dedupe_people(people)
}
