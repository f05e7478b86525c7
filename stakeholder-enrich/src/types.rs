//! Serialized output model
//!
//! Everything a case run emits is a typed `Serialize` struct; raw upstream
//! payloads stay `serde_json::Value` until extraction. Field names follow
//! the wire conventions consumers already parse (camelCase on candidate and
//! account summaries, snake_case elsewhere).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Outcome of a single named check in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// One line of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub check: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<u16>,
    pub details: String,
}

impl Check {
    pub fn new(check: &str, status: CheckStatus, http: Option<u16>, details: impl Into<String>) -> Self {
        Self { check: check.to_string(), status, http, details: details.into() }
    }
}

/// A scored company candidate, retained for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    pub score: f64,
}

/// Company resolution report: how the query resolved (or failed to resolve)
/// to an account.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CompanyResolution {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_success: Option<bool>,
    pub candidate_count: usize,
    pub candidates: Vec<CompanyCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_candidate: Option<CompanyCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_fetch_status_code: Option<u16>,
    pub account_id_override: bool,
}

/// Where a matched or suggested person came from.
pub mod source_tags {
    pub const KEY_BUYERS: &str = "key_buyers";
    pub const ORG_CHART_EXECUTIVE: &str = "org_chart_executive";
    pub const ORG_CHART_DEPARTMENT: &str = "org_chart_department";
    pub const PROBE_PREFIX: &str = "probe:";
}

/// Search tier a match resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    KeyBuyers,
    ExecutiveTeam,
    DepartmentSweep,
    Probe,
}

impl MatchTier {
    /// Map a record's source tag back to its tier.
    pub fn from_source_tag(source: &str) -> Self {
        if source == source_tags::KEY_BUYERS {
            Self::KeyBuyers
        } else if source == source_tags::ORG_CHART_EXECUTIVE {
            Self::ExecutiveTeam
        } else if source.starts_with(source_tags::PROBE_PREFIX) {
            Self::Probe
        } else {
            Self::DepartmentSweep
        }
    }
}

/// The person the pipeline settled on.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPerson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: String,
    pub tier: MatchTier,
    pub score: f64,
}

/// A near-miss offered when no match was accepted.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSuggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: String,
    pub score: f64,
}

/// Person resolution report.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PersonResolution {
    pub target: String,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchedPerson>,
    pub suggestions: Vec<CandidateSuggestion>,
    pub people_checked: usize,
    pub tiers: TierCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    #[default]
    NotFound,
}

/// How many people each tier contributed and how many department calls ran.
#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct TierCounts {
    pub key_buyers: usize,
    pub executive_team: usize,
    pub department_people: usize,
    pub department_calls: usize,
}

/// Slimmed account header reused across payload sections.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_info_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
}

/// Final stakeholder payload, assembled per case.
#[derive(Debug, Clone, Serialize)]
pub struct StakeholderPayload {
    pub account_context: AccountContext,
    pub projects: ProjectsSection,
    pub opportunities: OpportunitiesSection,
    pub key_buyers: KeyBuyersSection,
    pub org_chart: OrgChartSection,
    pub technologies: TechnologiesSection,
    pub person_profile: PersonProfile,
    pub research_inputs: ResearchInputs,
    pub provenance: ProvenanceMap,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AccountContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_info_account_id: Option<String>,
    /// Derived: true when the account carries past projects or a positive
    /// project count.
    pub worked_before: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_summary_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_summary_concise: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ProjectsSection {
    pub items: Vec<ProjectItem>,
    pub total_projects: i64,
    /// Distinct solutions, sorted; falls back to opportunity solutions when
    /// projects carry none.
    pub solutions_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_ended_or_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub em: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct OpportunitiesSection {
    pub items: Vec<OpportunityItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md_d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key_buyer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub em: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct KeyBuyersSection {
    pub items: Vec<KeyBuyerItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyBuyerItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins_5y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opportunity_won_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct OrgChartSection {
    pub items: Vec<OrgChartItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgChartItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_or_department: Option<String>,
    pub executive_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TechnologiesSection {
    pub items: Vec<TechnologyItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnologyItem {
    pub technology: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub source: String,
}

/// Enriched profile of the target person. Populated from the matched record
/// overlaid with probe data; all enrichment fields stay empty on a
/// `not_found`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PersonProfile {
    pub person_requested: String,
    pub match_status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_person: Option<MatchedPerson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_salesforce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_external: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub in_salesforce: Option<bool>,
    pub protiviti_alumni: Option<bool>,
    pub contact_at_robert_half: Option<bool>,
    pub past_job_experience: Vec<String>,
    pub education: Vec<String>,
    pub candidate_suggestions: Vec<CandidateSuggestion>,
}

/// Caller-supplied research context echoed into the payload.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ResearchInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided_role: Option<String>,
    pub potential_service_needs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_research_datapoint: Option<Value>,
}

/// Where a payload field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceSource {
    ProconnectAccount,
    ProconnectOrgchart,
    ProconnectOrProbe,
    Derived,
    ResearchInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Missing,
}

/// One field's provenance line.
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceEntry {
    pub source: ProvenanceSource,
    pub status: Presence,
    pub confidence: f64,
}

impl ProvenanceEntry {
    pub fn new(source: ProvenanceSource, present: bool, confidence: f64) -> Self {
        Self {
            source,
            status: if present { Presence::Present } else { Presence::Missing },
            confidence,
        }
    }
}

impl Default for ProvenanceEntry {
    /// Placeholder before tagging runs: nothing claimed, nothing present.
    fn default() -> Self {
        Self::new(ProvenanceSource::Derived, false, 0.0)
    }
}

/// Field-level provenance mirroring the payload's shape. Every leaf gets an
/// entry, so a consumer can tell an authoritative empty value from one that
/// was never available.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ProvenanceMap {
    pub account_context: AccountContextProvenance,
    pub projects: ProjectsProvenance,
    pub opportunities: OpportunitiesProvenance,
    pub key_buyers: KeyBuyersProvenance,
    pub org_chart: OrgChartProvenance,
    pub technologies: TechnologiesProvenance,
    pub person_profile: PersonProfileProvenance,
    pub research_inputs: ResearchInputsProvenance,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AccountContextProvenance {
    pub account_id: ProvenanceEntry,
    pub company_name: ProvenanceEntry,
    pub industry: ProvenanceEntry,
    pub website: ProvenanceEntry,
    pub ticker: ProvenanceEntry,
    pub zoom_info_account_id: ProvenanceEntry,
    pub worked_before: ProvenanceEntry,
    pub company_summary_raw: ProvenanceEntry,
    pub company_summary_concise: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ProjectsProvenance {
    pub items: ProvenanceEntry,
    pub total_projects: ProvenanceEntry,
    pub solutions_list: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct OpportunitiesProvenance {
    pub items: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct KeyBuyersProvenance {
    pub items: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct OrgChartProvenance {
    pub items: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TechnologiesProvenance {
    pub items: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PersonProfileProvenance {
    pub match_status: ProvenanceEntry,
    pub matched_person: ProvenanceEntry,
    pub title_salesforce: ProvenanceEntry,
    pub title_external: ProvenanceEntry,
    pub location: ProvenanceEntry,
    pub in_salesforce: ProvenanceEntry,
    pub protiviti_alumni: ProvenanceEntry,
    pub contact_at_robert_half: ProvenanceEntry,
    pub past_job_experience: ProvenanceEntry,
    pub education: ProvenanceEntry,
    pub candidate_suggestions: ProvenanceEntry,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ResearchInputsProvenance {
    pub provided_name: ProvenanceEntry,
    pub provided_role: ProvenanceEntry,
    pub potential_service_needs: ProvenanceEntry,
    pub simulated_research_datapoint: ProvenanceEntry,
}

/// A case to run: the (company, person) pair plus optional steering.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CaseRequest {
    pub company: String,
    pub person: String,
    #[serde(default)]
    pub department_hint: Option<String>,
    /// Skip company search and fetch this account directly.
    #[serde(default)]
    pub account_id_override: Option<String>,
    /// Free-form research context; must be a JSON object when present.
    #[serde(default)]
    pub research_inputs: Option<Value>,
    #[serde(default = "default_enable_probes")]
    pub enable_probes: bool,
}

fn default_enable_probes() -> bool {
    true
}

/// Everything a case run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub status: CheckStatus,
    pub checks: Vec<Check>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub company_resolution: CompanyResolution,
    pub person_resolution: PersonResolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_summary: Option<AccountSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakeholder_payload: Option<StakeholderPayload>,
}

/// Worst check status wins: any FAIL fails the run, else any WARN warns it.
pub fn derive_status(checks: &[Check]) -> CheckStatus {
    let mut status = CheckStatus::Pass;
    for check in checks {
        match check.status {
            CheckStatus::Fail => return CheckStatus::Fail,
            CheckStatus::Warn => status = CheckStatus::Warn,
            CheckStatus::Pass => {}
        }
    }
    status
}
