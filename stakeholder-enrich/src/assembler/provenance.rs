//! Provenance tagging
//!
//! Mirrors the payload shape with one `{source, status, confidence}` entry
//! per leaf. This is mandatory output: a consumer must be able to tell an
//! authoritative empty value from one the sources never supplied.

use crate::types::{
    AccountContextProvenance, KeyBuyersProvenance, OpportunitiesProvenance, OrgChartProvenance,
    PersonProfileProvenance, ProjectsProvenance, ProvenanceEntry, ProvenanceMap, ProvenanceSource,
    ResearchInputsProvenance, StakeholderPayload, TechnologiesProvenance,
};

const FULL_CONFIDENCE: f64 = 1.0;

fn entry(source: ProvenanceSource, present: bool) -> ProvenanceEntry {
    ProvenanceEntry::new(source, present, FULL_CONFIDENCE)
}

/// Tag every leaf of `payload`. `probed` selects the technology source:
/// once probe payloads contribute, account-only attribution would be wrong.
pub fn build_provenance(payload: &StakeholderPayload, probed: bool) -> ProvenanceMap {
    use ProvenanceSource::*;

    let account = &payload.account_context;
    let profile = &payload.person_profile;
    let research = &payload.research_inputs;
    let tech_source = if probed { ProconnectOrProbe } else { ProconnectAccount };

    ProvenanceMap {
        account_context: AccountContextProvenance {
            account_id: entry(ProconnectAccount, account.account_id.is_some()),
            company_name: entry(ProconnectAccount, account.company_name.is_some()),
            industry: entry(ProconnectAccount, account.industry.is_some()),
            website: entry(ProconnectAccount, account.website.is_some()),
            ticker: entry(ProconnectAccount, account.ticker.is_some()),
            zoom_info_account_id: entry(ProconnectAccount, account.zoom_info_account_id.is_some()),
            worked_before: entry(Derived, true),
            company_summary_raw: entry(ProconnectAccount, account.company_summary_raw.is_some()),
            company_summary_concise: entry(Derived, account.company_summary_concise.is_some()),
        },
        projects: ProjectsProvenance {
            items: entry(ProconnectAccount, !payload.projects.items.is_empty()),
            total_projects: entry(ProconnectAccount, true),
            solutions_list: entry(Derived, !payload.projects.solutions_list.is_empty()),
        },
        opportunities: OpportunitiesProvenance {
            items: entry(ProconnectAccount, !payload.opportunities.items.is_empty()),
        },
        key_buyers: KeyBuyersProvenance {
            items: entry(ProconnectAccount, !payload.key_buyers.items.is_empty()),
        },
        org_chart: OrgChartProvenance {
            items: entry(ProconnectOrgchart, !payload.org_chart.items.is_empty()),
        },
        technologies: TechnologiesProvenance {
            items: entry(tech_source, !payload.technologies.items.is_empty()),
        },
        person_profile: PersonProfileProvenance {
            match_status: entry(Derived, true),
            matched_person: entry(Derived, profile.matched_person.is_some()),
            title_salesforce: entry(ProconnectOrProbe, profile.title_salesforce.is_some()),
            title_external: entry(ProconnectOrProbe, profile.title_external.is_some()),
            location: entry(ProconnectOrProbe, profile.location.is_some()),
            in_salesforce: entry(ProconnectOrProbe, profile.in_salesforce.is_some()),
            protiviti_alumni: entry(ProconnectOrProbe, profile.protiviti_alumni.is_some()),
            contact_at_robert_half: entry(ProconnectOrProbe, profile.contact_at_robert_half.is_some()),
            past_job_experience: entry(ProconnectOrProbe, !profile.past_job_experience.is_empty()),
            education: entry(ProconnectOrProbe, !profile.education.is_empty()),
            candidate_suggestions: entry(Derived, !profile.candidate_suggestions.is_empty()),
        },
        research_inputs: ResearchInputsProvenance {
            provided_name: entry(ResearchInput, research.provided_name.is_some()),
            provided_role: entry(ResearchInput, research.provided_role.is_some()),
            potential_service_needs: entry(
                ResearchInput,
                !research.potential_service_needs.is_empty(),
            ),
            simulated_research_datapoint: entry(
                ResearchInput,
                research.simulated_research_datapoint.is_some(),
            ),
        },
    }
}
