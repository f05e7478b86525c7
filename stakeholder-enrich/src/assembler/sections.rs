//! Payload section builders
//!
//! Each builder reads the raw account payload (or collected records) and
//! emits one typed section. Builders never fail; absent data produces empty
//! sections.

use crate::dedupe::{dedupe_by_key, dedupe_tech_records};
use crate::extract::extract_technologies;
use crate::matching::normalize_text;
use crate::probes::ProbePayload;
use crate::records::PersonRecord;
use crate::types::{
    AccountContext, AccountSummary, KeyBuyerItem, KeyBuyersSection, OpportunitiesSection,
    OpportunityItem, OrgChartItem, OrgChartSection, ProjectItem, ProjectsSection, ResearchInputs,
    TechnologiesSection, TechnologyItem,
};
use crate::value_util::{
    concise_summary, first_non_empty, string_field, to_int, to_string_list,
};
use serde_json::Value;
use std::collections::BTreeSet;

const SUMMARY_SENTENCES: usize = 3;

pub fn build_account_summary(account: &Value) -> AccountSummary {
    AccountSummary {
        account_id: string_field(account, &["id", "accountId"]),
        account_name: string_field(account, &["name", "companyName"]),
        zoom_info_account_id: string_field(account, &["zoomInfoAccountId"]),
        industry: string_field(account, &["industry"]),
        website: string_field(account, &["websiteUrl", "website"]),
        ticker: string_field(account, &["tickerSymbol", "ticker"]),
    }
}

pub fn build_account_context(account: &Value) -> AccountContext {
    let projects = account.get("project").and_then(Value::as_array);
    let project_count = account.get("numberOfProject").and_then(to_int);
    let worked_before =
        project_count.is_some_and(|n| n > 0) || projects.is_some_and(|p| !p.is_empty());

    let raw_summary = string_field(account, &["companyDescription", "description"]);
    let concise = raw_summary
        .as_deref()
        .and_then(|raw| concise_summary(raw, SUMMARY_SENTENCES));

    AccountContext {
        account_id: string_field(account, &["id", "accountId"]),
        company_name: string_field(account, &["name", "companyName"]),
        industry: string_field(account, &["industry"]),
        website: string_field(account, &["websiteUrl", "website"]),
        ticker: string_field(account, &["tickerSymbol", "ticker"]),
        zoom_info_account_id: string_field(account, &["zoomInfoAccountId"]),
        worked_before,
        company_summary_raw: raw_summary,
        company_summary_concise: concise,
    }
}

pub fn build_projects_section(account: &Value) -> ProjectsSection {
    let mut items = Vec::new();
    let mut solutions: BTreeSet<String> = BTreeSet::new();

    if let Some(projects) = account.get("project").and_then(Value::as_array) {
        for project in projects.iter().filter(|p| p.is_object()) {
            let solution = string_field(project, &["solution"]);
            if let Some(solution) = &solution {
                solutions.insert(solution.clone());
            }
            items.push(ProjectItem {
                project_name: string_field(project, &["name", "projectName", "budgetKey"]),
                year_ended_or_status: string_field(
                    project,
                    &["endedDate", "projectStatus", "yearEnded"],
                ),
                solution,
                emd: string_field(project, &["engagementManagingDirector", "emd"]),
                em: string_field(project, &["engagementManager", "em"]),
            });
        }
    }

    let total_projects = account
        .get("numberOfProject")
        .and_then(to_int)
        .unwrap_or(items.len() as i64);

    // Solutions fall back to opportunity data when no project names one.
    if solutions.is_empty() {
        for key in ["allOpportunity", "openOpportunity"] {
            let Some(opportunities) = account.get(key).and_then(Value::as_array) else {
                continue;
            };
            for opportunity in opportunities {
                if let Some(solution) = string_field(opportunity, &["solution"]) {
                    solutions.insert(solution);
                }
            }
        }
    }

    ProjectsSection {
        items,
        total_projects,
        solutions_list: solutions.into_iter().collect(),
    }
}

pub fn build_opportunities_section(account: &Value) -> OpportunitiesSection {
    let opportunities = account
        .get("allOpportunity")
        .and_then(Value::as_array)
        .or_else(|| account.get("openOpportunity").and_then(Value::as_array));

    let items = opportunities
        .map(|rows| {
            rows.iter()
                .filter(|row| row.is_object())
                .map(|opp| OpportunityItem {
                    opportunity: string_field(opp, &["name", "opportunity", "opportunityName"]),
                    close_date: string_field(opp, &["opportunityCloseDate", "closeDate"]),
                    md_d: string_field(opp, &["opportunityManagingDirector", "md", "director"]),
                    primary_key_buyer: string_field(opp, &["primaryKeyBuyer"]),
                    solution: string_field(opp, &["solution"]),
                    service_name: string_field(opp, &["serviceOffering", "serviceName"]),
                    stage: string_field(opp, &["opportunityStage", "stage"]),
                    em: string_field(opp, &["engagementManager"]),
                })
                .collect()
        })
        .unwrap_or_default();

    OpportunitiesSection { items }
}

pub fn build_key_buyers_section(account: &Value) -> KeyBuyersSection {
    let Some(buyers) = account.get("keyBuyers").and_then(Value::as_array) else {
        return KeyBuyersSection::default();
    };

    let items = buyers
        .iter()
        .filter(|buyer| buyer.is_object())
        .filter_map(|buyer| {
            let record = PersonRecord::from_value(buyer, "key_buyers");
            let name = record.full_name();
            if name.is_empty() {
                return None;
            }
            Some(KeyBuyerItem {
                name,
                title: string_field(buyer, &["title"]),
                wins_5y: first_non_empty(buyer, &["numberOfWins", "wins", "winCount"])
                    .and_then(to_int),
                last_opportunity_won_date: string_field(
                    buyer,
                    &["lastOpportunityWonDate", "lastWinDate"],
                ),
            })
        })
        .collect();

    KeyBuyersSection { items }
}

/// Org-chart snapshot from the deduplicated org-chart rows. Items dedupe on
/// the full (department, name, title) triple.
pub fn build_org_chart_section(org_chart_people: &[PersonRecord]) -> OrgChartSection {
    let items: Vec<OrgChartItem> = org_chart_people
        .iter()
        .filter_map(|person| {
            let name = person.full_name();
            if name.is_empty() {
                return None;
            }
            Some(OrgChartItem {
                category_or_department: person
                    .department
                    .clone()
                    .or_else(|| person.sfdc_job_function.clone()),
                executive_name: name,
                title: person.title.clone(),
            })
        })
        .collect();

    let items = dedupe_by_key(items, |item| {
        (
            normalize_text(item.category_or_department.as_deref().unwrap_or_default()),
            normalize_text(&item.executive_name),
            normalize_text(item.title.as_deref().unwrap_or_default()),
        )
    });
    OrgChartSection { items }
}

/// Technologies from the account plus every probe payload, deduplicated on
/// (technology, website).
pub fn build_technologies_section(
    account: &Value,
    probe_payloads: &[ProbePayload],
) -> TechnologiesSection {
    let mut records = extract_technologies(account, "proconnect_account", "proconnect_account");
    for payload in probe_payloads {
        let source = format!("probe:{}", payload.endpoint);
        records.extend(extract_technologies(&payload.data, &source, &source));
    }

    let items = dedupe_tech_records(records)
        .into_iter()
        .map(|record| TechnologyItem {
            technology: record.technology,
            website: record.website,
            source: record.source,
        })
        .collect();
    TechnologiesSection { items }
}

/// Normalize caller-supplied research context into the typed echo. Unknown
/// keys are ignored; only the four documented fields are read.
pub fn build_research_inputs(value: Option<&Value>) -> ResearchInputs {
    let Some(value) = value else {
        return ResearchInputs::default();
    };
    ResearchInputs {
        provided_name: string_field(value, &["provided_name", "providedName", "Provided Name"]),
        provided_role: string_field(value, &["provided_role", "providedRole", "Provided Role"]),
        potential_service_needs: first_non_empty(
            value,
            &[
                "potential_service_needs",
                "potentialServiceNeeds",
                "Potential Service Needs",
            ],
        )
        .map(to_string_list)
        .unwrap_or_default(),
        simulated_research_datapoint: first_non_empty(
            value,
            &[
                "simulated_research_datapoint",
                "simulatedResearchDatapoint",
                "Simulated Research Datapoint",
            ],
        )
        .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_account() -> Value {
        json!({
            "id": "A-1",
            "name": "Acme Corp",
            "industry": "Widgets",
            "websiteUrl": "https://acme.example",
            "tickerSymbol": "ACME",
            "zoomInfoAccountId": "Z-1",
            "numberOfProject": 2,
            "companyDescription": "Acme makes widgets. It sells globally. Founded 1952. More text.",
            "project": [
                { "name": "ERP Rollout", "endedDate": "2023-06-01", "solution": "Technology Consulting" },
                { "budgetKey": "BK-9", "projectStatus": "Active" }
            ],
            "allOpportunity": [
                { "name": "Audit FY24", "opportunityStage": "Won", "solution": "Internal Audit",
                  "opportunityCloseDate": "2024-01-15", "primaryKeyBuyer": "Jane Doe" }
            ],
            "keyBuyers": [
                { "firstName": "Jane", "lastName": "Doe", "title": "CFO",
                  "numberOfWins": 3, "lastOpportunityWonDate": "2024-01-15" }
            ]
        })
    }

    #[test]
    fn test_account_context_derivations() {
        let context = build_account_context(&sample_account());
        assert_eq!(context.company_name.as_deref(), Some("Acme Corp"));
        assert!(context.worked_before);
        assert_eq!(
            context.company_summary_concise.as_deref(),
            Some("Acme makes widgets. It sells globally. Founded 1952.")
        );
    }

    #[test]
    fn test_worked_before_false_without_projects() {
        let context = build_account_context(&json!({ "name": "Acme" }));
        assert!(!context.worked_before);
        assert!(context.company_summary_raw.is_none());
    }

    #[test]
    fn test_projects_section_collects_solutions() {
        let section = build_projects_section(&sample_account());
        assert_eq!(section.items.len(), 2);
        assert_eq!(section.total_projects, 2);
        assert_eq!(section.solutions_list, vec!["Technology Consulting"]);
        assert_eq!(section.items[1].project_name.as_deref(), Some("BK-9"));
    }

    #[test]
    fn test_projects_solutions_fall_back_to_opportunities() {
        let account = json!({
            "project": [{ "name": "P1" }],
            "allOpportunity": [{ "solution": "Risk Advisory" }]
        });
        let section = build_projects_section(&account);
        assert_eq!(section.solutions_list, vec!["Risk Advisory"]);
        assert_eq!(section.total_projects, 1);
    }

    #[test]
    fn test_opportunities_section_prefers_all_opportunity() {
        let section = build_opportunities_section(&sample_account());
        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].opportunity.as_deref(), Some("Audit FY24"));
        assert_eq!(section.items[0].stage.as_deref(), Some("Won"));

        let open_only = json!({ "openOpportunity": [{ "name": "Open One" }] });
        let section = build_opportunities_section(&open_only);
        assert_eq!(section.items[0].opportunity.as_deref(), Some("Open One"));
    }

    #[test]
    fn test_key_buyers_section() {
        let section = build_key_buyers_section(&sample_account());
        assert_eq!(section.items.len(), 1);
        let buyer = &section.items[0];
        assert_eq!(buyer.name, "Jane Doe");
        assert_eq!(buyer.wins_5y, Some(3));
        assert_eq!(buyer.last_opportunity_won_date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_org_chart_section_dedupes_triples() {
        let people = vec![
            PersonRecord::from_value(
                &json!({ "name": "Alice Stone", "title": "CEO", "department": "C-Suite" }),
                "org_chart_executive",
            ),
            PersonRecord::from_value(
                &json!({ "name": "ALICE stone", "title": "CEO", "department": "C-Suite" }),
                "org_chart_department",
            ),
            PersonRecord::from_value(
                &json!({ "name": "Alice Stone", "title": "CEO", "sfdcJobFunction": "Executive" }),
                "org_chart_department",
            ),
        ];
        let section = build_org_chart_section(&people);
        // same (dept, name, title) collapses; different department survives
        assert_eq!(section.items.len(), 2);
        assert_eq!(section.items[0].category_or_department.as_deref(), Some("C-Suite"));
        assert_eq!(section.items[1].category_or_department.as_deref(), Some("Executive"));
    }

    #[test]
    fn test_technologies_merge_account_and_probes() {
        let account = json!({ "technologies": ["SAP"] });
        let probe = ProbePayload {
            endpoint: "/api/userHistory".to_string(),
            params: vec![],
            status_code: Some(200),
            data: json!({ "companyTechnology": ["SAP", "Oracle"] }),
        };
        let section = build_technologies_section(&account, &[probe]);
        let names: Vec<&str> = section.items.iter().map(|t| t.technology.as_str()).collect();
        assert_eq!(names, vec!["SAP", "Oracle"]);
        assert_eq!(section.items[0].source, "proconnect_account");
        assert_eq!(section.items[1].source, "probe:/api/userHistory");
    }

    #[test]
    fn test_research_inputs_coercion() {
        let value = json!({
            "provided_name": "Jane Doe",
            "providedRole": "CFO",
            "potential_service_needs": "SOX; Internal Audit|SOX",
            "simulated_research_datapoint": { "note": "met at conference" }
        });
        let inputs = build_research_inputs(Some(&value));
        assert_eq!(inputs.provided_name.as_deref(), Some("Jane Doe"));
        assert_eq!(inputs.provided_role.as_deref(), Some("CFO"));
        assert_eq!(inputs.potential_service_needs, vec!["SOX", "Internal Audit"]);
        assert!(inputs.simulated_research_datapoint.is_some());

        let empty = build_research_inputs(None);
        assert!(empty.provided_name.is_none());
        assert!(empty.potential_service_needs.is_empty());
    }
}
