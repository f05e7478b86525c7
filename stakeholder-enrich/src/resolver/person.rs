//! Person resolution: cascading tier search
//!
//! Tiers run cheapest-first and short-circuit on an exact name match:
//!   1. key buyers already on the account payload (no network),
//!   2. the executive team page of the org chart,
//!   3. a bounded department sweep (hint department first, then the rest of
//!      the table), one small page per (department, job function) pair.
//!
//! Only the hard `exact_name_equals` predicate short-circuits. Fuzzy
//! acceptance happens once, after the cascade, over the deduplicated pool;
//! a high fuzzy score never stops the cascade early.

use crate::config::EnrichConfig;
use crate::dedupe::dedupe_people;
use crate::departments::{
    job_functions_for, DEPARTMENT_JOB_FUNCTIONS, EXECUTIVE_DEPARTMENT, EXECUTIVE_JOB_FUNCTION,
};
use crate::extract::{extract_employees, extract_key_buyers};
use crate::matching::{exact_name_equals, name_match_score, normalize_text, round4};
use crate::records::PersonRecord;
use crate::types::{
    source_tags, CandidateSuggestion, MatchStatus, MatchTier, MatchedPerson, PersonResolution,
    TierCounts,
};
use proconnect_client::ProConnectApi;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Everything person resolution learned, including the raw candidate pool
/// so later stages (probes) can widen the search and re-decide.
pub struct PersonSearchReport {
    pub resolution: PersonResolution,
    pub warnings: Vec<String>,
    /// Deduplicated pool of everyone seen across tiers.
    pub pool: Vec<PersonRecord>,
    /// Org-chart rows only, for the org-chart payload section.
    pub org_chart_people: Vec<PersonRecord>,
}

pub struct PersonResolver<'a, C: ProConnectApi> {
    client: &'a C,
    config: &'a EnrichConfig,
}

impl<'a, C: ProConnectApi> PersonResolver<'a, C> {
    pub fn new(client: &'a C, config: &'a EnrichConfig) -> Self {
        Self { client, config }
    }

    /// Search `account`'s people for `target`, using `department_hint` to
    /// prioritize the sweep.
    pub async fn resolve(
        &self,
        account: &Value,
        target: &str,
        department_hint: Option<&str>,
    ) -> PersonSearchReport {
        let mut warnings = Vec::new();
        let mut pool: Vec<PersonRecord> = Vec::new();
        let mut org_chart_people: Vec<PersonRecord> = Vec::new();
        let mut tiers = TierCounts::default();

        // Tier 1: key buyers, free of network cost.
        let key_buyers = extract_key_buyers(account);
        tiers.key_buyers = key_buyers.len();
        pool.extend(key_buyers);
        if let Some(exact) = find_exact_match(&pool, target) {
            info!(person = %target, tier = "key_buyers", "exact match");
            return self.finish(target, pool, org_chart_people, tiers, warnings, Some(exact));
        }

        let zoom_info_account_id = crate::value_util::string_field(
            account,
            &["zoomInfoAccountId", "zoomInfoId", "zoom_info_account_id"],
        );
        let Some(directory_id) = zoom_info_account_id else {
            warnings.push(
                "Account does not include zoomInfoAccountId; org chart lookup skipped.".to_string(),
            );
            return self.finish(target, pool, org_chart_people, tiers, warnings, None);
        };

        // Tier 2: executive team.
        let response = self
            .client
            .get_org_chart(
                &directory_id,
                EXECUTIVE_DEPARTMENT,
                EXECUTIVE_JOB_FUNCTION,
                None,
                None,
            )
            .await;
        if response.success {
            let executives = extract_employees(&response.data, source_tags::ORG_CHART_EXECUTIVE);
            tiers.executive_team = executives.len();
            org_chart_people.extend(executives.iter().cloned());
            pool.extend(executives);
        } else {
            warnings.push(format!(
                "Org chart executive lookup failed with status {}.",
                describe_status(response.status_code)
            ));
        }
        pool = dedupe_people(pool);
        if let Some(exact) = find_exact_match(&pool, target) {
            info!(person = %target, tier = "executive_team", "exact match");
            return self.finish(target, pool, org_chart_people, tiers, warnings, Some(exact));
        }

        // Tier 3: department sweep, hint first.
        let sweep_order = sweep_departments(department_hint);
        for department in sweep_order {
            let Some(functions) = job_functions_for(department) else {
                continue;
            };
            for function in functions {
                let response = self
                    .client
                    .get_org_chart(
                        &directory_id,
                        department,
                        function,
                        Some(self.config.department_page),
                        Some(self.config.department_page_size),
                    )
                    .await;
                tiers.department_calls += 1;
                if !response.success {
                    warnings.push(format!(
                        "Org chart {}/{} failed with status {}.",
                        department,
                        function,
                        describe_status(response.status_code)
                    ));
                    continue;
                }
                let mut people =
                    extract_employees(&response.data, source_tags::ORG_CHART_DEPARTMENT);
                for person in &mut people {
                    if person.department.is_none() {
                        person.department = Some(department.to_string());
                    }
                }
                tiers.department_people += people.len();
                org_chart_people.extend(people.iter().cloned());
                pool.extend(people);
            }
            pool = dedupe_people(pool);
            if let Some(exact) = find_exact_match(&pool, target) {
                info!(person = %target, tier = "department_sweep", department, "exact match");
                return self.finish(target, pool, org_chart_people, tiers, warnings, Some(exact));
            }
        }

        debug!(person = %target, checked = pool.len(), "cascade exhausted without exact match");
        self.finish(target, pool, org_chart_people, tiers, warnings, None)
    }

    fn finish(
        &self,
        target: &str,
        pool: Vec<PersonRecord>,
        org_chart_people: Vec<PersonRecord>,
        tiers: TierCounts,
        warnings: Vec<String>,
        exact: Option<PersonRecord>,
    ) -> PersonSearchReport {
        let pool = dedupe_people(pool);
        let org_chart_people = dedupe_people(org_chart_people);
        let resolution = decide(target, &pool, exact, tiers, self.config);
        PersonSearchReport { resolution, warnings, pool, org_chart_people }
    }
}

/// Final match decision over a candidate pool: exact wins at 1.0, else the
/// best fuzzy candidate at or above the threshold, else `not_found` with
/// near-miss suggestions.
pub fn decide(
    target: &str,
    pool: &[PersonRecord],
    exact: Option<PersonRecord>,
    tiers: TierCounts,
    config: &EnrichConfig,
) -> PersonResolution {
    let mut resolution = PersonResolution {
        target: target.to_string(),
        people_checked: pool.len(),
        tiers,
        ..Default::default()
    };

    if let Some(person) = exact {
        resolution.status = MatchStatus::Matched;
        resolution.matched = Some(matched_from(&person, 1.0));
        return resolution;
    }

    if let Some((score, person)) = best_fuzzy_match(pool, target) {
        if score >= config.match_threshold {
            info!(person = %target, score, source = %person.source, "fuzzy match accepted");
            resolution.status = MatchStatus::Matched;
            resolution.matched = Some(matched_from(person, score));
            return resolution;
        }
    }

    warn!(person = %target, checked = pool.len(), "person not found");
    resolution.suggestions = top_candidates(pool, target, config.suggestion_limit);
    resolution
}

/// First pool member whose name is exactly equal (normalized) to the target.
pub fn find_exact_match(pool: &[PersonRecord], target: &str) -> Option<PersonRecord> {
    pool.iter()
        .find(|person| exact_name_equals(&person.full_name(), target))
        .cloned()
}

/// Highest-scoring pool member, ties broken by pool order.
pub fn best_fuzzy_match<'p>(pool: &'p [PersonRecord], target: &str) -> Option<(f64, &'p PersonRecord)> {
    let mut best: Option<(f64, &PersonRecord)> = None;
    for person in pool {
        let score = round4(name_match_score(target, &person.full_name()));
        match best {
            Some((best_score, _)) if best_score >= score => {}
            _ => best = Some((score, person)),
        }
    }
    best
}

/// Near-miss suggestions: zero scores dropped, deduped on (name, title),
/// sorted by score descending with name ascending as the tie-break,
/// truncated to `limit`.
pub fn top_candidates(pool: &[PersonRecord], target: &str, limit: usize) -> Vec<CandidateSuggestion> {
    let mut seen = std::collections::HashSet::new();
    let mut suggestions: Vec<CandidateSuggestion> = Vec::new();
    for person in pool {
        let name = person.full_name();
        if name.is_empty() {
            continue;
        }
        let score = round4(name_match_score(target, &name));
        if score <= 0.0 {
            continue;
        }
        let key = (
            normalize_text(&name),
            normalize_text(person.best_title().unwrap_or_default()),
        );
        if !seen.insert(key) {
            continue;
        }
        suggestions.push(CandidateSuggestion {
            score,
            name,
            title: person.best_title().map(str::to_string),
            source: person.source.clone(),
        });
    }
    suggestions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    suggestions.truncate(limit);
    suggestions
}

fn matched_from(person: &PersonRecord, score: f64) -> MatchedPerson {
    MatchedPerson {
        name: person.full_name(),
        title: person.best_title().map(str::to_string),
        source: person.source.clone(),
        tier: MatchTier::from_source_tag(&person.source),
        score: round4(score),
    }
}

/// Hint department first when recognized, then the rest in table order.
fn sweep_departments(hint: Option<&str>) -> Vec<&'static str> {
    let mut order: Vec<&'static str> = Vec::with_capacity(DEPARTMENT_JOB_FUNCTIONS.len());
    if let Some(hint) = hint {
        if let Some((name, _)) = DEPARTMENT_JOB_FUNCTIONS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(hint.trim()))
        {
            order.push(*name);
        }
    }
    for (name, _) in DEPARTMENT_JOB_FUNCTIONS {
        if !order.contains(name) {
            order.push(*name);
        }
    }
    order
}

fn describe_status(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}
