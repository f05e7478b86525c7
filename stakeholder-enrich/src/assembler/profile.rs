//! Person profile assembly
//!
//! Merges the matched person with probe-sourced fragments. The overlay is
//! strictly additive: probe data fills gaps, it never replaces a field the
//! authoritative tier already supplied.

use crate::matching::exact_name_equals;
use crate::records::PersonRecord;
use crate::types::{CandidateSuggestion, MatchStatus, MatchedPerson, PersonProfile};
use crate::value_util::{to_bool, to_string_list};
use tracing::debug;

/// Build the enriched profile for the requested person.
///
/// On `not_found` only the request echo and suggestions are populated. On a
/// match the matched record is overlaid with the exact-name probe record (if
/// any), then the enrichment fields are coerced out of the merged record.
/// When every enrichment field comes up empty a warning is appended.
pub fn build_person_profile(
    person_requested: &str,
    matched: Option<(&PersonRecord, &MatchedPerson)>,
    suggestions: &[CandidateSuggestion],
    probe_people: &[PersonRecord],
    warnings: &mut Vec<String>,
) -> PersonProfile {
    let mut profile = PersonProfile {
        person_requested: person_requested.to_string(),
        candidate_suggestions: suggestions.to_vec(),
        ..Default::default()
    };

    let Some((record, matched_person)) = matched else {
        return profile;
    };
    profile.match_status = MatchStatus::Matched;

    let mut merged = record.clone();
    if let Some(overlay) = find_probe_overlay(&merged.full_name(), probe_people) {
        debug!(person = %merged.full_name(), source = %overlay.source, "applying probe overlay");
        merged.overlay_missing_from(overlay);
    }

    profile.matched_person = Some(matched_person.clone());
    profile.title_salesforce = merged.title_salesforce.clone().or_else(|| merged.title.clone());
    profile.title_external = merged.title_external.clone();
    profile.location = merged.location.clone();
    profile.in_salesforce = merged.in_salesforce.as_ref().and_then(to_bool);
    profile.protiviti_alumni = merged.protiviti_alumni.as_ref().and_then(to_bool);
    profile.contact_at_robert_half = merged.roberthalf_contact.as_ref().and_then(to_bool);
    profile.past_job_experience = merged
        .past_job_experience
        .as_ref()
        .map(to_string_list)
        .unwrap_or_default();
    profile.education = merged.education.as_ref().map(to_string_list).unwrap_or_default();

    let enrichment_empty = profile.title_salesforce.is_none()
        && profile.title_external.is_none()
        && profile.location.is_none()
        && profile.in_salesforce.is_none()
        && profile.protiviti_alumni.is_none()
        && profile.contact_at_robert_half.is_none()
        && profile.past_job_experience.is_empty()
        && profile.education.is_empty();
    if enrichment_empty {
        warnings.push("Person profile fields were unavailable from ProConnect sources.".to_string());
    }

    profile
}

/// First probe record whose name exactly equals the matched person's name.
fn find_probe_overlay<'p>(name: &str, probe_people: &'p [PersonRecord]) -> Option<&'p PersonRecord> {
    if name.is_empty() {
        return None;
    }
    probe_people
        .iter()
        .find(|person| exact_name_equals(&person.full_name(), name))
}
