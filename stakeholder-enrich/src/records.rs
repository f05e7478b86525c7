//! Canonical person and technology records
//!
//! Every upstream payload that describes a person (directory entries,
//! org-chart rows, probe fragments) is folded into `PersonRecord` at the
//! extraction boundary. Downstream matching, dedup, and profile assembly
//! never touch raw JSON shapes directly.

use crate::matching::normalize_text;
use crate::value_util::{first_non_empty, string_field};
use serde_json::Value;

/// Person-like keys accepted per logical field, in priority order.
const ID_KEYS: &[&str] = &["id", "personId", "contactId", "zoomInfoPersonId"];
const NAME_KEYS: &[&str] = &["name", "fullName", "personName", "contactName"];
const FIRST_NAME_KEYS: &[&str] = &["firstName", "first_name"];
const LAST_NAME_KEYS: &[&str] = &["lastName", "last_name"];
const TITLE_KEYS: &[&str] = &["title", "jobTitle", "personTitle"];
const TITLE_SALESFORCE_KEYS: &[&str] = &["titleSalesforce", "salesforceTitle"];
const TITLE_EXTERNAL_KEYS: &[&str] = &["titleExternal", "externalTitle", "zoomInfoTitle"];
const DEPARTMENT_KEYS: &[&str] = &["department", "departmentName"];
const JOB_FUNCTION_KEYS: &[&str] = &["sfdcJobFunction", "jobFunction"];
const LOCATION_KEYS: &[&str] = &["location", "personLocation", "city"];
const IN_SALESFORCE_KEYS: &[&str] = &["inSalesforce", "isInSalesforce", "salesforceContact"];
const ALUMNI_KEYS: &[&str] = &["protivitiAlumni", "isProtivitiAlumni", "alumni"];
const RH_CONTACT_KEYS: &[&str] = &["hasRoberthalfContact", "contactAtRobertHalf", "roberthalfContact"];
const EXPERIENCE_KEYS: &[&str] = &["pastJobExperience", "pastJobs", "jobHistory"];
const EDUCATION_KEYS: &[&str] = &["education", "educationList", "educationHistory"];
const LINKEDIN_KEYS: &[&str] = &["linkedinUrl", "linkedInUrl", "linkedin"];
const EMAIL_KEYS: &[&str] = &["emailAddress", "email"];

/// A person as seen by the pipeline, regardless of which endpoint produced
/// the raw record.
#[derive(Debug, Clone, Default)]
pub struct PersonRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub title_salesforce: Option<String>,
    pub title_external: Option<String>,
    pub department: Option<String>,
    pub sfdc_job_function: Option<String>,
    pub location: Option<String>,
    pub in_salesforce: Option<Value>,
    pub protiviti_alumni: Option<Value>,
    pub roberthalf_contact: Option<Value>,
    pub past_job_experience: Option<Value>,
    pub education: Option<Value>,
    pub linkedin_url: Option<String>,
    pub email_address: Option<String>,
    /// Which collection step produced the record, e.g. "key_buyers" or
    /// "probe:/api/taggedrelationships".
    pub source: String,
}

impl PersonRecord {
    /// Fold a raw JSON object into a record, tagged with its source.
    pub fn from_value(raw: &Value, source: &str) -> Self {
        Self {
            id: string_field(raw, ID_KEYS),
            name: string_field(raw, NAME_KEYS),
            first_name: string_field(raw, FIRST_NAME_KEYS),
            last_name: string_field(raw, LAST_NAME_KEYS),
            title: string_field(raw, TITLE_KEYS),
            title_salesforce: string_field(raw, TITLE_SALESFORCE_KEYS),
            title_external: string_field(raw, TITLE_EXTERNAL_KEYS),
            department: string_field(raw, DEPARTMENT_KEYS),
            sfdc_job_function: string_field(raw, JOB_FUNCTION_KEYS),
            location: string_field(raw, LOCATION_KEYS),
            in_salesforce: first_non_empty(raw, IN_SALESFORCE_KEYS).cloned(),
            protiviti_alumni: first_non_empty(raw, ALUMNI_KEYS).cloned(),
            roberthalf_contact: first_non_empty(raw, RH_CONTACT_KEYS).cloned(),
            past_job_experience: first_non_empty(raw, EXPERIENCE_KEYS).cloned(),
            education: first_non_empty(raw, EDUCATION_KEYS).cloned(),
            linkedin_url: string_field(raw, LINKEDIN_KEYS),
            email_address: string_field(raw, EMAIL_KEYS),
            source: source.to_string(),
        }
    }

    /// Parse an arbitrary JSON object as a person only when it carries
    /// person signals. Probe payloads mix people with accounts, tags, and
    /// metadata nodes, so a name alone is not enough: a record must also
    /// carry a title, email, or person id.
    pub fn parse_person_like(raw: &Value, source: &str) -> Option<Self> {
        let record = Self::from_value(raw, source);
        if record.full_name().is_empty() {
            return None;
        }
        let has_signal = record.title.is_some()
            || record.title_salesforce.is_some()
            || record.title_external.is_some()
            || record.email_address.is_some()
            || record.id.is_some();
        has_signal.then_some(record)
    }

    /// Display name: explicit full name, else first + last.
    pub fn full_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        parts.join(" ")
    }

    /// Best available title, preferring the Salesforce-sourced one.
    pub fn best_title(&self) -> Option<&str> {
        self.title_salesforce
            .as_deref()
            .or(self.title.as_deref())
            .or(self.title_external.as_deref())
    }

    /// Dedup fingerprint: (id-or-empty, normalized name, normalized title).
    /// Records with distinct ids never collapse; records without ids
    /// collapse on name + title.
    pub fn fingerprint(&self) -> (String, String, String) {
        (
            self.id.clone().unwrap_or_default(),
            normalize_text(&self.full_name()),
            normalize_text(self.best_title().unwrap_or_default()),
        )
    }

    /// Fill fields missing on `self` from `other`. Present fields are never
    /// overwritten; the overlay only supplements.
    pub fn overlay_missing_from(&mut self, other: &Self) {
        fn fill<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
            if target.is_none() {
                target.clone_from(source);
            }
        }
        fill(&mut self.id, &other.id);
        fill(&mut self.name, &other.name);
        fill(&mut self.first_name, &other.first_name);
        fill(&mut self.last_name, &other.last_name);
        fill(&mut self.title, &other.title);
        fill(&mut self.title_salesforce, &other.title_salesforce);
        fill(&mut self.title_external, &other.title_external);
        fill(&mut self.department, &other.department);
        fill(&mut self.sfdc_job_function, &other.sfdc_job_function);
        fill(&mut self.location, &other.location);
        fill(&mut self.in_salesforce, &other.in_salesforce);
        fill(&mut self.protiviti_alumni, &other.protiviti_alumni);
        fill(&mut self.roberthalf_contact, &other.roberthalf_contact);
        fill(&mut self.past_job_experience, &other.past_job_experience);
        fill(&mut self.education, &other.education);
        fill(&mut self.linkedin_url, &other.linkedin_url);
        fill(&mut self.email_address, &other.email_address);
    }
}

/// A technology mention tied to the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechRecord {
    pub technology: String,
    pub website: Option<String>,
    pub source: String,
}

impl TechRecord {
    /// Dedup fingerprint over normalized technology and website.
    pub fn fingerprint(&self) -> (String, String) {
        (
            normalize_text(&self.technology),
            self.website
                .as_deref()
                .map(|w| w.trim().to_lowercase())
                .unwrap_or_default(),
        )
    }
}
