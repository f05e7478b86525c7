//! Engine configuration
//!
//! Every tuning constant of the resolution pipeline lives here as an
//! overridable value with the production default. Values can be overridden
//! from a TOML file; missing keys fall back to defaults.

use crate::error::{EnrichError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for company/person resolution and probing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichConfig {
    /// Minimum fuzzy score to accept a non-exact person match as
    /// authoritative instead of demoting to `not_found`. The 0.72 default is
    /// inherited from production tuning; there is no documented derivation.
    pub match_threshold: f64,

    /// Score boost applied to a company candidate when the supplied key
    /// person matches the candidate's associated name field. Note the boost
    /// can reorder candidates already near 1.0; this is inherited behavior.
    pub key_person_boost: f64,

    /// Minimum name score for the key-person boost to apply.
    pub key_person_boost_gate: f64,

    /// Score floor when the normalized query is contained in the normalized
    /// company name. Guards against edit distance under-scoring long
    /// legal-entity suffixes ("Acme" vs "Acme Corp Ltd").
    pub containment_floor: f64,

    /// Maximum candidate suggestions returned on a failed match.
    pub suggestion_limit: usize,

    /// Company candidates retained on the resolution for diagnostics.
    pub candidate_display_limit: usize,

    /// Org-chart page requested during department sweeps.
    pub department_page: u32,

    /// Org-chart page size during department sweeps. Deliberately small to
    /// bound API call volume.
    pub department_page_size: u32,

    /// Retries for probe endpoints on 5xx responses.
    pub probe_retry_on_5xx: u32,

    /// Base delay between probe retry attempts, in milliseconds.
    pub probe_retry_delay_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.72,
            key_person_boost: 0.05,
            key_person_boost_gate: 0.85,
            containment_floor: 0.95,
            suggestion_limit: 3,
            candidate_display_limit: 10,
            department_page: 1,
            department_page_size: 3,
            probe_retry_on_5xx: 1,
            probe_retry_delay_ms: 250,
        }
    }
}

impl EnrichConfig {
    /// Parse overrides from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EnrichError::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Probe retry delay as a `Duration`.
    pub fn probe_retry_delay(&self) -> Duration {
        Duration::from_millis(self.probe_retry_delay_ms)
    }
}
