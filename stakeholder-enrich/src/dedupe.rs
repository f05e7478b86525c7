//! Order-preserving deduplication
//!
//! Records collected across tiers and probes overlap heavily; every merge
//! point dedups with first-occurrence-wins so collection order (and hence
//! tier priority) decides which copy survives.

use crate::records::{PersonRecord, TechRecord};
use std::collections::HashSet;
use std::hash::Hash;

/// Generic first-wins dedup keyed by `key_fn`.
pub fn dedupe_by_key<T, K, F>(items: Vec<T>, key_fn: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(key_fn(&item)) {
            result.push(item);
        }
    }
    result
}

/// Dedup people across tiers on (id, normalized name, normalized title).
pub fn dedupe_people(people: Vec<PersonRecord>) -> Vec<PersonRecord> {
    dedupe_by_key(people, PersonRecord::fingerprint)
}

/// Dedup technology mentions on (normalized technology, normalized website).
pub fn dedupe_tech_records(records: Vec<TechRecord>) -> Vec<TechRecord> {
    dedupe_by_key(records, TechRecord::fingerprint)
}
