//! Untyped-JSON utilities
//!
//! Upstream payload schemas are inconsistent across endpoints: the same
//! logical field appears under several names, booleans arrive as strings or
//! numbers, lists arrive as delimited strings. These helpers centralize the
//! coercions so no module branches ad hoc per field.
//!
//! Field aliasing is an ordered list of accepted keys per logical field,
//! resolved by "first present and non-empty wins".

use serde_json::{Map, Value};

/// First value among `keys` that is present and non-empty.
///
/// Null and blank-string values are skipped; empty arrays are NOT skipped
/// here (presence of an empty list is still information for some callers).
pub fn first_non_empty<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = payload.as_object()?;
    for key in keys {
        match object.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

/// Scalar-to-string coercion: trimmed strings, numbers, and booleans become
/// strings; containers and null become `None`.
pub fn as_trimmed_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Alias-resolved string field.
pub fn string_field(payload: &Value, keys: &[&str]) -> Option<String> {
    first_non_empty(payload, keys).and_then(as_trimmed_string)
}

/// Coerce heterogeneous boolean representations.
///
/// "yes"/"true"/"y"/"1"/1/true map to true, "no"/"false"/"n"/"0"/0/false to
/// false; anything else is unknown, never guessed.
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce to an integer when the value is numeric or a numeric string.
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce a list-like value into owned strings.
///
/// Accepts a native array, a `;`/newline/`|`-delimited string, or a single
/// scalar. Output is deduplicated case-insensitively, first occurrence wins.
pub fn to_string_list(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                other => as_trimmed_string(other),
            })
            .collect(),
        Value::String(s) => s
            .split([';', '\n', '|'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Null => Vec::new(),
        other => as_trimmed_string(other).into_iter().collect(),
    };
    dedupe_strings_ci(raw)
}

/// Case-insensitive order-preserving string dedup.
pub fn dedupe_strings_ci(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.to_lowercase()) {
            result.push(item);
        }
    }
    result
}

/// Depth-first walk over every JSON object node reachable from `value`,
/// including `value` itself when it is an object.
pub fn iter_object_nodes(value: &Value) -> Vec<&Map<String, Value>> {
    let mut nodes = Vec::new();
    let mut stack = vec![value];
    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                nodes.push(map);
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items.iter()),
            _ => {}
        }
    }
    nodes
}

/// Trim a raw company description to its first few sentences, capped at 600
/// characters.
pub fn concise_summary(raw_summary: &str, max_sentences: usize) -> Option<String> {
    let text = raw_summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    let keep = max_sentences.max(1).min(sentences.len());
    let mut concise = sentences[..keep].join(" ");
    if concise.is_empty() {
        return None;
    }
    if concise.len() > 600 {
        // Back off to a char boundary so multibyte text cannot split.
        let mut cut = 597;
        while !concise.is_char_boundary(cut) {
            cut -= 1;
        }
        concise = format!("{}...", concise[..cut].trim_end());
    }
    Some(concise)
}

/// Presence test used by provenance tagging: null, blank strings, and empty
/// arrays count as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
