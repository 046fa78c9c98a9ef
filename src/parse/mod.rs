use regex::Regex;
use serde_json::Value;

use crate::wire::DynamicScreenResponse;

/// Quoted-string fallback keeps only spans whose length sits strictly inside
/// this window, so stray JSON keys and punctuation don't get picked up.
/// Lengths are counted in characters, not bytes, so non-ASCII affirmations
/// are measured the same way ASCII ones are.
const QUOTED_MIN_LEN: usize = 5;
const QUOTED_MAX_LEN: usize = 200;

/// Extract a list of affirmation strings from raw agent output.
///
/// Strategy cascade, first hit wins:
/// 1. direct JSON parse when the trimmed text starts with `[` (an empty array
///    counts as successfully parsed);
/// 2. first bracket-delimited span anywhere in the text, parsed as JSON;
/// 3. every double-quoted substring of plausible length.
///
/// Never fails; an empty vec means nothing usable was found and the caller
/// decides what that means.
pub fn parse_affirmations(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return keep_strings(items);
        }
    }

    // Non-greedy so prose after the array doesn't swallow the span.
    if let Ok(re) = Regex::new(r"(?s)\[.*?\]") {
        if let Some(found) = re.find(trimmed) {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(found.as_str()) {
                return keep_strings(items);
            }
        }
    }

    let mut out = Vec::new();
    if let Ok(re) = Regex::new(r#""([^"]+)""#) {
        for cap in re.captures_iter(trimmed) {
            let candidate = &cap[1];
            let chars = candidate.chars().count();
            if chars > QUOTED_MIN_LEN && chars < QUOTED_MAX_LEN {
                out.push(candidate.to_string());
            }
        }
    }
    out
}

fn keep_strings(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Extract and validate one discovery screen from raw agent output.
///
/// Tries a direct parse when the text starts with `{`, then the first
/// brace-delimited span (greedy, so nested objects stay whole). Returns
/// `None` when nothing validates; callers turn that into an error result.
///
/// `needs_skip` is set for steps the variant designates skippable; only then
/// is a `skip` boolean required in the payload.
pub fn parse_screen(raw: &str, needs_skip: bool) -> Option<DynamicScreenResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(screen) = validate_screen(&value, needs_skip) {
                return Some(screen);
            }
        }
    }

    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    let found = re.find(trimmed)?;
    let value = serde_json::from_str::<Value>(found.as_str()).ok()?;
    validate_screen(&value, needs_skip)
}

/// Structural type-guard over a parsed JSON value. The agent output carries
/// no schema, so every required field is checked by hand:
/// - `question`: string
/// - suggestion lists: arrays of strings, chip-shaped or fragment-shaped
///   (fragment names are renamed into the canonical chip fields)
/// - `readyForAffirmations`: bool
/// - `skip`: bool, required only when `needs_skip`
pub fn validate_screen(value: &Value, needs_skip: bool) -> Option<DynamicScreenResponse> {
    let question = value.get("question")?.as_str()?.to_string();

    let lists = match (string_list(value, "initialChips"), string_list(value, "expandedChips")) {
        (Some(initial), Some(expanded)) => Some((initial, expanded)),
        // Interoperability fallback: accept the other flow's schema.
        _ => match (
            string_list(value, "initialFragments"),
            string_list(value, "expandedFragments"),
        ) {
            (Some(initial), Some(expanded)) => Some((initial, expanded)),
            _ => None,
        },
    };
    let (initial_chips, expanded_chips) = lists?;

    let ready_for_affirmations = value.get("readyForAffirmations")?.as_bool()?;

    let skip = match value.get("skip") {
        Some(v) => v.as_bool()?,
        None if needs_skip => return None,
        None => false,
    };

    let reflective_statement = value
        .get("reflectiveStatement")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(DynamicScreenResponse {
        question,
        initial_chips,
        expanded_chips,
        ready_for_affirmations,
        reflective_statement,
        skip,
    })
}

/// The whole array must be strings; a single non-string element rejects it.
fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    let items = value.get(key)?.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(item.as_str()?.to_string());
    }
    Some(out)
}
