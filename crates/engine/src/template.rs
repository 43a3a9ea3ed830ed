// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-template field substitution

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Regex pattern for `{{ $json.field }}` (whitespace tolerated) or bare
/// `$json.field` references. Field names are word characters only — no
/// nested paths, no array indices.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\$json\.(\w+)\s*\}\}|\$json\.(\w+)")
        .expect("constant regex pattern is valid")
});

/// Resolve a command template against one record's fields.
///
/// Both surface forms are recognized in a single pass over the template, so
/// a substituted value that itself contains `$json.x` text is never
/// re-substituted. A present field is coerced to its display string form; an
/// absent field resolves to the empty string. Anything else is left verbatim
/// — this function never errors.
pub fn resolve(template: &str, fields: &Map<String, Value>) -> String {
    FIELD_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match fields.get(name) {
                Some(value) => display_string(value),
                None => String::new(),
            }
        })
        .to_string()
}

/// Display form of a field value: strings verbatim, scalars as their JSON
/// text (`null` included), structured values flattened to compact JSON.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
