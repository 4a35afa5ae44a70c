//! Prompt construction for the question generator
//!
//! `format_profile` flattens the profile into one line per key so the model
//! sees a compact, stable block. Identical input always yields an identical
//! prompt.

use crate::types::{Product, Profile};
use serde_json::Value;

/// Flatten a profile into `key: value` lines, keys sorted lexicographically
///
/// - scalar  → `key: value`
/// - list    → `key: a, b, c`
/// - mapping → `key: k1=v1, k2=v2` (insertion order, one level only)
pub fn format_profile(profile: &Profile) -> String {
    let mut keys: Vec<&String> = profile.fields().keys().collect();
    keys.sort();

    keys.into_iter()
        .map(|key| {
            let rendered = match &profile.fields()[key] {
                Value::Object(nested) => nested
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, render_scalar(v)))
                    .collect::<Vec<_>>()
                    .join(", "),
                Value::Array(items) => items
                    .iter()
                    .map(render_scalar)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => render_scalar(other),
            };
            format!("{}: {}", key, rendered)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strings unquoted, null empty, everything else as compact JSON
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build the generation prompt for one product
pub fn build_prompt(product: &Product, formatted_profile: &str) -> String {
    format!(
        r#"Generate ONE concise transparency follow-up question.
Focus ONLY on: sourcing, testing, compliance, traceability, certifications, quality checks, safety, or ingredient origin.
Avoid generic, meta, or repetitive questions.

Rules:
- MUST be under 20 words.
- MUST be meaningful.
- MUST be category-appropriate.
- NEVER ask "any other questions" or "what else".
- NEVER ask for product name, manufacturer, brand, or batch/lot number.

Product: {name}
Category: {category}
Claim: {claim}
Description: {description}

Profile:
{profile}

Return ONLY the question text."#,
        name = product.name.trim(),
        category = product.category.trim(),
        claim = product.claim.trim(),
        description = product.description.trim(),
        profile = formatted_profile,
    )
}
