// Turns raw model output into a `Verdict`.
//
// Every provider funnels its text through here, so this is the one place that
// decides what counts as a usable answer.

use super::classifier_models::{ProviderError, Verdict};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // Greedy on purpose: spans from the first '{' to the last '}'.
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Strictly decodes `raw` as a JSON object and extracts the verdict fields.
///
/// The score may be a number or a numeric string and is clamped to [0, 1].
/// A missing label becomes "other"; a missing or null seed becomes `None`.
pub fn parse_verdict(raw: &str) -> Result<Verdict, ProviderError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ProviderError::NotJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ProviderError::NotJson("top-level value is not an object".to_string()))?;

    let score = match object.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or(ProviderError::MissingScore)?;

    let label = match object.get("label") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => Verdict::DEFAULT_LABEL.to_string(),
    };

    let matched_seed = match object.get("matched_seed") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(Verdict {
        score: score.clamp(0.0, 1.0),
        label,
        matched_seed,
    })
}

/// Like `parse_verdict`, but falls back to the first `{...}` span when the
/// text has prose around the JSON (common with small generative models).
pub fn parse_verdict_lenient(raw: &str) -> Result<Verdict, ProviderError> {
    match parse_verdict(raw) {
        Ok(verdict) => Ok(verdict),
        Err(ProviderError::NotJson(reason)) => match extract_json_object(raw) {
            Some(candidate) => parse_verdict(candidate),
            None => Err(ProviderError::NotJson(reason)),
        },
        Err(e) => Err(e),
    }
}

pub fn extract_json_object(raw: &str) -> Option<&str> {
    JSON_OBJECT.find(raw).map(|m| m.as_str())
}
