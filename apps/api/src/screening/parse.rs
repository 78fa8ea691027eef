//! Tolerant extraction of a candidate record from free-form model output.
//!
//! The model is asked for a bare JSON object but may wrap it in prose,
//! code fences or a reasoning section. Parsing never fails: anything that
//! cannot be read yields `CandidateRecord::analysis_error()`.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::llm_client::strip_reasoning;
use crate::models::candidate::{CandidateRecord, FieldKind, REQUIRED_FIELDS, UNIDENTIFIED_NAME};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in the response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Parses a model response into a complete candidate record.
pub fn parse_llm_response(text: &str) -> CandidateRecord {
    match extract_json_object(text) {
        Ok(map) => normalize_record(map),
        Err(e) => {
            warn!("Could not interpret model response: {e}");
            CandidateRecord::analysis_error()
        }
    }
}

/// Slices from the first `{` to the last `}` (after the reasoning section)
/// and parses that span as a JSON object.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    let text = strip_reasoning(text);
    let start = text.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end < start {
        return Err(ParseError::NoJsonObject);
    }

    Ok(serde_json::from_str(&text[start..=end])?)
}

/// Back-fills and repairs required fields, then builds the typed record.
///
/// Also used when loading stored records, so hand-edited files with odd
/// types still load.
pub fn normalize_record(mut map: Map<String, Value>) -> CandidateRecord {
    for (field, kind) in REQUIRED_FIELDS {
        let repaired = match map.remove(*field) {
            None | Some(Value::Null) => kind.default_value(),
            Some(value) => repair_field(*kind, value),
        };
        map.insert((*field).to_string(), repaired);
    }

    let name_is_blank = map
        .get("name")
        .and_then(Value::as_str)
        .map_or(true, |n| n.trim().is_empty());
    if name_is_blank {
        warn!("Candidate name was not identified");
        map.insert("name".to_string(), Value::from(UNIDENTIFIED_NAME));
    }

    if !matches!(map.get("analyzed_at"), None | Some(Value::String(_))) {
        map.remove("analyzed_at");
    }

    serde_json::from_value(Value::Object(map)).unwrap_or_else(|e| {
        warn!("Repaired record still failed to deserialize: {e}");
        CandidateRecord::analysis_error()
    })
}

fn repair_field(kind: FieldKind, value: Value) -> Value {
    match kind {
        FieldKind::Text => Value::String(value_to_text(value)),
        FieldKind::List => match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .map(|v| Value::String(value_to_text(v)))
                    .collect(),
            ),
            Value::String(s) if s.trim().is_empty() => Value::Array(Vec::new()),
            other => Value::Array(vec![Value::String(value_to_text(other))]),
        },
        FieldKind::Score => Value::from(coerce_score(&value)),
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Converts a score of any JSON type into a float clamped to `[0, 10]`.
/// Anything that is not a finite number (or a numeric string) scores `0.0`.
pub fn coerce_score(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(score) if score.is_finite() => score.clamp(MIN_SCORE, MAX_SCORE),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::candidate::{ANALYSIS_ERROR_NAME, ANALYSIS_ERROR_SUMMARY};

    #[test]
    fn test_json_embedded_in_prose_is_found() {
        let text = "Sure! Here is the analysis:\n```json\n{\"name\": \"Ana Souza\", \"score\": 8.2}\n```\nHope it helps.";
        let record = parse_llm_response(text);
        assert_eq!(record.name, "Ana Souza");
        assert!((record.score - 8.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_fields_get_type_defaults() {
        let record = parse_llm_response(r#"{"name": "Ana"}"#);
        assert_eq!(record.area, "");
        assert_eq!(record.final_recommendations, "");
        assert!(record.skills.is_empty());
        assert!(record.areas_for_development.is_empty());
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_reasoning_braces_are_ignored() {
        let text = "<think>maybe {\"name\": \"wrong\"} fits</think>{\"name\": \"Right\", \"score\": 5}";
        assert_eq!(parse_llm_response(text).name, "Right");
    }

    #[test]
    fn test_no_json_yields_default_record() {
        let record = parse_llm_response("I cannot analyze this document.");
        assert_eq!(record.name, ANALYSIS_ERROR_NAME);
        assert_eq!(record.summary, ANALYSIS_ERROR_SUMMARY);
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_broken_json_yields_default_record() {
        let record = parse_llm_response("{\"name\": \"Ana\", \"skills\": [\"Rust\",}");
        assert!(record.is_analysis_error());
    }

    #[test]
    fn test_closing_brace_before_opening_yields_default_record() {
        assert!(parse_llm_response("} nothing here {").is_analysis_error());
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(parse_llm_response(r#"{"name": "A", "score": -3}"#).score, 0.0);
        assert_eq!(parse_llm_response(r#"{"name": "A", "score": 42.5}"#).score, 10.0);
        assert_eq!(parse_llm_response(r#"{"name": "A", "score": "7.5"}"#).score, 7.5);
    }

    #[test]
    fn test_non_numeric_score_is_zero() {
        assert_eq!(coerce_score(&json!("excellent")), 0.0);
        assert_eq!(coerce_score(&json!(null)), 0.0);
        assert_eq!(coerce_score(&json!([8])), 0.0);
        assert_eq!(coerce_score(&json!("NaN")), 0.0);
        assert_eq!(coerce_score(&json!(true)), 0.0);
    }

    #[test]
    fn test_blank_name_is_replaced() {
        let record = parse_llm_response(r#"{"name": "   ", "score": 6}"#);
        assert_eq!(record.name, UNIDENTIFIED_NAME);
        assert_eq!(record.score, 6.0);
    }

    #[test]
    fn test_field_types_are_repaired() {
        let record = parse_llm_response(
            r#"{
                "name": "Ana",
                "skills": "Rust",
                "strengths": [1, "SQL", null],
                "education": ["BSc", "MSc"],
                "summary": 12,
                "interview_questions": ""
            }"#,
        );
        assert_eq!(record.skills, vec!["Rust"]);
        assert_eq!(record.strengths, vec!["1", "SQL"]);
        assert_eq!(record.education, "BSc, MSc");
        assert_eq!(record.summary, "12");
        assert!(record.interview_questions.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let record = parse_llm_response(r#"{"name": "Ana", "github": "ana-dev"}"#);
        assert_eq!(record.extra.get("github").unwrap(), "ana-dev");
    }

    #[test]
    fn test_object_inside_array_is_still_found() {
        let record = parse_llm_response("[{\"name\": 1, \"score\": 4}]");
        assert_eq!(record.name, "1");
        assert_eq!(record.score, 4.0);
    }

    #[test]
    fn test_missing_braces_report_no_object() {
        assert!(matches!(
            extract_json_object("plain text"),
            Err(ParseError::NoJsonObject)
        ));
    }
}
