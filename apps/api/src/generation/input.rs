//! Candidate input normalization and validation.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::GenerateError;

const MAX_FULL_NAME: usize = 120;
const MAX_DESIRED_ROLE: usize = 160;
const MAX_EXPERIENCE_SUMMARY: usize = 3000;
const MAX_PREVIOUS_ROLES: usize = 2500;
const MAX_SKILLS: usize = 1800;
const MAX_EDUCATION: usize = 1200;
const MAX_ACHIEVEMENTS: usize = 1800;
const MAX_TARGET_COMPANY: usize = 160;

/// Raw request body. Fields accept arbitrary JSON so that non-string values
/// normalize to empty strings instead of failing deserialization with an
/// opaque 422.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCandidateInput {
    pub full_name: Value,
    pub desired_role: Value,
    pub experience_summary: Value,
    pub previous_roles: Value,
    pub skills: Value,
    pub education: Value,
    pub achievements: Value,
    pub target_company: Value,
}

/// Validated candidate details. Every field is trimmed, truncated to its
/// per-field maximum, and guaranteed non-null; optionals may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInput {
    pub full_name: String,
    pub desired_role: String,
    pub experience_summary: String,
    pub previous_roles: String,
    pub skills: String,
    pub education: String,
    pub achievements: String,
    pub target_company: String,
}

impl CandidateInput {
    pub fn from_raw(raw: RawCandidateInput) -> Result<Self, GenerateError> {
        let input = CandidateInput {
            full_name: normalize_field(&raw.full_name, MAX_FULL_NAME),
            desired_role: normalize_field(&raw.desired_role, MAX_DESIRED_ROLE),
            experience_summary: normalize_field(&raw.experience_summary, MAX_EXPERIENCE_SUMMARY),
            previous_roles: normalize_field(&raw.previous_roles, MAX_PREVIOUS_ROLES),
            skills: normalize_field(&raw.skills, MAX_SKILLS),
            education: normalize_field(&raw.education, MAX_EDUCATION),
            achievements: normalize_field(&raw.achievements, MAX_ACHIEVEMENTS),
            target_company: normalize_field(&raw.target_company, MAX_TARGET_COMPANY),
        };

        if input.full_name.is_empty()
            || input.desired_role.is_empty()
            || input.experience_summary.is_empty()
        {
            return Err(GenerateError::Validation(
                "Missing required fields. Please provide fullName, desiredRole, and experienceSummary."
                    .to_string(),
            ));
        }

        Ok(input)
    }
}

/// Non-string values coerce to the empty string; strings are trimmed then
/// truncated to `max_len` characters.
fn normalize_field(value: &Value, max_len: usize) -> String {
    match value {
        Value::String(s) => s.trim().chars().take(max_len).collect(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(body: Value) -> RawCandidateInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn valid_input_passes_with_optionals_empty() {
        let input = CandidateInput::from_raw(raw(json!({
            "fullName": "  Jane Doe  ",
            "desiredRole": "Backend Engineer",
            "experienceSummary": "Five years of Rust services.",
        })))
        .unwrap();

        assert_eq!(input.full_name, "Jane Doe");
        assert_eq!(input.previous_roles, "");
        assert_eq!(input.target_company, "");
    }

    #[test]
    fn missing_required_field_fails_validation() {
        for body in [
            json!({"desiredRole": "Engineer", "experienceSummary": "x"}),
            json!({"fullName": "Jane", "experienceSummary": "x"}),
            json!({"fullName": "Jane", "desiredRole": "Engineer"}),
            json!({"fullName": "   ", "desiredRole": "Engineer", "experienceSummary": "x"}),
        ] {
            let err = CandidateInput::from_raw(raw(body)).unwrap_err();
            assert!(matches!(err, GenerateError::Validation(_)));
        }
    }

    #[test]
    fn non_string_values_coerce_to_empty() {
        let err = CandidateInput::from_raw(raw(json!({
            "fullName": 42,
            "desiredRole": ["Engineer"],
            "experienceSummary": {"text": "x"},
        })))
        .unwrap_err();
        assert!(matches!(err, GenerateError::Validation(_)));
    }

    #[test]
    fn long_fields_truncate_to_their_maximum() {
        let input = CandidateInput::from_raw(raw(json!({
            "fullName": "a".repeat(500),
            "desiredRole": "Engineer",
            "experienceSummary": "x".repeat(5000),
        })))
        .unwrap();

        assert_eq!(input.full_name.chars().count(), MAX_FULL_NAME);
        assert_eq!(input.experience_summary.chars().count(), MAX_EXPERIENCE_SUMMARY);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let input = CandidateInput::from_raw(raw(json!({
            "fullName": "é".repeat(200),
            "desiredRole": "Engineer",
            "experienceSummary": "x",
        })))
        .unwrap();
        assert_eq!(input.full_name.chars().count(), MAX_FULL_NAME);
    }
}
