//! # marksheet-core
//!
//! Validation and normalization boundary for rubric-scored answer evaluations.
//!
//! An external scorer grades a learner's answer and returns JSON. This crate
//! decides whether that JSON can be trusted:
//! - Is the score an integer within the active rubric's ceiling?
//! - Is there a justification?
//! - Did the scorer itself report a failure?
//!
//! It also canonicalizes free text so suggested queries can be compared and
//! de-duplicated.
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: no I/O outside of explicit rubric file loading
//! 2. **Per-rubric**: each ceiling gets its own validator value
//! 3. **Values, not panics**: malformed payloads come back as [`Outcome::Malformed`]
//! 4. **Idempotent normalization**: `normalize(normalize(x)) == normalize(x)`
//!
//! ## Example
//!
//! ```rust
//! use marksheet_core::{normalize, Outcome, ResultValidator};
//!
//! let validator = ResultValidator::new(5).unwrap();
//! let outcome = validator.parse_response(
//!     r#"{"result":{"score":4,"justification":"Solid"},"suggested_query":"input devices","error":null}"#,
//! );
//!
//! match outcome {
//!     Outcome::Accepted { evaluation } => assert_eq!(evaluation.score(), 4),
//!     Outcome::ScorerError { message, .. } => panic!("scorer failed: {}", message),
//!     Outcome::Malformed { rejection } => panic!("bad payload: {}", rejection),
//! }
//!
//! assert_eq!(normalize("Café!"), "cafe");
//! ```

pub mod detection;
pub mod evaluation;
pub mod normalize;
pub mod rubric;
pub mod sheet;

// Re-export main types at crate root
pub use detection::{AiDetection, RiskLevel};
pub use evaluation::{
    check_against_schema, few_shot_examples, response_schema, CeilingError, EvaluationResult,
    FewShotExample, Outcome, ResultValidator, Role, ScoredAnswer, ValidationError, Violation,
    DEFAULT_TOTAL_SCORE,
};
pub use normalize::{normalize, same_query, NORMALIZATION_LOCALE};
pub use rubric::{Rubric, RubricError, ScoreBracket, ScoreRange};
pub use sheet::{AnswerSheet, SheetError};

/// Validate a raw payload against a ceiling in one call.
///
/// Shorthand for building a [`ResultValidator`] and calling
/// [`ResultValidator::classify`]. A zero ceiling yields [`CeilingError`].
pub fn check(total_score: u32, raw: &serde_json::Value) -> Result<Outcome, CeilingError> {
    Ok(ResultValidator::new(total_score)?.classify(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_accepts_default_ceiling_payload() {
        let outcome = check(
            DEFAULT_TOTAL_SCORE,
            &json!({
                "result": { "score": 7, "justification": "Good" },
                "suggested_query": "",
                "error": null
            }),
        )
        .unwrap();
        assert_eq!(outcome.accepted().unwrap().score(), 7);
    }

    #[test]
    fn test_check_rejects_out_of_range() {
        let outcome = check(
            5,
            &json!({
                "result": { "score": 8, "justification": "x" },
                "suggested_query": "q",
                "error": null
            }),
        )
        .unwrap();
        assert!(outcome.rejection().unwrap().is_out_of_range());
    }

    #[test]
    fn test_check_zero_ceiling() {
        assert_eq!(check(0, &json!({})), Err(CeilingError::Zero));
    }

    #[test]
    fn test_suggested_query_dedup_with_sheet() {
        let validator = ResultValidator::default();
        let evaluation = validator
            .validate(&json!({
                "result": { "score": 5, "justification": "Partial" },
                "suggested_query": "What is Phishing?",
                "error": null
            }))
            .unwrap();

        let mut sheet = AnswerSheet::new("q1");
        sheet.track("Fishing at work");
        sheet.record(&evaluation);

        assert!(same_query(&sheet.suggested_query, "what is phishing"));
    }
}
