//! Validated evaluation results and validation outcomes.

use serde::Serialize;

use super::validator::ValidationError;

/// The scored part of an evaluation: a bounded score and its justification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub(crate) score: u32,
    pub(crate) justification: String,
}

impl ScoredAnswer {
    /// Score within `[0, total_score]` of the validating ceiling.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Non-empty explanation of the score.
    pub fn justification(&self) -> &str {
        &self.justification
    }
}

/// An evaluation payload that passed validation.
///
/// Only [`ResultValidator`](super::ResultValidator) constructs these, so every
/// instance holds the invariants: the score is within the ceiling, the
/// justification is non-empty and `error` is never an empty string.
/// Serializes back to the scorer's wire shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EvaluationResult {
    pub(crate) result: ScoredAnswer,
    pub(crate) suggested_query: String,
    pub(crate) error: Option<String>,
}

impl EvaluationResult {
    pub fn score(&self) -> u32 {
        self.result.score
    }

    pub fn justification(&self) -> &str {
        &self.result.justification
    }

    pub fn scored_answer(&self) -> &ScoredAnswer {
        &self.result
    }

    /// Follow-up search query suggested by the scorer (may be empty).
    pub fn suggested_query(&self) -> &str {
        &self.suggested_query
    }

    /// Failure reported by the scorer itself, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the scorer reported a semantic failure.
    pub fn is_scorer_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The three ways a scorer response can turn out.
///
/// Callers match on this to decide between updating the sheet, showing the
/// scorer's own message, or showing a generic parse failure.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Well-formed payload with no scorer error.
    Accepted { evaluation: EvaluationResult },

    /// Well-formed payload whose `error` field reports a scorer failure.
    ScorerError {
        message: String,
        evaluation: EvaluationResult,
    },

    /// Payload rejected by validation.
    Malformed { rejection: ValidationError },
}

impl Outcome {
    pub(crate) fn from_validated(evaluation: EvaluationResult) -> Self {
        match evaluation.error.clone() {
            Some(message) => Outcome::ScorerError {
                message,
                evaluation,
            },
            None => Outcome::Accepted { evaluation },
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    pub fn is_scorer_error(&self) -> bool {
        matches!(self, Outcome::ScorerError { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Outcome::Malformed { .. })
    }

    /// The accepted evaluation, if any. Scorer errors are not accepted.
    pub fn accepted(&self) -> Option<&EvaluationResult> {
        match self {
            Outcome::Accepted { evaluation } => Some(evaluation),
            _ => None,
        }
    }

    /// The validation rejection, if the payload was malformed.
    pub fn rejection(&self) -> Option<&ValidationError> {
        match self {
            Outcome::Malformed { rejection } => Some(rejection),
            _ => None,
        }
    }

    /// Convert into a `Result`, folding scorer errors into the accepted value.
    pub fn into_result(self) -> Result<EvaluationResult, ValidationError> {
        match self {
            Outcome::Accepted { evaluation } | Outcome::ScorerError { evaluation, .. } => {
                Ok(evaluation)
            }
            Outcome::Malformed { rejection } => Err(rejection),
        }
    }
}

impl From<Result<EvaluationResult, ValidationError>> for Outcome {
    fn from(result: Result<EvaluationResult, ValidationError>) -> Self {
        match result {
            Ok(evaluation) => Outcome::from_validated(evaluation),
            Err(rejection) => Outcome::Malformed { rejection },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(error: Option<&str>) -> EvaluationResult {
        EvaluationResult {
            result: ScoredAnswer {
                score: 7,
                justification: "Good".to_string(),
            },
            suggested_query: String::new(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_serializes_to_wire_shape() {
        let json = serde_json::to_value(evaluation(None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "result": { "score": 7, "justification": "Good" },
                "suggested_query": "",
                "error": null
            })
        );
    }

    #[test]
    fn test_outcome_splits_on_error_field() {
        assert!(Outcome::from_validated(evaluation(None)).is_accepted());

        let outcome = Outcome::from_validated(evaluation(Some("timeout")));
        assert!(outcome.is_scorer_error());
        assert!(outcome.accepted().is_none());
        match outcome {
            Outcome::ScorerError { message, .. } => assert_eq!(message, "timeout"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_into_result_keeps_scorer_error_evaluation() {
        let result = Outcome::from_validated(evaluation(Some("timeout")))
            .into_result()
            .unwrap();
        assert_eq!(result.error(), Some("timeout"));
    }
}
