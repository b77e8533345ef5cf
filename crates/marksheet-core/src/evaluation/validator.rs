//! Validation of raw scorer payloads against a rubric ceiling.
//!
//! Scorer output is untrusted. A payload is accepted only when:
//!
//! 1. `result` exists and is an object
//! 2. `result.score` is an integer in `[0, total_score]`
//! 3. `result.justification` is a non-empty string
//! 4. `suggested_query` is a string (may be empty)
//! 5. `error`, if present, is `null` or a non-empty string
//!
//! All violations are collected, not just the first.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::result::{EvaluationResult, Outcome, ScoredAnswer};

/// Ceiling used when no rubric supplies one.
pub const DEFAULT_TOTAL_SCORE: u32 = 10;

/// Errors constructing a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CeilingError {
    #[error("Total score must be positive")]
    Zero,
}

/// A single reason a payload was rejected.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("Scorer returned an empty response")]
    EmptyResponse,

    #[error("Scorer response is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Payload must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Missing required field `{field}`")]
    Missing { field: &'static str },

    #[error("Field `{field}` must be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field `result.score` must be an integer, got {score}")]
    ScoreNotInteger { score: Number },

    #[error("Field `result.score` is out of range: {score} not in 0..={total_score}")]
    ScoreOutOfRange { score: Number, total_score: u32 },

    #[error("Field `{field}` must not be empty")]
    Empty { field: &'static str },
}

impl Violation {
    /// Dotted path of the offending field, if the violation is field-specific.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Violation::Missing { field }
            | Violation::WrongType { field, .. }
            | Violation::Empty { field } => Some(*field),
            Violation::ScoreNotInteger { .. } | Violation::ScoreOutOfRange { .. } => {
                Some("result.score")
            }
            Violation::EmptyResponse
            | Violation::InvalidJson { .. }
            | Violation::NotAnObject { .. } => None,
        }
    }
}

/// A rejected payload with every violation found.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
#[error("Evaluation payload rejected ({}): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    pub total_score: u32,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    fn single(total_score: u32, violation: Violation) -> Self {
        Self {
            total_score,
            violations: vec![violation],
        }
    }

    /// True if any violation concerns the given field path.
    pub fn concerns(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == Some(field))
    }

    pub fn is_out_of_range(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::ScoreOutOfRange { .. }))
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validation rule for one rubric ceiling.
///
/// Each ceiling yields its own validator; build one per evaluation context
/// from the active rubric rather than sharing a global rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultValidator {
    total_score: u32,
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self {
            total_score: DEFAULT_TOTAL_SCORE,
        }
    }
}

impl ResultValidator {
    /// Create a validator accepting scores in `[0, total_score]`.
    pub fn new(total_score: u32) -> Result<Self, CeilingError> {
        if total_score == 0 {
            return Err(CeilingError::Zero);
        }
        Ok(Self { total_score })
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Validate a parsed payload.
    pub fn validate(&self, raw: &Value) -> Result<EvaluationResult, ValidationError> {
        let object = match raw.as_object() {
            Some(object) => object,
            None => {
                return Err(ValidationError::single(
                    self.total_score,
                    Violation::NotAnObject {
                        found: type_name(raw),
                    },
                ))
            }
        };

        let mut violations = Vec::new();

        let result = self.check_result(object, &mut violations);
        let suggested_query = check_suggested_query(object, &mut violations);
        let error = check_error(object, &mut violations);

        match (result, suggested_query, error) {
            (Some(result), Some(suggested_query), Some(error)) if violations.is_empty() => {
                let evaluation = EvaluationResult {
                    result,
                    suggested_query,
                    error,
                };
                tracing::debug!(
                    score = evaluation.score(),
                    total_score = self.total_score,
                    scorer_error = evaluation.is_scorer_error(),
                    "Evaluation payload accepted"
                );
                Ok(evaluation)
            }
            _ => {
                tracing::warn!(
                    total_score = self.total_score,
                    violations = violations.len(),
                    "Evaluation payload rejected"
                );
                Err(ValidationError {
                    total_score: self.total_score,
                    violations,
                })
            }
        }
    }

    /// Validate and split into accepted, scorer error, or malformed.
    pub fn classify(&self, raw: &Value) -> Outcome {
        let outcome = Outcome::from(self.validate(raw));
        if let Outcome::ScorerError { message, .. } = &outcome {
            tracing::warn!(message = %message, "Scorer reported an error");
        }
        outcome
    }

    /// Parse raw scorer text and classify it.
    pub fn parse_response(&self, text: &str) -> Outcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::warn!("Scorer returned an empty response");
            return Outcome::Malformed {
                rejection: ValidationError::single(self.total_score, Violation::EmptyResponse),
            };
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(raw) => self.classify(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "Scorer response is not valid JSON");
                Outcome::Malformed {
                    rejection: ValidationError::single(
                        self.total_score,
                        Violation::InvalidJson {
                            message: e.to_string(),
                        },
                    ),
                }
            }
        }
    }

    fn check_result(
        &self,
        object: &Map<String, Value>,
        violations: &mut Vec<Violation>,
    ) -> Option<ScoredAnswer> {
        let result = match object.get("result") {
            None => {
                violations.push(Violation::Missing { field: "result" });
                return None;
            }
            Some(Value::Object(result)) => result,
            Some(other) => {
                violations.push(Violation::WrongType {
                    field: "result",
                    expected: "an object",
                    found: type_name(other),
                });
                return None;
            }
        };

        let score = self.check_score(result.get("score"), violations);
        let justification = check_justification(result.get("justification"), violations);

        Some(ScoredAnswer {
            score: score?,
            justification: justification?,
        })
    }

    fn check_score(&self, value: Option<&Value>, violations: &mut Vec<Violation>) -> Option<u32> {
        let number = match value {
            None => {
                violations.push(Violation::Missing {
                    field: "result.score",
                });
                return None;
            }
            Some(Value::Number(number)) => number,
            Some(other) => {
                violations.push(Violation::WrongType {
                    field: "result.score",
                    expected: "an integer",
                    found: type_name(other),
                });
                return None;
            }
        };

        let out_of_range = || Violation::ScoreOutOfRange {
            score: number.clone(),
            total_score: self.total_score,
        };

        let score = if let Some(i) = number.as_i64() {
            i
        } else if number.as_u64().is_some() {
            // Only integers above i64::MAX land here.
            violations.push(out_of_range());
            return None;
        } else {
            match number.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => {
                    if f < 0.0 || f > f64::from(self.total_score) {
                        violations.push(out_of_range());
                        return None;
                    }
                    f as i64
                }
                _ => {
                    violations.push(Violation::ScoreNotInteger {
                        score: number.clone(),
                    });
                    return None;
                }
            }
        };

        match u32::try_from(score) {
            Ok(score) if score <= self.total_score => Some(score),
            _ => {
                violations.push(out_of_range());
                None
            }
        }
    }
}

fn check_justification(value: Option<&Value>, violations: &mut Vec<Violation>) -> Option<String> {
    match value {
        None => {
            violations.push(Violation::Missing {
                field: "result.justification",
            });
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(Violation::Empty {
                field: "result.justification",
            });
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            violations.push(Violation::WrongType {
                field: "result.justification",
                expected: "a string",
                found: type_name(other),
            });
            None
        }
    }
}

fn check_suggested_query(
    object: &Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match object.get("suggested_query") {
        None => {
            violations.push(Violation::Missing {
                field: "suggested_query",
            });
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            violations.push(Violation::WrongType {
                field: "suggested_query",
                expected: "a string",
                found: type_name(other),
            });
            None
        }
    }
}

/// Outer `None` means invalid; `Some(None)` means no scorer error.
fn check_error(
    object: &Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Option<Option<String>> {
    match object.get("error") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(Violation::Empty { field: "error" });
            None
        }
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(other) => {
            violations.push(Violation::WrongType {
                field: "error",
                expected: "a string or null",
                found: type_name(other),
            });
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
