//! Scorer response validation.
//!
//! Scorer output arrives as untrusted JSON. This module validates it against
//! a rubric ceiling and splits the outcome into accepted results, scorer-reported
//! failures, and malformed payloads.

mod examples;
mod result;
mod schema;
mod validator;

pub use examples::{few_shot_examples, FewShotExample, Role};
pub use result::{EvaluationResult, Outcome, ScoredAnswer};
pub use schema::{check_against_schema, response_schema};
pub use validator::{CeilingError, ResultValidator, ValidationError, Violation, DEFAULT_TOTAL_SCORE};
