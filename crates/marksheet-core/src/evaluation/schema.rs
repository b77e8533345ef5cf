//! Structured-output JSON Schema for scorer responses.
//!
//! The scoring backend is asked to emit JSON matching this schema. It mirrors
//! the rules enforced by [`ResultValidator`](super::ResultValidator) for the
//! same ceiling, but additionally requires the `error` key and forbids extra
//! properties, so a model constrained by it always produces a payload the
//! validator accepts.

use serde_json::{json, Value};

/// Build the response schema for a ceiling.
pub fn response_schema(total_score: u32) -> Value {
    json!({
        "type": "object",
        "properties": {
            "result": {
                "type": "object",
                "properties": {
                    "score": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": total_score
                    },
                    "justification": {
                        "type": "string",
                        "minLength": 1
                    }
                },
                "required": ["score", "justification"],
                "additionalProperties": false
            },
            "suggested_query": {
                "type": "string"
            },
            "error": {
                "type": ["string", "null"],
                "minLength": 1
            }
        },
        "required": ["result", "suggested_query", "error"],
        "additionalProperties": false
    })
}

/// Check a payload against the response schema for a ceiling.
///
/// Returns every schema error with its instance path.
pub fn check_against_schema(total_score: u32, raw: &Value) -> Result<(), Vec<String>> {
    let schema = response_schema(total_score);
    let validator = jsonschema::options()
        .build(&schema)
        .map_err(|e| vec![format!("Failed to compile schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(raw)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
