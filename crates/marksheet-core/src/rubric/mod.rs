//! Rubrics: the source of the score ceiling.
//!
//! A rubric names a total achievable score and describes score bands. It is
//! loaded from YAML or JSON and hands out the [`ResultValidator`] for its
//! ceiling.

mod bracket;
mod markdown;

pub use bracket::{coverage_percentage, has_overlaps, missing_ranges, ScoreBracket, ScoreRange};
pub use markdown::{parse_markdown, to_markdown, RubricContent};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::evaluation::{CeilingError, ResultValidator, DEFAULT_TOTAL_SCORE};

/// Errors that can occur when loading or checking a rubric.
#[derive(Error, Debug)]
pub enum RubricError {
    #[error("Failed to read rubric file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid total score: {0}")]
    Ceiling(#[from] CeilingError),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Bracket {id} has min score {min_score} above max score {max_score}")]
    InvertedBracket {
        id: String,
        min_score: u32,
        max_score: u32,
    },

    #[error("Bracket {id} exceeds total score {total_score}")]
    BracketOutOfRange { id: String, total_score: u32 },

    #[error("Score brackets overlap")]
    Overlap,

    #[error("Score brackets leave scores uncovered: {}", format_ranges(.0))]
    IncompleteCoverage(Vec<ScoreRange>),
}

fn format_ranges(ranges: &[ScoreRange]) -> String {
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn default_total_score() -> u32 {
    DEFAULT_TOTAL_SCORE
}

/// A scoring rubric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rubric {
    /// Human-readable name
    pub name: String,

    /// Maximum achievable score
    #[serde(default = "default_total_score")]
    pub total_score: u32,

    /// Score bands
    #[serde(default)]
    pub brackets: Vec<ScoreBracket>,

    /// Free-form guidance for the scorer
    #[serde(default)]
    pub note: Option<String>,
}

impl Rubric {
    /// Parse a rubric from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RubricError> {
        let rubric: Rubric = serde_yaml::from_str(yaml)?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Parse a rubric from JSON string.
    pub fn from_json(json: &str) -> Result<Self, RubricError> {
        let rubric: Rubric = serde_json::from_str(json)?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Load a rubric file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), json = is_json, "Loading rubric");

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Rebuild a rubric from its stored Markdown content.
    pub fn from_markdown(
        name: impl Into<String>,
        total_score: u32,
        content: &str,
    ) -> Result<Self, RubricError> {
        let RubricContent { brackets, note } = parse_markdown(content);
        let rubric = Rubric {
            name: name.into(),
            total_score,
            brackets,
            note,
        };
        rubric.validate()?;
        Ok(rubric)
    }

    /// Render the brackets and note to their stored Markdown form.
    pub fn to_markdown(&self) -> String {
        to_markdown(&self.brackets, self.note.as_deref())
    }

    /// Validator for this rubric's ceiling.
    pub fn validator(&self) -> Result<ResultValidator, RubricError> {
        Ok(ResultValidator::new(self.total_score)?)
    }

    /// The bracket a score falls into, if any.
    pub fn bracket_for(&self, score: u32) -> Option<&ScoreBracket> {
        self.brackets.iter().find(|b| b.contains(score))
    }

    pub fn missing_ranges(&self) -> Vec<ScoreRange> {
        missing_ranges(&self.brackets, self.total_score)
    }

    pub fn coverage_percentage(&self) -> u32 {
        coverage_percentage(&self.brackets, self.total_score)
    }

    /// Validate the rubric structure.
    ///
    /// A rubric without brackets is valid; once brackets are given they must
    /// cover `[0, total_score]` exactly once.
    pub fn validate(&self) -> Result<(), RubricError> {
        if self.name.trim().is_empty() {
            return Err(RubricError::MissingField("name".to_string()));
        }

        ResultValidator::new(self.total_score)?;

        if self.brackets.is_empty() {
            return Ok(());
        }

        for bracket in &self.brackets {
            if bracket.min_score > bracket.max_score {
                return Err(RubricError::InvertedBracket {
                    id: bracket.id.clone(),
                    min_score: bracket.min_score,
                    max_score: bracket.max_score,
                });
            }
            if bracket.max_score > self.total_score {
                return Err(RubricError::BracketOutOfRange {
                    id: bracket.id.clone(),
                    total_score: self.total_score,
                });
            }
        }

        if has_overlaps(&self.brackets) {
            return Err(RubricError::Overlap);
        }

        let missing = self.missing_ranges();
        if !missing.is_empty() {
            return Err(RubricError::IncompleteCoverage(missing));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RUBRIC: &str = r#"
name: "Computer Literacy"
total_score: 5
brackets:
  - id: "low"
    min_score: 0
    max_score: 2
    criteria: "Little understanding"
  - id: "high"
    min_score: 3
    max_score: 5
    criteria: "Clear understanding"
note: "Award partial credit for partially correct lists."
"#;

    #[test]
    fn test_parse_valid_rubric() {
        let rubric = Rubric::from_yaml(VALID_RUBRIC).unwrap();
        assert_eq!(rubric.name, "Computer Literacy");
        assert_eq!(rubric.total_score, 5);
        assert_eq!(rubric.brackets.len(), 2);
        assert_eq!(rubric.coverage_percentage(), 100);
        assert_eq!(rubric.validator().unwrap().total_score(), 5);
    }

    #[test]
    fn test_default_ceiling() {
        let rubric = Rubric::from_yaml("name: Default\n").unwrap();
        assert_eq!(rubric.total_score, DEFAULT_TOTAL_SCORE);
    }

    #[test]
    fn test_json_rubric() {
        let rubric = Rubric::from_json(r#"{"name": "J", "total_score": 3}"#).unwrap();
        assert_eq!(rubric.total_score, 3);
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let result = Rubric::from_yaml("name: Broken\ntotal_score: 0\n");
        assert!(matches!(result, Err(RubricError::Ceiling(CeilingError::Zero))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Rubric::from_yaml("name: \"\"\n");
        assert!(matches!(result, Err(RubricError::MissingField(_))));
    }

    #[test]
    fn test_incomplete_coverage_rejected() {
        let yaml = r#"
name: "Gappy"
total_score: 10
brackets:
  - { id: "a", min_score: 0, max_score: 3, criteria: "low" }
  - { id: "b", min_score: 6, max_score: 10, criteria: "high" }
"#;
        match Rubric::from_yaml(yaml) {
            Err(RubricError::IncompleteCoverage(ranges)) => {
                assert_eq!(ranges, vec![ScoreRange { min: 4, max: 5 }]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_overlap_rejected() {
        let yaml = r#"
name: "Overlap"
total_score: 10
brackets:
  - { id: "a", min_score: 0, max_score: 5, criteria: "low" }
  - { id: "b", min_score: 5, max_score: 10, criteria: "high" }
"#;
        assert!(matches!(Rubric::from_yaml(yaml), Err(RubricError::Overlap)));
    }

    #[test]
    fn test_bracket_beyond_ceiling_rejected() {
        let yaml = r#"
name: "Too high"
total_score: 5
brackets:
  - { id: "a", min_score: 0, max_score: 8, criteria: "all" }
"#;
        assert!(matches!(
            Rubric::from_yaml(yaml),
            Err(RubricError::BracketOutOfRange { .. })
        ));
    }

    #[test]
    fn test_markdown_round_trip() {
        let rubric = Rubric::from_yaml(VALID_RUBRIC).unwrap();
        let restored = Rubric::from_markdown(&rubric.name, rubric.total_score, &rubric.to_markdown()).unwrap();

        assert_eq!(restored.brackets.len(), 2);
        assert_eq!(restored.brackets[1].criteria, "Clear understanding");
        assert_eq!(restored.note, rubric.note);
    }

    #[test]
    fn test_bracket_for_validated_score() {
        let rubric = Rubric::from_yaml(VALID_RUBRIC).unwrap();
        let validator = rubric.validator().unwrap();
        let result = validator
            .validate(&serde_json::json!({
                "result": { "score": 4, "justification": "Lists three devices" },
                "suggested_query": "input devices",
                "error": null
            }))
            .unwrap();

        let bracket = rubric.bracket_for(result.score()).unwrap();
        assert_eq!(bracket.id, "high");
    }
}
