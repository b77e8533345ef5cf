//! Answer sheet state fed by validated evaluations.
//!
//! A sheet tracks the answer being edited separately from the answer that was
//! last scored. Editing after scoring makes the score stale until the next
//! evaluation is recorded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::AiDetection;
use crate::evaluation::EvaluationResult;

/// Errors from sheet transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Sheet {0} has no score to save")]
    NotScored(String),

    #[error("Sheet {0} was edited after scoring; evaluate again before saving")]
    Stale(String),
}

/// One learner answer and its evaluation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnswerSheet {
    pub id: String,
    pub tracked_answer: String,
    pub committed_answer: String,
    pub score: Option<u32>,
    pub justification: String,
    pub suggested_query: String,
    pub is_evaluation_saved: bool,
    #[serde(default)]
    pub detected_ai: Option<AiDetection>,
}

impl AnswerSheet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Update the answer being edited.
    pub fn track(&mut self, answer: impl Into<String>) {
        self.tracked_answer = answer.into();
    }

    /// True when the edited answer differs from the scored one.
    pub fn is_answer_modified(&self) -> bool {
        self.committed_answer != self.tracked_answer
    }

    /// Commit the tracked answer together with its evaluation.
    pub fn record(&mut self, evaluation: &EvaluationResult) {
        self.committed_answer = self.tracked_answer.clone();
        self.score = Some(evaluation.score());
        self.justification = evaluation.justification().to_string();
        self.suggested_query = evaluation.suggested_query().to_string();
        self.is_evaluation_saved = false;

        tracing::debug!(sheet = %self.id, score = evaluation.score(), "Recorded evaluation");
    }

    /// True when a score exists and matches the answer on screen.
    pub fn has_current_score(&self) -> bool {
        self.score.is_some() && !self.is_answer_modified() && !self.committed_answer.is_empty()
    }

    pub fn mark_saved(&mut self) -> Result<(), SheetError> {
        if self.score.is_none() {
            return Err(SheetError::NotScored(self.id.clone()));
        }
        if self.is_answer_modified() {
            return Err(SheetError::Stale(self.id.clone()));
        }
        self.is_evaluation_saved = true;
        Ok(())
    }

    /// Saved and not edited since.
    pub fn is_saved(&self) -> bool {
        self.is_evaluation_saved && !self.is_answer_modified()
    }

    /// Reset answers and evaluation, keeping the id.
    pub fn clear(&mut self) {
        *self = Self::new(std::mem::take(&mut self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::ResultValidator;

    fn evaluation(score: u32) -> EvaluationResult {
        ResultValidator::default()
            .validate(&serde_json::json!({
                "result": { "score": score, "justification": "Because" },
                "suggested_query": "follow up",
                "error": null
            }))
            .unwrap()
    }

    #[test]
    fn test_record_commits_answer() {
        let mut sheet = AnswerSheet::new("s1");
        sheet.track("A mouse and a keyboard");
        assert!(sheet.is_answer_modified());

        sheet.record(&evaluation(6));
        assert!(!sheet.is_answer_modified());
        assert!(sheet.has_current_score());
        assert_eq!(sheet.score, Some(6));
        assert_eq!(sheet.suggested_query, "follow up");
    }

    #[test]
    fn test_edit_makes_score_stale() {
        let mut sheet = AnswerSheet::new("s1");
        sheet.track("first");
        sheet.record(&evaluation(3));
        sheet.mark_saved().unwrap();
        assert!(sheet.is_saved());

        sheet.track("second");
        assert!(!sheet.is_saved());
        assert!(!sheet.has_current_score());
        assert_eq!(sheet.mark_saved(), Err(SheetError::Stale("s1".to_string())));
    }

    #[test]
    fn test_cannot_save_unscored() {
        let mut sheet = AnswerSheet::new("s2");
        assert_eq!(sheet.mark_saved(), Err(SheetError::NotScored("s2".to_string())));
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut sheet = AnswerSheet::new("s3");
        sheet.track("answer");
        sheet.record(&evaluation(9));
        sheet.clear();
        assert_eq!(sheet, AnswerSheet::new("s3"));
    }
}
