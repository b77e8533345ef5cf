//! AI-likelihood classification.
//!
//! Detection scores arrive from an external detector as a probability in
//! `[0, 1]`. Scores are bucketed on the rounded percentage:
//! 85% and up is high risk, 60% and up is medium, anything lower is low.
//!
//! Out-of-range scores are not clamped: `1.2` renders as `"120%"` and still
//! counts as high risk.

use serde::{Deserialize, Serialize};

const HIGH_THRESHOLD: i64 = 85;
const MEDIUM_THRESHOLD: i64 = 60;

/// Per-sentence likelihood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceScore {
    pub score: f64,
    pub sentence: String,
}

/// Detector output for one answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AiDetection {
    pub overall_score: f64,

    #[serde(default)]
    pub sentence_scores: Vec<SentenceScore>,

    #[serde(default)]
    pub tokens: Vec<String>,

    #[serde(default)]
    pub token_probs: Vec<f64>,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiDetection {
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_score(self.overall_score)
    }

    /// Sentences at or above the given risk level.
    pub fn flagged_sentences(&self, at_least: RiskLevel) -> impl Iterator<Item = &SentenceScore> {
        self.sentence_scores
            .iter()
            .filter(move |s| RiskLevel::from_score(s.score) >= at_least)
    }
}

/// Rounded percentage of a probability score.
pub fn percentage(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Render a probability as `"NN%"`.
pub fn format_percentage(score: f64) -> String {
    format!("{}%", percentage(score))
}

/// How likely an answer is to be machine-written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        let pct = percentage(score);
        if pct >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if pct >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::Low => "Low Risk",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            RiskLevel::High => "High probability of AI generation (85%+)",
            RiskLevel::Medium => "Medium probability of AI generation (60-84%)",
            RiskLevel::Low => "Low probability of AI generation (<60%)",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::High => "🔴",
            RiskLevel::Medium => "🟡",
            RiskLevel::Low => "🟢",
        }
    }
}
