//! Score brackets and coverage checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A band of scores sharing one criteria description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreBracket {
    /// Identifier (e.g., "bracket-0")
    #[serde(default)]
    pub id: String,

    /// Lowest score in the band, inclusive
    pub min_score: u32,

    /// Highest score in the band, inclusive
    pub max_score: u32,

    /// What an answer in this band looks like
    pub criteria: String,
}

impl ScoreBracket {
    pub fn new(id: impl Into<String>, min_score: u32, max_score: u32, criteria: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            min_score,
            max_score,
            criteria: criteria.into(),
        }
    }

    pub fn contains(&self, score: u32) -> bool {
        self.min_score <= score && score <= self.max_score
    }

    /// Number of integer scores in the band.
    pub fn width(&self) -> u32 {
        if self.max_score < self.min_score {
            0
        } else {
            self.max_score - self.min_score + 1
        }
    }
}

/// An inclusive range of scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: u32,
    pub max: u32,
}

impl fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

fn sorted(brackets: &[ScoreBracket]) -> Vec<&ScoreBracket> {
    let mut sorted: Vec<&ScoreBracket> = brackets.iter().collect();
    sorted.sort_by_key(|b| b.min_score);
    sorted
}

/// Score ranges in `[0, total_score]` that no bracket covers.
pub fn missing_ranges(brackets: &[ScoreBracket], total_score: u32) -> Vec<ScoreRange> {
    let mut missing = Vec::new();
    let total = u64::from(total_score);
    // Next score that still needs coverage. Widened so `u32::MAX + 1` is
    // representable once the top score is covered.
    let mut next: u64 = 0;

    for bracket in sorted(brackets) {
        if next > total {
            break;
        }
        let min = u64::from(bracket.min_score);
        if min > next {
            missing.push(ScoreRange {
                min: next as u32,
                max: (min - 1).min(total) as u32,
            });
        }
        next = next.max(u64::from(bracket.max_score) + 1);
    }

    if next <= total {
        missing.push(ScoreRange {
            min: next as u32,
            max: total_score,
        });
    }

    missing
}

/// True if any two brackets share a score.
pub fn has_overlaps(brackets: &[ScoreBracket]) -> bool {
    sorted(brackets)
        .windows(2)
        .any(|pair| pair[0].max_score >= pair[1].min_score)
}

/// Share of `[0, total_score]` covered by brackets, as a rounded percentage.
pub fn coverage_percentage(brackets: &[ScoreBracket], total_score: u32) -> u32 {
    if brackets.is_empty() {
        return 0;
    }
    let covered: u64 = brackets.iter().map(|b| u64::from(b.width())).sum();
    ((covered as f64 / (f64::from(total_score) + 1.0)) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min: u32, max: u32) -> ScoreBracket {
        ScoreBracket::new(format!("bracket-{}", min), min, max, "criteria")
    }

    #[test]
    fn test_no_brackets_missing_everything() {
        assert_eq!(
            missing_ranges(&[], 10),
            vec![ScoreRange { min: 0, max: 10 }]
        );
    }

    #[test]
    fn test_complete_coverage() {
        let brackets = vec![b(6, 10), b(0, 2), b(3, 5)];
        assert!(missing_ranges(&brackets, 10).is_empty());
        assert!(!has_overlaps(&brackets));
        assert_eq!(coverage_percentage(&brackets, 10), 100);
    }

    #[test]
    fn test_gaps_reported() {
        let brackets = vec![b(2, 3), b(6, 7)];
        assert_eq!(
            missing_ranges(&brackets, 10),
            vec![
                ScoreRange { min: 0, max: 1 },
                ScoreRange { min: 4, max: 5 },
                ScoreRange { min: 8, max: 10 },
            ]
        );
        assert_eq!(coverage_percentage(&brackets, 10), 36);
    }

    #[test]
    fn test_full_range_at_max_ceiling() {
        assert!(missing_ranges(&[b(0, u32::MAX)], u32::MAX).is_empty());
        assert_eq!(
            missing_ranges(&[b(0, u32::MAX - 1)], u32::MAX),
            vec![ScoreRange {
                min: u32::MAX,
                max: u32::MAX
            }]
        );
        assert_eq!(
            missing_ranges(&[b(1, u32::MAX)], u32::MAX),
            vec![ScoreRange { min: 0, max: 0 }]
        );
    }

    #[test]
    fn test_overlap_detected() {
        assert!(has_overlaps(&[b(0, 5), b(5, 10)]));
        assert!(!has_overlaps(&[b(0, 4), b(5, 10)]));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(ScoreRange { min: 3, max: 3 }.to_string(), "3");
        assert_eq!(ScoreRange { min: 0, max: 4 }.to_string(), "0-4");
    }

    #[test]
    fn test_contains() {
        let bracket = b(3, 5);
        assert!(bracket.contains(3));
        assert!(bracket.contains(5));
        assert!(!bracket.contains(6));
    }
}
