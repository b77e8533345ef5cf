//! Markdown storage form for rubric brackets.
//!
//! Rubrics are stored as a Markdown table followed by an optional note:
//!
//! ```text
//! Scoring Rubric:
//!
//! | **Score Range** | **Criteria** |
//! | --------------- | ------------ |
//! | **0-4** | Misses the point |
//! | **5-10** | Addresses the question |
//!
//!
//! Note:
//! Partial answers get proportional credit.
//! ```

use super::bracket::{ScoreBracket, ScoreRange};

const TABLE_HEADER: &str = "| **Score Range** |";

/// Brackets and note recovered from stored Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RubricContent {
    pub brackets: Vec<ScoreBracket>,
    pub note: Option<String>,
}

/// Render brackets (sorted by lowest score) and an optional note.
pub fn to_markdown(brackets: &[ScoreBracket], note: Option<&str>) -> String {
    let note = note.filter(|n| !n.trim().is_empty());

    if brackets.is_empty() {
        return note.map(|n| format!("Note:\n{}", n)).unwrap_or_default();
    }

    let mut sorted: Vec<&ScoreBracket> = brackets.iter().collect();
    sorted.sort_by_key(|b| b.min_score);

    let mut content = String::from("Scoring Rubric:\n\n");
    content.push_str("| **Score Range** | **Criteria** |\n");
    content.push_str("| --------------- | ------------ |\n");

    for bracket in sorted {
        let range = ScoreRange {
            min: bracket.min_score,
            max: bracket.max_score,
        };
        content.push_str(&format!("| **{}** | {} |\n", range, bracket.criteria));
    }

    if let Some(note) = note {
        content.push_str(&format!("\n\nNote:\n{}", note));
    }

    content
}

/// Parse stored Markdown back into brackets and note.
///
/// Rows whose score range does not parse are skipped. Bracket ids are
/// assigned `bracket-N` in row order.
pub fn parse_markdown(content: &str) -> RubricContent {
    let mut brackets = Vec::new();
    let mut note_lines: Vec<&str> = Vec::new();
    let mut in_table = false;
    let mut in_note = false;

    for line in content.lines() {
        if line.trim().eq_ignore_ascii_case("note:") {
            in_note = true;
            in_table = false;
            continue;
        }

        if in_note {
            if !line.trim().is_empty() {
                note_lines.push(line);
            }
            continue;
        }

        if line.contains(TABLE_HEADER) {
            in_table = true;
            continue;
        }

        if in_table && line.starts_with('|') && line.contains("**") {
            if let Some((min_score, max_score, criteria)) = parse_row(line) {
                brackets.push(ScoreBracket {
                    id: format!("bracket-{}", brackets.len()),
                    min_score,
                    max_score,
                    criteria,
                });
            }
        }
    }

    let note = note_lines.join("\n").trim().to_string();

    RubricContent {
        brackets,
        note: if note.is_empty() { None } else { Some(note) },
    }
}

fn parse_row(line: &str) -> Option<(u32, u32, String)> {
    let parts: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() < 2 {
        return None;
    }

    let range = parts[0].replace("**", "");
    let range = range.trim();
    let (min, max) = match range.split_once('-') {
        Some((min, max)) => (min.trim().parse().ok()?, max.trim().parse().ok()?),
        None => {
            let score = range.parse().ok()?;
            (score, score)
        }
    };

    Some((min, max, parts[1].to_string()))
}
