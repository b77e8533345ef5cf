//! Few-shot examples that prime the scorer.
//!
//! Example scores are expressed as fractions of the ceiling so the examples
//! stay meaningful for any rubric. Every assistant message is a payload the
//! validator for that ceiling accepts.

use serde::Serialize;
use serde_json::json;

/// Chat role of a few-shot message.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single few-shot message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FewShotExample {
    pub role: Role,
    pub content: String,
}

struct Case {
    question: &'static str,
    answer: &'static str,
    score: Grade,
    justification: &'static [&'static str],
    suggested_query: &'static str,
}

#[derive(Clone, Copy)]
enum Grade {
    Excellent,
    Good,
    Poor,
    Zero,
    Fixed(u32),
}

impl Grade {
    fn resolve(self, total_score: u32) -> u32 {
        let fraction = |f: f64| (f64::from(total_score) * f).round() as u32;
        match self {
            Grade::Excellent => fraction(0.9),
            Grade::Good => fraction(0.8),
            Grade::Poor => fraction(0.4),
            Grade::Zero => 0,
            Grade::Fixed(score) => score.min(total_score),
        }
    }
}

const CASES: &[Case] = &[
    Case {
        question: "How do I know if my PC is compatible with Windows 11?",
        answer: "If the PC has a processor of Intel Core series 8th generation. Or an AMD equivalent, a TPM 2.0 and 8GB of RAM. It is compatible.",
        score: Grade::Excellent,
        justification: &[
            "- Correctly identifies key requirements: processor type, TPM 2.0, and RAM.",
            "- Shows clear understanding of the topic relevant to the question.",
            "- While some requirements (like storage or graphics) are missing, the answer is sufficient for basic literacy.",
        ],
        suggested_query: "hardware requirements for Windows 11 compatibility check",
    },
    Case {
        question: "What is phishing?",
        answer: "It's when you eat fish during work time.",
        score: Grade::Zero,
        justification: &[
            "- The answer is completely unrelated and nonsensical.",
            "- Shows no understanding of the topic.",
            "- Contains fabricated or joking content.",
        ],
        suggested_query: "what is phishing in computer security for beginners",
    },
    Case {
        question: "What is the role of a system administrator?",
        answer: "To manage the computers and make sure they work.",
        score: Grade::Good,
        justification: &[
            "- Shows basic understanding of the system administrator's responsibility.",
            "- Lacks specific details like user management, network configuration, or security.",
            "- Still relevant and valid for a basic answer.",
        ],
        suggested_query: "roles and responsibilities of a system administrator",
    },
    Case {
        question: "What is the function of Microsoft Excel?",
        answer: "It is used to make tables and do calculations.",
        score: Grade::Excellent,
        justification: &[
            "- Correctly identifies two core functions: tabular data and calculations.",
            "- Could be slightly improved by mentioning features like formulas, charts, or data analysis.",
        ],
        suggested_query: "uses of Microsoft Excel in office tasks",
    },
    Case {
        question: "Give examples of 5 input devices.",
        answer: "The mouse, keyboard, Windows 10, MS Word, music",
        score: Grade::Poor,
        justification: &[
            "- Mentions 5 items but only the mouse and keyboard are input devices.",
            "- The question requires 5 valid input devices.",
            "- Applying proportional scoring: 2/5 x total score.",
        ],
        suggested_query: "list of common input devices in computer basics",
    },
    Case {
        question: "Who are examples of peopleware in computing?",
        answer: "The user and the technician.",
        score: Grade::Excellent,
        justification: &[
            "- Identifies two accurate examples of people involved in computer use and maintenance.",
            "- Could include additional roles like software developers or system administrators.",
            "- Clear and relevant for basic understanding of peopleware.",
        ],
        suggested_query: "examples of peopleware in computer systems",
    },
    Case {
        question: "What is Microsoft Word used for?",
        answer: "To make documents.",
        score: Grade::Fixed(7),
        justification: &[
            "- Answer is correct but overly vague.",
            "- Could mention editing, formatting, or printing text-based documents.",
            "- A bit too short to reflect full understanding.",
        ],
        suggested_query: "common uses of Microsoft Word",
    },
    Case {
        question: "What are the parts of Computer?",
        answer: "- Monitor\n- Keyboard\n- Mouse",
        score: Grade::Excellent,
        justification: &[
            "- The given answers are valid.",
            "- The question is plural and sets no count, so two parts are expected; three were given.",
            "- Sufficient enough for very basic computer literacy.",
        ],
        suggested_query: "basic parts of a computer",
    },
];

/// Build the few-shot conversation for a ceiling.
pub fn few_shot_examples(total_score: u32) -> Vec<FewShotExample> {
    CASES
        .iter()
        .flat_map(|case| {
            let payload = json!({
                "result": {
                    "score": case.score.resolve(total_score),
                    "justification": case.justification.join("\n\n"),
                },
                "suggested_query": case.suggested_query,
                "error": null,
            });

            [
                FewShotExample {
                    role: Role::User,
                    content: format!("QUESTION: {}\nANSWER: {}", case.question, case.answer),
                },
                FewShotExample {
                    role: Role::Assistant,
                    content: payload.to_string(),
                },
            ]
        })
        .collect()
}
