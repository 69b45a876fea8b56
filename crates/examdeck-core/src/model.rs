//! Core data model types for examdeck.
//!
//! These are the fundamental types that the entire examdeck system uses to
//! represent tests, questions, and per-question answer state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A timed multiple-choice test administered to a learner.
///
/// Immutable once a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Unique identifier for this test.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Subject this test belongs to.
    #[serde(default)]
    pub subject: String,
    /// Lesson this test belongs to.
    #[serde(default)]
    pub lesson: String,
    /// Total allotted duration in seconds.
    pub duration_secs: u64,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TestDefinition {
    /// Sum of positive marks over all questions (the maximum attainable score).
    pub fn max_score(&self) -> f64 {
        self.questions.iter().map(|q| q.positive_mark).sum()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// Question body. May embed media references; extracting those is a
    /// rendering concern, not a scoring concern.
    pub text: String,
    /// Answer options, in order. The option letter is implicit from position.
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    /// The set of correct option letters (one or more).
    #[serde(default)]
    pub correct_options: Vec<OptionLetter>,
    /// Marks awarded for a correct answer.
    #[serde(default = "default_positive_mark")]
    pub positive_mark: f64,
    /// Marks deducted for a wrong answer. Zero means no penalty.
    #[serde(default)]
    pub negative_mark: f64,
    /// Explanation shown during result review.
    #[serde(default)]
    pub explanation: Option<String>,
}

fn default_positive_mark() -> f64 {
    1.0
}

impl Question {
    /// Whether the given letter is a member of this question's correct set.
    pub fn is_correct_letter(&self, letter: OptionLetter) -> bool {
        self.correct_options.contains(&letter)
    }
}

/// A single answer option. The letter is derived from its position in the
/// question's option list (0 → A, 1 → B, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Unique identifier for this option.
    pub id: String,
    /// Option body.
    pub text: String,
}

/// An option position expressed as a letter (`A`..`Z`).
///
/// Serialized as the letter string, which is also the wire format of
/// `selected_options[]` and `correct_options[]` in submission payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionLetter(u8);

/// Number of addressable option positions (`A` through `Z`).
pub const MAX_OPTIONS: usize = 26;

impl OptionLetter {
    /// Letter for a zero-based option index. Returns `None` past `Z`.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < MAX_OPTIONS {
            Some(OptionLetter(index as u8))
        } else {
            None
        }
    }

    /// Zero-based option index for this letter.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'A' + self.0) as char)
    }
}

impl FromStr for OptionLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(OptionLetter(c.to_ascii_uppercase() as u8 - b'A'))
            }
            _ => Err(format!("not an option letter: {trimmed:?}")),
        }
    }
}

impl Serialize for OptionLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OptionLetter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-question answer state within one session.
///
/// Created unset at session start, mutated only by explicit learner action,
/// and never mutated after submission is finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerState {
    /// Zero-based index of the selected option, if any. One selection per
    /// question, even for questions with multiple correct letters.
    pub selected: Option<usize>,
    /// Whether the learner flagged this question for review.
    pub marked_for_review: bool,
}

impl AnswerState {
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }
}
