//! The scoring engine.
//!
//! A single pure function turns a test definition plus an answer-state
//! snapshot into a [`ScoreBreakdown`]. It is referentially transparent:
//! the same snapshot always yields the same breakdown, which both the
//! results renderer and the tests rely on.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerState, OptionLetter, TestDefinition};

/// Outcome of one question within a scored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Correct,
    Wrong,
    Skipped,
}

impl std::fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerStatus::Correct => write!(f, "correct"),
            AnswerStatus::Wrong => write!(f, "wrong"),
            AnswerStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Mark values attached to one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marks {
    /// Marks available for a correct answer.
    pub positive: f64,
    /// Marks deducted for a wrong answer.
    pub negative: f64,
    /// Marks this answer actually contributed. May be negative; per-question
    /// contributions are not individually clamped.
    pub obtained: f64,
}

/// Per-question detail inside a score breakdown and a submission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnswer {
    pub question_id: String,
    /// The learner's chosen letters. At most one entry under single-answer
    /// semantics; empty when the question was skipped.
    pub selected_options: Vec<OptionLetter>,
    /// The question's full correct set.
    pub correct_options: Vec<OptionLetter>,
    pub is_correct: bool,
    pub status: AnswerStatus,
    pub marks: Marks,
    pub marked_for_review: bool,
}

/// Derived, deterministic scoring result for a session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub skipped_questions: u32,
    /// Total score, clamped to a minimum of zero.
    pub score: f64,
    /// Percentage of the maximum attainable score, 0 when no marks are
    /// attainable.
    pub average_score: f64,
    pub detailed_answers: Vec<DetailedAnswer>,
}

/// Score a session snapshot against its test definition.
///
/// For each question in order: an unset selection is `skipped` and worth 0;
/// otherwise the selected index converts to a letter which is `correct` iff
/// it is a member of the question's correct set, adding `positive_mark`, and
/// `wrong` otherwise, subtracting `negative_mark`. The reported total clamps
/// at zero; per-question contributions do not.
///
/// A selection that does not address any option of a malformed question
/// (e.g. an empty option list) degrades to `skipped` rather than failing.
pub fn score_test(test: &TestDefinition, answers: &[AnswerState]) -> ScoreBreakdown {
    let mut correct = 0u32;
    let mut wrong = 0u32;
    let mut skipped = 0u32;
    let mut raw_score = 0.0f64;
    let mut detailed = Vec::with_capacity(test.questions.len());

    for (i, question) in test.questions.iter().enumerate() {
        let answer = answers.get(i).copied().unwrap_or_default();

        let selection = answer.selected.and_then(|index| {
            if index < question.options.len() {
                OptionLetter::from_index(index)
            } else {
                tracing::warn!(
                    question = %question.id,
                    index,
                    options = question.options.len(),
                    "selection does not address an option, treating as skipped"
                );
                None
            }
        });

        let (status, is_correct, obtained) = match selection {
            None => (AnswerStatus::Skipped, false, 0.0),
            Some(letter) if question.is_correct_letter(letter) => {
                (AnswerStatus::Correct, true, question.positive_mark)
            }
            Some(_) => (AnswerStatus::Wrong, false, -question.negative_mark),
        };

        match status {
            AnswerStatus::Correct => correct += 1,
            AnswerStatus::Wrong => wrong += 1,
            AnswerStatus::Skipped => skipped += 1,
        }
        raw_score += obtained;

        detailed.push(DetailedAnswer {
            question_id: question.id.clone(),
            selected_options: selection.into_iter().collect(),
            correct_options: question.correct_options.clone(),
            is_correct,
            status,
            marks: Marks {
                positive: question.positive_mark,
                negative: question.negative_mark,
                obtained,
            },
            marked_for_review: answer.marked_for_review,
        });
    }

    let score = raw_score.max(0.0);
    let max_score = test.max_score();
    let average_score = if max_score > 0.0 {
        100.0 * score / max_score
    } else {
        0.0
    };

    ScoreBreakdown {
        total_questions: test.questions.len() as u32,
        correct_answers: correct,
        wrong_answers: wrong,
        skipped_questions: skipped,
        score,
        average_score,
        detailed_answers: detailed,
    }
}
