//! Per-question result review.
//!
//! A read-only projection of a submission record against its originating
//! test definition. It never recomputes scores: correctness comes straight
//! from the record's detailed answers, so the rows always agree with the
//! stored counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use examdeck_core::model::{OptionLetter, TestDefinition};
use examdeck_core::scoring::AnswerStatus;
use examdeck_core::submission::SubmissionRecord;

/// One question's review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub question_id: String,
    pub question_text: String,
    /// The learner's chosen letter, or `None` for an unattempted question.
    pub chosen: Option<OptionLetter>,
    /// The question's full correct set.
    pub correct_options: Vec<OptionLetter>,
    pub status: AnswerStatus,
    pub marks_obtained: f64,
    pub marked_for_review: bool,
    pub explanation: Option<String>,
}

/// Build review rows for every question of the definition, in definition
/// order.
///
/// Questions the record carries no detail for degrade to unattempted rows
/// rather than failing; that only happens with malformed upstream data.
pub fn build_review(test: &TestDefinition, record: &SubmissionRecord) -> Vec<ReviewRow> {
    let details: HashMap<&str, _> = record
        .detailed_answers
        .iter()
        .map(|d| (d.question_id.as_str(), d))
        .collect();

    test.questions
        .iter()
        .map(|question| match details.get(question.id.as_str()) {
            Some(detail) => ReviewRow {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                chosen: detail.selected_options.first().copied(),
                correct_options: detail.correct_options.clone(),
                status: detail.status,
                marks_obtained: detail.marks.obtained,
                marked_for_review: detail.marked_for_review,
                explanation: question.explanation.clone(),
            },
            None => {
                tracing::warn!(
                    question = %question.id,
                    "submission record has no detail for this question"
                );
                ReviewRow {
                    question_id: question.id.clone(),
                    question_text: question.text.clone(),
                    chosen: None,
                    correct_options: question.correct_options.clone(),
                    status: AnswerStatus::Skipped,
                    marks_obtained: 0.0,
                    marked_for_review: false,
                    explanation: question.explanation.clone(),
                }
            }
        })
        .collect()
}
