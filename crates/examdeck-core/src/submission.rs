//! Submission records with JSON persistence.
//!
//! A [`SubmissionRecord`] is the persisted, immutable outcome of a session.
//! Field names follow the submission sink's wire contract verbatim.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::TestDefinition;
use crate::scoring::{DetailedAnswer, ScoreBreakdown};

/// The persisted outcome of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Server-assigned identifier, present once the sink confirms storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Authenticated user id.
    pub user: String,
    /// Test id.
    pub test: String,
    /// Subject id.
    #[serde(default)]
    pub subject: String,
    /// Lesson id.
    #[serde(default)]
    pub lesson: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub skipped_questions: u32,
    pub score: f64,
    pub average_score: f64,
    /// Seconds spent in the session (allotted minus remaining).
    pub time_spent: u64,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub detailed_answers: Vec<DetailedAnswer>,
}

/// Assemble a submission record from a scored session.
///
/// Pure: the submission timestamp is a parameter, not read from a clock.
/// Missing identifiers are hard precondition failures, never defaulted.
pub fn build_submission(
    test: &TestDefinition,
    user_id: &str,
    breakdown: &ScoreBreakdown,
    time_spent_secs: u64,
    submitted_at: DateTime<Utc>,
) -> Result<SubmissionRecord, CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::MissingUserId);
    }
    if test.id.trim().is_empty() {
        return Err(CoreError::MissingTestId {
            name: test.name.clone(),
        });
    }
    if test.questions.is_empty() {
        return Err(CoreError::EmptyQuestionSet {
            test: test.id.clone(),
        });
    }

    Ok(SubmissionRecord {
        id: None,
        user: user_id.to_string(),
        test: test.id.clone(),
        subject: test.subject.clone(),
        lesson: test.lesson.clone(),
        total_questions: breakdown.total_questions,
        correct_answers: breakdown.correct_answers,
        wrong_answers: breakdown.wrong_answers,
        skipped_questions: breakdown.skipped_questions,
        score: breakdown.score,
        average_score: breakdown.average_score,
        time_spent: time_spent_secs,
        submitted_at,
        detailed_answers: breakdown.detailed_answers.clone(),
    })
}

impl SubmissionRecord {
    /// Save the record as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize submission")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write submission to {}", path.display()))?;
        Ok(())
    }

    /// Load a record from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display()))?;
        let record: SubmissionRecord =
            serde_json::from_str(&content).context("failed to parse submission JSON")?;
        Ok(record)
    }
}
