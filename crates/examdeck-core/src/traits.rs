//! Collaborator trait definitions.
//!
//! These async traits describe the external services the engine depends on:
//! where tests come from, where submissions go, and where leaderboard data
//! is fetched. They are implemented by the `examdeck-client` crate and by
//! test doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::leaderboard::ParticipantScore;
use crate::model::TestDefinition;
use crate::submission::SubmissionRecord;

/// Read-only source of test definitions, fetched once before a session
/// starts.
#[async_trait]
pub trait TestSource: Send + Sync {
    async fn fetch_test(&self, test_id: &str) -> anyhow::Result<TestDefinition>;
}

/// Accepts a finished submission record for persistence.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> anyhow::Result<SubmissionReceipt>;
}

/// Per-test participant score records for ranking.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn fetch_scores(&self, test_id: &str) -> anyhow::Result<Vec<ParticipantScore>>;
}

/// What the submission sink returns on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Server-assigned identifier for the stored record, if the sink
    /// provides one.
    #[serde(default)]
    pub id: Option<String>,
    /// Echo of the stored record, if the sink returns one.
    #[serde(default)]
    pub stored: Option<SubmissionRecord>,
}
