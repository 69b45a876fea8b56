//! Mock backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use examdeck_core::leaderboard::ParticipantScore;
use examdeck_core::model::TestDefinition;
use examdeck_core::submission::SubmissionRecord;
use examdeck_core::traits::{LeaderboardSource, SubmissionReceipt, SubmissionSink, TestSource};

/// An in-memory stand-in for the remote learning service.
///
/// Serves scripted tests and leaderboards, records submissions, and can
/// inject submission failures to exercise retry paths.
#[derive(Default)]
pub struct MockBackend {
    tests: Mutex<HashMap<String, TestDefinition>>,
    scores: Mutex<HashMap<String, Vec<ParticipantScore>>>,
    submit_calls: AtomicU32,
    failures_remaining: AtomicU32,
    last_submission: Mutex<Option<SubmissionRecord>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test definition to serve.
    pub fn with_test(self, test: TestDefinition) -> Self {
        self.tests.lock().unwrap().insert(test.id.clone(), test);
        self
    }

    /// Register leaderboard rows for a test.
    pub fn with_scores(self, test_id: &str, scores: Vec<ParticipantScore>) -> Self {
        self.scores.lock().unwrap().insert(test_id.into(), scores);
        self
    }

    /// Make the next `n` submissions fail with a network-style error.
    pub fn fail_next_submits(&self, n: u32) {
        self.failures_remaining.store(n, Ordering::Relaxed);
    }

    /// Number of submit calls received, including failed ones.
    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::Relaxed)
    }

    /// The most recently accepted submission.
    pub fn last_submission(&self) -> Option<SubmissionRecord> {
        self.last_submission.lock().unwrap().clone()
    }
}

#[async_trait]
impl TestSource for MockBackend {
    async fn fetch_test(&self, test_id: &str) -> anyhow::Result<TestDefinition> {
        self.tests
            .lock()
            .unwrap()
            .get(test_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("test not found: {test_id}"))
    }
}

#[async_trait]
impl SubmissionSink for MockBackend {
    async fn submit(&self, record: &SubmissionRecord) -> anyhow::Result<SubmissionReceipt> {
        let call = self.submit_calls.fetch_add(1, Ordering::Relaxed) + 1;
        if self.failures_remaining.load(Ordering::Relaxed) > 0 {
            self.failures_remaining.fetch_sub(1, Ordering::Relaxed);
            anyhow::bail!("injected network failure");
        }

        *self.last_submission.lock().unwrap() = Some(record.clone());
        Ok(SubmissionReceipt {
            id: Some(format!("sub-{call}")),
            stored: None,
        })
    }
}

#[async_trait]
impl LeaderboardSource for MockBackend {
    async fn fetch_scores(&self, test_id: &str) -> anyhow::Result<Vec<ParticipantScore>> {
        Ok(self
            .scores
            .lock()
            .unwrap()
            .get(test_id)
            .cloned()
            .unwrap_or_default())
    }
}
