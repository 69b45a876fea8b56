//! One learner's in-progress attempt at a test.
//!
//! [`ExamSession`] owns the test definition, the answer store, the countdown
//! clock, and the submission pipeline state machine
//! (`Idle → Submitting → Confirmed | Failed`). All mutation goes through
//! `&mut self`, which serializes user events, clock ticks, and submit
//! triggers the way a UI event queue would.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use examdeck_core::error::CoreError;
use examdeck_core::model::{AnswerState, TestDefinition};
use examdeck_core::scoring::score_test;
use examdeck_core::submission::{build_submission, SubmissionRecord};
use examdeck_core::traits::SubmissionSink;

use crate::clock::{SessionClock, Tick};
use crate::store::AnswerStore;

/// Errors that prevent a session from starting or finishing.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Precondition(#[from] CoreError),
}

/// Submission pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Confirmed,
    Failed,
}

/// Result of one finalize-and-submit trigger.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The sink confirmed persistence. The session is complete.
    Confirmed { record: SubmissionRecord },
    /// The sink rejected or never received the record. It is retained
    /// unsent; the caller may trigger a manual retry.
    Failed { error: String },
    /// A submission is already in flight; this trigger was absorbed.
    AlreadyInFlight,
    /// The session already submitted successfully; this trigger was
    /// absorbed.
    AlreadyConfirmed,
}

/// One active exam session.
#[derive(Debug)]
pub struct ExamSession {
    id: Uuid,
    test: TestDefinition,
    user: String,
    store: AnswerStore,
    clock: SessionClock,
    phase: SubmitPhase,
    /// The built record: retained unsent after a failure, annotated and
    /// kept after confirmation.
    record: Option<SubmissionRecord>,
}

impl ExamSession {
    /// Start a session for an authenticated user.
    ///
    /// An empty user id, a test without an identifier, or an empty question
    /// set is a precondition failure: the session never starts.
    pub fn new(test: TestDefinition, user_id: &str) -> Result<Self, SessionError> {
        if user_id.trim().is_empty() {
            return Err(CoreError::MissingUserId.into());
        }
        if test.id.trim().is_empty() {
            return Err(CoreError::MissingTestId {
                name: test.name.clone(),
            }
            .into());
        }
        if test.questions.is_empty() {
            return Err(CoreError::EmptyQuestionSet {
                test: test.id.clone(),
            }
            .into());
        }

        let store = AnswerStore::new(test.questions.len());
        let clock = SessionClock::new(test.duration_secs);
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, test = %test.id, user = user_id, "session started");

        Ok(Self {
            id,
            test,
            user: user_id.to_string(),
            store,
            clock,
            phase: SubmitPhase::Idle,
            record: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn test(&self) -> &TestDefinition {
        &self.test
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// The built submission record, if finalization has produced one.
    pub fn record(&self) -> Option<&SubmissionRecord> {
        self.record.as_ref()
    }

    pub fn question_count(&self) -> usize {
        self.test.questions.len()
    }

    pub fn answer(&self, question: usize) -> AnswerState {
        self.store.state(question)
    }

    pub fn answered_count(&self) -> usize {
        self.store.answered_count()
    }

    /// A copy of the current answer states, in question order.
    pub fn snapshot(&self) -> Vec<AnswerState> {
        self.store.snapshot()
    }

    pub fn review_count(&self) -> usize {
        self.store.review_count()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    pub fn is_expired(&self) -> bool {
        self.clock.is_expired()
    }

    /// Select an option for a question. Ignored once finalization has begun;
    /// answer state is never mutated after submission is finalized.
    ///
    /// # Panics
    ///
    /// Panics if `question` or `option` is out of range.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        if self.phase != SubmitPhase::Idle {
            tracing::debug!(question, "ignoring selection after finalization began");
            return;
        }
        assert!(
            option < self.test.questions[question].options.len(),
            "option index {option} out of range for question {question}"
        );
        self.store.select(question, option);
    }

    /// Withdraw the selection for a question. Ignored once finalization has
    /// begun.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn clear_answer(&mut self, question: usize) {
        if self.phase != SubmitPhase::Idle {
            tracing::debug!(question, "ignoring clear after finalization began");
            return;
        }
        self.store.clear_selection(question);
    }

    /// Flip the review flag for a question. Ignored once finalization has
    /// begun.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn toggle_review(&mut self, question: usize) {
        if self.phase != SubmitPhase::Idle {
            tracing::debug!(question, "ignoring review toggle after finalization began");
            return;
        }
        self.store.toggle_review(question);
    }

    /// Advance the countdown by one second. On [`Tick::Expired`] the caller
    /// must route into [`finalize_and_submit`](Self::finalize_and_submit),
    /// the same path as a manual submit.
    pub fn tick(&mut self) -> Tick {
        self.clock.tick()
    }

    /// Finalize the session and send it to the sink.
    ///
    /// Triggered by manual submit confirmation or by clock expiry; both take
    /// this path, so the session terminates even without learner action.
    /// The answer snapshot is captured before the network call, duplicate
    /// triggers collapse into no-op outcomes, and a failed send leaves the
    /// answer store and the built record untouched for a manual retry.
    pub async fn finalize_and_submit(
        &mut self,
        sink: &dyn SubmissionSink,
    ) -> Result<SubmitOutcome, SessionError> {
        match self.phase {
            SubmitPhase::Confirmed => return Ok(SubmitOutcome::AlreadyConfirmed),
            SubmitPhase::Submitting => return Ok(SubmitOutcome::AlreadyInFlight),
            SubmitPhase::Idle | SubmitPhase::Failed => {}
        }

        // A retry resends the retained record unchanged; a first attempt
        // scores a snapshot taken before anything is awaited.
        let record = match self.record.take() {
            Some(retained) => retained,
            None => {
                let snapshot = self.store.snapshot();
                let breakdown = score_test(&self.test, &snapshot);
                build_submission(
                    &self.test,
                    &self.user,
                    &breakdown,
                    self.clock.elapsed_secs(),
                    Utc::now(),
                )?
            }
        };

        self.phase = SubmitPhase::Submitting;
        tracing::debug!(session = %self.id, test = %self.test.id, "submitting session");

        match sink.submit(&record).await {
            Ok(receipt) => {
                let mut confirmed = receipt.stored.unwrap_or(record);
                if confirmed.id.is_none() {
                    confirmed.id = receipt.id;
                }
                self.clock.halt();
                self.phase = SubmitPhase::Confirmed;
                self.record = Some(confirmed.clone());
                tracing::debug!(session = %self.id, id = ?confirmed.id, "submission confirmed");
                Ok(SubmitOutcome::Confirmed { record: confirmed })
            }
            Err(e) => {
                self.phase = SubmitPhase::Failed;
                self.record = Some(record);
                tracing::warn!(session = %self.id, error = %e, "submission failed, record retained");
                Ok(SubmitOutcome::Failed {
                    error: format!("{e:#}"),
                })
            }
        }
    }

    /// Abandon the session: stop the clock and discard all answer state.
    /// Nothing is sent; cancellation never produces a partial submission.
    pub fn cancel(mut self) {
        self.clock.halt();
        tracing::debug!(session = %self.id, "session cancelled, answer state discarded");
    }
}
