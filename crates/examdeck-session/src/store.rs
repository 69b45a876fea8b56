//! In-memory answer state for one active session.

use examdeck_core::model::AnswerState;

/// Per-question answer and review-flag state for one session.
///
/// Holds exactly one [`AnswerState`] per question, created unset at session
/// start. Reading is a total function over `[0, question_count)`; an
/// out-of-range index is a programming error, not a runtime condition.
/// The store performs no IO and never touches the network.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    states: Vec<AnswerState>,
}

impl AnswerStore {
    /// Create a store with one unset state per question.
    pub fn new(question_count: usize) -> Self {
        Self {
            states: vec![AnswerState::default(); question_count],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state of one question.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn state(&self, question: usize) -> AnswerState {
        self.states[question]
    }

    /// Select an option for a question, overwriting any prior selection.
    /// One selection per question, even for multi-correct questions.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn select(&mut self, question: usize, option: usize) {
        self.states[question].selected = Some(option);
    }

    /// Withdraw the selection for a question, leaving the review flag alone.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn clear_selection(&mut self, question: usize) {
        self.states[question].selected = None;
    }

    /// Flip the review flag for a question, independently of its answer.
    ///
    /// # Panics
    ///
    /// Panics if `question` is out of range.
    pub fn toggle_review(&mut self, question: usize) {
        let flag = &mut self.states[question].marked_for_review;
        *flag = !*flag;
    }

    /// A copy of all states, in question order. Scoring consumes this
    /// snapshot so that later mutations cannot affect an in-flight
    /// submission.
    pub fn snapshot(&self) -> Vec<AnswerState> {
        self.states.clone()
    }

    pub fn answered_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_answered()).count()
    }

    pub fn review_count(&self) -> usize {
        self.states.iter().filter(|s| s.marked_for_review).count()
    }
}
