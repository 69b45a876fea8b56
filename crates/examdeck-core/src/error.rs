//! Core error types.
//!
//! These represent precondition failures when assembling a session or a
//! submission. They are fatal to starting or finishing a session and are
//! surfaced to the caller immediately, never silently defaulted.

use thiserror::Error;

/// Precondition failures in the core engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No authenticated user id was supplied.
    #[error("no authenticated user id was provided")]
    MissingUserId,

    /// The test definition carries no identifier.
    #[error("test '{name}' has no identifier")]
    MissingTestId { name: String },

    /// The test definition carries no questions.
    #[error("test '{test}' has an empty question set")]
    EmptyQuestionSet { test: String },
}
