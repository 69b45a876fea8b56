//! examdeck-session — Live session driving.
//!
//! Holds one learner's in-progress attempt: the per-question answer store,
//! the countdown clock, and the submission pipeline state machine that
//! guarantees a session terminates exactly once.

pub mod clock;
pub mod session;
pub mod store;

use std::time::Duration;

use examdeck_core::traits::SubmissionSink;

pub use clock::{ClockState, SessionClock, Tick};
pub use session::{ExamSession, SessionError, SubmitOutcome, SubmitPhase};
pub use store::AnswerStore;

/// Drive a session's clock at one tick per second until it expires, then
/// route into the finalize-and-submit path.
///
/// This is the unattended path: even without any learner action the session
/// terminates with exactly one submission attempt, identical in content to
/// a manual submit at the moment of expiry.
pub async fn run_until_expiry(
    session: &mut ExamSession,
    sink: &dyn SubmissionSink,
) -> Result<SubmitOutcome, SessionError> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first interval tick completes immediately; skip it so each
    // subsequent tick marks one elapsed second.
    interval.tick().await;

    loop {
        interval.tick().await;
        match session.tick() {
            Tick::Counting { .. } => continue,
            Tick::Expired | Tick::Stopped => {
                return session.finalize_and_submit(sink).await;
            }
        }
    }
}
