//! examdeck-client — HTTP collaborators.
//!
//! Implements the core's `TestSource`, `SubmissionSink`, and
//! `LeaderboardSource` traits against the remote learning service, and
//! normalizes its loosely-shaped responses at the boundary so the core
//! never branches on payload shape.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{load_config, load_config_from, ClientConfig};
pub use error::ApiError;
pub use http::ApiClient;
pub use mock::MockBackend;
