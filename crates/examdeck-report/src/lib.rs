//! examdeck-report — Result review and report generation.
//!
//! Read-only projections of a confirmed submission record: per-question
//! review rows for display, and a self-contained HTML result report.

pub mod html;
pub mod review;

pub use html::{generate_result_html, write_result_report};
pub use review::{build_review, ReviewRow};
