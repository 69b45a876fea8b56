//! HTML result report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::Path;

use anyhow::Result;

use examdeck_core::model::TestDefinition;
use examdeck_core::scoring::AnswerStatus;
use examdeck_core::submission::SubmissionRecord;

use crate::review::build_review;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn letters(letters: &[examdeck_core::model::OptionLetter]) -> String {
    letters
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate an HTML result report from a submission record and its test
/// definition.
pub fn generate_result_html(test: &TestDefinition, record: &SubmissionRecord) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>examdeck result — {}</title>\n",
        html_escape(&test.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>examdeck result</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Test: <strong>{}</strong> | Learner: <strong>{}</strong> | {}</p>\n",
        html_escape(&test.name),
        html_escape(&record.user),
        record.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score card
    html.push_str("<section class=\"scorecard\">\n");
    html.push_str("<h2>Score</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Percent</th><th>Correct</th><th>Wrong</th><th>Skipped</th><th>Time Spent</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.2}</td><td>{:.1}%</td><td>{}</td><td>{}</td><td>{}</td><td>{}s</td></tr></tbody>\n",
        record.score,
        record.average_score,
        record.correct_answers,
        record.wrong_answers,
        record.skipped_questions,
        record.time_spent,
    ));
    html.push_str("</table>\n");
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"review\">\n");
    html.push_str("<h2>Review</h2>\n");
    html.push_str("<table class=\"review-table\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Chosen</th><th>Correct</th><th>Status</th><th>Marks</th><th>Flagged</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for row in build_review(test, record) {
        let status_class = match row.status {
            AnswerStatus::Correct => "pass",
            AnswerStatus::Wrong => "fail",
            AnswerStatus::Skipped => "skip",
        };
        let chosen = row
            .chosen
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unattempted".to_string());

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{:+.2}</td><td>{}</td></tr>\n",
            status_class,
            html_escape(&row.question_text),
            chosen,
            letters(&row.correct_options),
            status_class,
            row.status,
            row.marks_obtained,
            if row.marked_for_review { "yes" } else { "" },
        ));

        if let Some(explanation) = &row.explanation {
            html.push_str(&format!(
                "<tr class=\"explanation\"><td colspan=\"6\">{}</td></tr>\n",
                html_escape(explanation)
            ));
        }
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(record)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML result report to a file.
pub fn write_result_report(
    test: &TestDefinition,
    record: &SubmissionRecord,
    path: &Path,
) -> Result<()> {
    let html = generate_result_html(test, record);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0 auto; max-width: 900px; padding: 2rem; color: #1a1a2e; }
header { border-bottom: 2px solid #e0e0e8; padding-bottom: 1rem; margin-bottom: 2rem; }
h1 { margin: 0 0 0.5rem; }
.meta { color: #666; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #e0e0e8; padding: 0.5rem 0.75rem; text-align: left; }
th { background: #f5f5fa; }
td.pass { color: #1a7f37; font-weight: 600; }
td.fail { color: #cf222e; font-weight: 600; }
td.skip { color: #9a6700; font-weight: 600; }
tr.explanation td { background: #fafafd; color: #555; font-style: italic; border-top: none; }
.raw-data pre { background: #f5f5fa; padding: 1rem; overflow-x: auto; font-size: 0.85rem; }
"#;
