//! The `examdeck review` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examdeck_core::parser;
use examdeck_core::submission::SubmissionRecord;
use examdeck_report::{build_review, write_result_report};

pub fn execute(
    test_path: PathBuf,
    submission_path: PathBuf,
    html_out: Option<PathBuf>,
) -> Result<()> {
    let test = parser::parse_test_definition(&test_path)?;
    let record = SubmissionRecord::load_json(&submission_path)?;

    anyhow::ensure!(
        record.test == test.id,
        "submission is for test '{}', not '{}'",
        record.test,
        test.id
    );

    if let Some(path) = html_out {
        write_result_report(&test, &record, &path)?;
        println!("HTML report: {}", path.display());
        return Ok(());
    }

    println!(
        "{} by {}: score {:.2} ({:.1}%)",
        test.name, record.user, record.score, record.average_score
    );

    let rows = build_review(&test, &record);

    let mut table = Table::new();
    table.set_header(vec![
        "Question", "Chosen", "Correct", "Status", "Marks", "Flagged",
    ]);
    for row in &rows {
        let chosen = row
            .chosen
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unattempted".to_string());
        let correct = row
            .correct_options
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&row.question_id),
            Cell::new(chosen),
            Cell::new(correct),
            Cell::new(row.status),
            Cell::new(format!("{:+.2}", row.marks_obtained)),
            Cell::new(if row.marked_for_review { "yes" } else { "" }),
        ]);
    }
    println!("\n{table}");

    for row in &rows {
        if let Some(explanation) = &row.explanation {
            println!("[{}] {}", row.question_id, explanation);
        }
    }

    Ok(())
}
