//! The `examdeck score` command. Offline scoring, no network.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examdeck_core::parser;
use examdeck_core::scoring::{score_test, ScoreBreakdown};
use examdeck_core::model::TestDefinition;

pub fn execute(test_path: PathBuf, answers_path: PathBuf, json_out: Option<PathBuf>) -> Result<()> {
    let test = parser::parse_test_definition(&test_path)?;
    let script = parser::parse_answer_script(&answers_path)?;
    let states = script.resolve(&test)?;

    let breakdown = score_test(&test, &states);
    print_breakdown(&test, &breakdown);

    if let Some(path) = json_out {
        let json =
            serde_json::to_string_pretty(&breakdown).context("failed to serialize breakdown")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write breakdown to {}", path.display()))?;
        println!("Breakdown saved to: {}", path.display());
    }

    Ok(())
}

fn print_breakdown(test: &TestDefinition, breakdown: &ScoreBreakdown) {
    println!(
        "Score: {:.2} / {:.2} ({:.1}%)",
        breakdown.score,
        test.max_score(),
        breakdown.average_score
    );
    println!(
        "Correct: {} | Wrong: {} | Skipped: {}",
        breakdown.correct_answers, breakdown.wrong_answers, breakdown.skipped_questions
    );

    let mut table = Table::new();
    table.set_header(vec!["Question", "Chosen", "Correct", "Status", "Marks"]);
    for detail in &breakdown.detailed_answers {
        let chosen = detail
            .selected_options
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let correct = detail
            .correct_options
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&detail.question_id),
            Cell::new(if chosen.is_empty() { "-".into() } else { chosen }),
            Cell::new(correct),
            Cell::new(detail.status),
            Cell::new(format!("{:+.2}", detail.marks.obtained)),
        ]);
    }

    println!("\n{table}");
}
