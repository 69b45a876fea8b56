//! The `examdeck run` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use examdeck_client::{load_config_from, ApiClient};
use examdeck_core::parser;
use examdeck_core::scoring::score_test;
use examdeck_core::submission::{build_submission, SubmissionRecord};
use examdeck_core::traits::TestSource;
use examdeck_report::write_result_report;
use examdeck_session::{run_until_expiry, ExamSession, SubmitOutcome};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    test_path: Option<PathBuf>,
    test_id: Option<String>,
    answers: Option<PathBuf>,
    user: String,
    wait: bool,
    offline: bool,
    output: PathBuf,
    html: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        test_path.is_some() != test_id.is_some(),
        "provide exactly one of --test or --test-id"
    );

    let config = load_config_from(config_path.as_deref())?;

    // Fetch the definition once, before the session starts.
    let definition = match (&test_path, &test_id) {
        (Some(path), _) => parser::parse_test_definition(path)?,
        (_, Some(id)) => {
            let client = ApiClient::from_config(&config);
            client.fetch_test(id).await?
        }
        _ => unreachable!("argument pairing checked above"),
    };

    for w in parser::validate_test(&definition) {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("[{id}] "))
            .unwrap_or_default();
        eprintln!("Warning: {prefix}{}", w.message);
    }

    let mut session = ExamSession::new(definition.clone(), &user)?;

    if let Some(answers_path) = &answers {
        let script = parser::parse_answer_script(answers_path)?;
        let states = script.resolve(&definition)?;
        for (i, state) in states.iter().enumerate() {
            if let Some(option) = state.selected {
                session.select_answer(i, option);
            }
            if state.marked_for_review {
                session.toggle_review(i);
            }
        }
    }

    println!(
        "Answered {}/{} questions ({} flagged for review)",
        session.answered_count(),
        session.question_count(),
        session.review_count()
    );

    let record = if offline {
        // No sink: score and build the record with the core functions alone.
        let breakdown = score_test(&definition, &session.snapshot());
        build_submission(
            &definition,
            &user,
            &breakdown,
            session.elapsed_secs(),
            Utc::now(),
        )?
    } else {
        let client = ApiClient::from_config(&config);
        let outcome = if wait {
            println!(
                "Waiting out the {}s countdown before submitting...",
                session.remaining_secs()
            );
            run_until_expiry(&mut session, &client).await?
        } else {
            session.finalize_and_submit(&client).await?
        };

        match outcome {
            SubmitOutcome::Confirmed { record } => {
                match &record.id {
                    Some(id) => println!("Submission confirmed (id {id})"),
                    None => println!("Submission confirmed"),
                }
                record
            }
            SubmitOutcome::Failed { error } => {
                if let Some(retained) = session.record() {
                    std::fs::create_dir_all(&output)?;
                    let path = output.join(format!(
                        "unsent-{}-{}.json",
                        retained.test,
                        timestamp()
                    ));
                    retained.save_json(&path)?;
                    eprintln!(
                        "Record retained at {}; re-run this command to retry.",
                        path.display()
                    );
                }
                anyhow::bail!("submission failed: {error}");
            }
            other => anyhow::bail!("unexpected submit outcome: {other:?}"),
        }
    };

    print_summary(&record);

    std::fs::create_dir_all(&output)?;
    let path = output.join(format!("submission-{}-{}.json", record.test, timestamp()));
    record.save_json(&path)?;
    println!("Submission saved to: {}", path.display());

    if html {
        let html_path = output.join(format!("result-{}-{}.html", record.test, timestamp()));
        write_result_report(&definition, &record, &html_path)?;
        println!("HTML report: {}", html_path.display());
    }

    Ok(())
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H%M%S").to_string()
}

fn print_summary(record: &SubmissionRecord) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Score", "Percent", "Correct", "Wrong", "Skipped", "Time",
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", record.score)),
        Cell::new(format!("{:.1}%", record.average_score)),
        Cell::new(record.correct_answers),
        Cell::new(record.wrong_answers),
        Cell::new(record.skipped_questions),
        Cell::new(format!("{}s", record.time_spent)),
    ]);

    println!("\n{table}");
}
