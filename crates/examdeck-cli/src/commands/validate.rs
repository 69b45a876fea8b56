//! The `examdeck validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(testbank_path: PathBuf) -> Result<()> {
    let tests = if testbank_path.is_dir() {
        examdeck_core::parser::load_testbank_directory(&testbank_path)?
    } else {
        vec![examdeck_core::parser::parse_test_definition(&testbank_path)?]
    };

    let mut total_warnings = 0;

    for test in &tests {
        println!(
            "Test: {} ({} questions, {}s)",
            test.name,
            test.questions.len(),
            test.duration_secs
        );

        let warnings = examdeck_core::parser::validate_test(test);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All test banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
