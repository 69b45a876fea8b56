//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn examdeck() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("examdeck").unwrap()
}

/// The worked example: Q1 correct, Q2 wrong, Q3 unanswered, Q4 correct.
const WORKED_EXAMPLE_ANSWERS: &str = r#"
test = "algebra-basics"

[[answers]]
question = "q1"
selected = "B"

[[answers]]
question = "q2"
selected = "A"

[[answers]]
question = "q4"
selected = "D"
review = true
"#;

#[test]
fn validate_algebra_testbank() {
    examdeck()
        .arg("validate")
        .arg("--testbank")
        .arg("../../testbanks/algebra-basics.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 questions"))
        .stdout(predicate::str::contains("All test banks valid"));
}

#[test]
fn validate_directory() {
    examdeck()
        .arg("validate")
        .arg("--testbank")
        .arg("../../testbanks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra Basics"))
        .stdout(predicate::str::contains("Mixed Marking"));
}

#[test]
fn validate_nonexistent_file() {
    examdeck()
        .arg("validate")
        .arg("--testbank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_worked_example() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.toml");
    std::fs::write(&answers, WORKED_EXAMPLE_ANSWERS).unwrap();

    examdeck()
        .arg("score")
        .arg("--test")
        .arg("../../testbanks/algebra-basics.toml")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1.50 / 4.00 (37.5%)"))
        .stdout(predicate::str::contains("Correct: 2 | Wrong: 1 | Skipped: 1"))
        .stdout(predicate::str::contains("skipped"));
}

#[test]
fn score_saves_json_breakdown() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.toml");
    let breakdown = dir.path().join("breakdown.json");
    std::fs::write(&answers, WORKED_EXAMPLE_ANSWERS).unwrap();

    examdeck()
        .arg("score")
        .arg("--test")
        .arg("../../testbanks/algebra-basics.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--json")
        .arg(&breakdown)
        .assert()
        .success()
        .stdout(predicate::str::contains("Breakdown saved to:"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&breakdown).unwrap()).unwrap();
    assert_eq!(json["score"], 1.5);
    assert_eq!(json["correct_answers"], 2);
    assert_eq!(json["detailed_answers"].as_array().unwrap().len(), 4);
}

#[test]
fn rank_local_records() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scores.json");
    std::fs::write(
        &input,
        r#"[
            {"user": "A", "score": 50.0},
            {"user": "B", "score": 80.0},
            {"user": "C", "score": 80.0}
        ]"#,
    )
    .unwrap();

    examdeck()
        .arg("rank")
        .arg("--input")
        .arg(&input)
        .arg("--user")
        .arg("A")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Participants: 3 | Highest: 80.0 | Average: 70",
        ))
        .stdout(predicate::str::contains("A (you)"))
        .stdout(predicate::str::contains("Your rank: 3 (score 50.0)"));
}

#[test]
fn rank_empty_records() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scores.json");
    std::fs::write(&input, "[]").unwrap();

    examdeck()
        .arg("rank")
        .arg("--input")
        .arg(&input)
        .arg("--user")
        .arg("nobody")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Participants: 0 | Highest: 0.0 | Average: 0",
        ))
        .stdout(predicate::str::contains("Not participated."));
}

#[test]
fn run_offline_then_review() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.toml");
    let output = dir.path().join("results");
    std::fs::write(&answers, WORKED_EXAMPLE_ANSWERS).unwrap();

    examdeck()
        .arg("run")
        .arg("--test")
        .arg("../../testbanks/algebra-basics.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--user")
        .arg("alice")
        .arg("--offline")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Answered 3/4 questions"))
        .stdout(predicate::str::contains("Submission saved to:"));

    let submission = std::fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("submission-algebra-basics"))
        })
        .expect("submission file should exist");

    examdeck()
        .arg("review")
        .arg("--test")
        .arg("../../testbanks/algebra-basics.toml")
        .arg("--submission")
        .arg(&submission)
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("unattempted"))
        .stdout(predicate::str::contains("Subtract 1 from both sides"));
}

#[test]
fn run_requires_exactly_one_test_source() {
    examdeck()
        .arg("run")
        .arg("--user")
        .arg("alice")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one of --test or --test-id"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examdeck.toml"))
        .stdout(predicate::str::contains("Created testbanks/example.toml"));

    assert!(dir.path().join("examdeck.toml").exists());
    assert!(dir.path().join("testbanks/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    examdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    examdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_example_testbank_validates_cleanly() {
    let dir = TempDir::new().unwrap();

    examdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    examdeck()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--testbank")
        .arg("testbanks/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All test banks valid"));
}
