//! TOML test-bank parser.
//!
//! Loads test definitions and answer scripts from TOML files and
//! directories, and validates definitions for common authoring mistakes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AnswerState, OptionLetter, Question, QuestionOption, TestDefinition, MAX_OPTIONS,
};

/// Intermediate TOML structure for parsing test definition files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    id: String,
    name: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    lesson: String,
    #[serde(default = "default_duration")]
    duration_secs: u64,
}

fn default_duration() -> u64 {
    600
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: Vec<String>,
    #[serde(default = "default_positive")]
    positive_mark: f64,
    #[serde(default)]
    negative_mark: f64,
    #[serde(default)]
    explanation: Option<String>,
}

fn default_positive() -> f64 {
    1.0
}

/// Parse a single TOML file into a `TestDefinition`.
pub fn parse_test_definition(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test definition: {}", path.display()))?;

    parse_test_definition_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
pub fn parse_test_definition_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let correct_options = q
                .correct
                .iter()
                .map(|letter| {
                    letter
                        .parse::<OptionLetter>()
                        .map_err(|e| anyhow::anyhow!("question '{}': {}", q.id, e))
                })
                .collect::<Result<Vec<_>>>()?;

            let options = q
                .options
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let letter = OptionLetter::from_index(i)
                        .map(|l| l.to_string().to_ascii_lowercase())
                        .unwrap_or_else(|| i.to_string());
                    QuestionOption {
                        id: format!("{}:{}", q.id, letter),
                        text: text.clone(),
                    }
                })
                .collect();

            Ok(Question {
                id: q.id,
                text: q.text,
                options,
                correct_options,
                positive_mark: q.positive_mark,
                negative_mark: q.negative_mark,
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestDefinition {
        id: parsed.test.id,
        name: parsed.test.name,
        subject: parsed.test.subject,
        lesson: parsed.test.lesson,
        duration_secs: parsed.test.duration_secs,
        questions,
    })
}

/// Recursively load all `.toml` test definitions from a directory.
pub fn load_testbank_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_testbank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test_definition(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// A warning from test definition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test definition for common issues.
pub fn validate_test(test: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if test.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "test has no questions; a session cannot start".into(),
        });
    }

    if test.duration_secs == 0 {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "duration_secs is 0; the session expires on the first tick".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for q in &test.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &test.questions {
        if q.options.is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question has no options".into(),
            });
        }
        if q.options.len() > MAX_OPTIONS {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!(
                    "question has {} options; only the first {} are addressable",
                    q.options.len(),
                    MAX_OPTIONS
                ),
            });
        }
        if q.correct_options.is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "no correct options declared; every answer scores wrong".into(),
            });
        }
        for letter in &q.correct_options {
            if letter.index() >= q.options.len() {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id.clone()),
                    message: format!("correct option {letter} is outside the option list"),
                });
            }
        }
        if q.positive_mark <= 0.0 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("positive_mark is {}; correct answers earn nothing", q.positive_mark),
            });
        }
        if q.negative_mark < 0.0 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "negative_mark is negative; wrong answers would add marks".into(),
            });
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Answer scripts
// ---------------------------------------------------------------------------

/// A scripted set of answers used to replay a session non-interactively.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerScript {
    /// Expected test id, if the script is pinned to one.
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default)]
    pub answers: Vec<ScriptedAnswer>,
}

/// One scripted answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedAnswer {
    /// Question id this entry addresses.
    pub question: String,
    /// Chosen option letter. Absent means review-only or deliberately
    /// unanswered.
    #[serde(default)]
    pub selected: Option<OptionLetter>,
    /// Review flag.
    #[serde(default)]
    pub review: bool,
}

/// Parse an answer script from a TOML file.
pub fn parse_answer_script(path: &Path) -> Result<AnswerScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer script: {}", path.display()))?;
    parse_answer_script_str(&content, path)
}

/// Parse an answer script from a TOML string.
pub fn parse_answer_script_str(content: &str, source_path: &Path) -> Result<AnswerScript> {
    let script: AnswerScript = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(script)
}

impl AnswerScript {
    /// Resolve this script against a test definition into one answer state
    /// per question.
    ///
    /// A script pinned to a different test id is an error. Entries naming an
    /// unknown question, or a letter outside the question's option list, are
    /// skipped with a warning.
    pub fn resolve(&self, test: &TestDefinition) -> Result<Vec<AnswerState>> {
        if let Some(expected) = &self.test {
            anyhow::ensure!(
                expected == &test.id,
                "answer script targets test '{}', not '{}'",
                expected,
                test.id
            );
        }

        let index_of: std::collections::HashMap<&str, usize> = test
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.as_str(), i))
            .collect();

        let mut states = vec![AnswerState::default(); test.questions.len()];
        for entry in &self.answers {
            let Some(&i) = index_of.get(entry.question.as_str()) else {
                tracing::warn!(question = %entry.question, "answer script names an unknown question, skipping");
                continue;
            };

            let selected = entry.selected.and_then(|letter| {
                if letter.index() < test.questions[i].options.len() {
                    Some(letter.index())
                } else {
                    tracing::warn!(
                        question = %entry.question,
                        letter = %letter,
                        "scripted letter is outside the option list, leaving unanswered"
                    );
                    None
                }
            });

            states[i] = AnswerState {
                selected,
                marked_for_review: entry.review,
            };
        }

        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[test]
id = "algebra-basics"
name = "Algebra Basics"
subject = "math"
lesson = "linear-equations"
duration_secs = 600

[[questions]]
id = "q1"
text = "Solve x + 1 = 3"
options = ["1", "2", "3", "4"]
correct = ["B"]
negative_mark = 0.5
explanation = "Subtract 1 from both sides."

[[questions]]
id = "q2"
text = "Which are even?"
options = ["1", "2", "3", "4"]
correct = ["B", "D"]
positive_mark = 2.0
"#;

    #[test]
    fn parse_valid_toml() {
        let test = parse_test_definition_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(test.id, "algebra-basics");
        assert_eq!(test.duration_secs, 600);
        assert_eq!(test.questions.len(), 2);
        assert_eq!(test.questions[0].options.len(), 4);
        assert_eq!(test.questions[0].options[1].id, "q1:b");
        assert_eq!(test.questions[0].negative_mark, 0.5);
        assert_eq!(test.questions[1].correct_options.len(), 2);
        assert_eq!(test.questions[1].positive_mark, 2.0);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[test]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
text = "Pick one"
options = ["yes", "no"]
correct = ["A"]
"#;
        let test = parse_test_definition_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(test.duration_secs, 600);
        assert_eq!(test.subject, "");
        assert_eq!(test.questions[0].positive_mark, 1.0);
        assert_eq!(test.questions[0].negative_mark, 0.0);
    }

    #[test]
    fn parse_rejects_bad_letter() {
        let toml = r#"
[test]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
text = "Pick one"
options = ["yes", "no"]
correct = ["yes"]
"#;
        let result = parse_test_definition_str(toml, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_test_definition_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_duplicate_question_ids() {
        let toml = r#"
[test]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
text = "First"
options = ["a", "b"]
correct = ["A"]

[[questions]]
id = "same"
text = "Second"
options = ["a", "b"]
correct = ["B"]
"#;
        let test = parse_test_definition_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_test(&test);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_correct_letter_out_of_range() {
        let toml = r#"
[test]
id = "oob"
name = "Out of bounds"

[[questions]]
id = "q1"
text = "Pick one"
options = ["a", "b"]
correct = ["D"]
"#;
        let test = parse_test_definition_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_test(&test);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("outside the option list")));
    }

    #[test]
    fn validate_empty_test() {
        let toml = r#"
[test]
id = "empty"
name = "Empty"
duration_secs = 0
"#;
        let test = parse_test_definition_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_test(&test);
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));
        assert!(warnings.iter().any(|w| w.message.contains("duration_secs")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("algebra.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a testbank").unwrap();

        let tests = load_testbank_directory(dir.path()).unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].id, "algebra-basics");
    }

    #[test]
    fn answer_script_resolves_by_question_id() {
        let test = parse_test_definition_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let script = parse_answer_script_str(
            r#"
test = "algebra-basics"

[[answers]]
question = "q2"
selected = "D"
review = true

[[answers]]
question = "q1"
selected = "B"
"#,
            &PathBuf::from("answers.toml"),
        )
        .unwrap();

        let states = script.resolve(&test).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].selected, Some(1));
        assert!(!states[0].marked_for_review);
        assert_eq!(states[1].selected, Some(3));
        assert!(states[1].marked_for_review);
    }

    #[test]
    fn answer_script_skips_unknown_questions() {
        let test = parse_test_definition_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let script = parse_answer_script_str(
            r#"
[[answers]]
question = "ghost"
selected = "A"
"#,
            &PathBuf::from("answers.toml"),
        )
        .unwrap();

        let states = script.resolve(&test).unwrap();
        assert!(states.iter().all(|s| !s.is_answered()));
    }

    #[test]
    fn answer_script_rejects_wrong_test() {
        let test = parse_test_definition_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let script = parse_answer_script_str(
            r#"
test = "some-other-test"

[[answers]]
question = "q1"
selected = "A"
"#,
            &PathBuf::from("answers.toml"),
        )
        .unwrap();

        assert!(script.resolve(&test).is_err());
    }

    #[test]
    fn answer_script_drops_out_of_range_letter() {
        let test = parse_test_definition_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let script = parse_answer_script_str(
            r#"
[[answers]]
question = "q1"
selected = "Z"
review = true
"#,
            &PathBuf::from("answers.toml"),
        )
        .unwrap();

        let states = script.resolve(&test).unwrap();
        assert_eq!(states[0].selected, None);
        assert!(states[0].marked_for_review);
    }
}
