//! The `examdeck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examdeck.toml
    if std::path::Path::new("examdeck.toml").exists() {
        println!("examdeck.toml already exists, skipping.");
    } else {
        std::fs::write("examdeck.toml", SAMPLE_CONFIG)?;
        println!("Created examdeck.toml");
    }

    // Create example test bank
    std::fs::create_dir_all("testbanks")?;
    let example_path = std::path::Path::new("testbanks/example.toml");
    if example_path.exists() {
        println!("testbanks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TESTBANK)?;
        println!("Created testbanks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit examdeck.toml with your service URL and token");
    println!("  2. Run: examdeck validate --testbank testbanks/example.toml");
    println!("  3. Run: examdeck run --test testbanks/example.toml --user <you> --offline");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examdeck configuration

base_url = "http://localhost:8000/api"
api_token = "${EXAMDECK_API_TOKEN}"
timeout_secs = 30
output_dir = "./examdeck-results"
"#;

const EXAMPLE_TESTBANK: &str = r#"[test]
id = "example"
name = "Example Test"
subject = "general"
lesson = "getting-started"
duration_secs = 300

[[questions]]
id = "q1"
text = "Which planet is closest to the sun?"
options = ["Venus", "Mercury", "Mars", "Earth"]
correct = ["B"]
explanation = "Mercury orbits at roughly 58 million km."

[[questions]]
id = "q2"
text = "Which of these are prime numbers?"
options = ["2", "4", "7", "9"]
correct = ["A", "C"]
negative_mark = 0.5
explanation = "2 and 7 are prime; 4 and 9 are composite."
"#;
