//! The `examdeck rank` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examdeck_client::{load_config_from, ApiClient};
use examdeck_core::leaderboard::{rank_participants, ParticipantScore, Standing};
use examdeck_core::traits::LeaderboardSource;

pub async fn execute(
    input: Option<PathBuf>,
    test_id: Option<String>,
    user: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        input.is_some() != test_id.is_some(),
        "provide exactly one of --input or --test-id"
    );

    let records: Vec<ParticipantScore> = match (&input, &test_id) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&content).context("failed to parse participant records")?
        }
        (_, Some(id)) => {
            let config = load_config_from(config_path.as_deref())?;
            let client = ApiClient::from_config(&config);
            client.fetch_scores(id).await?
        }
        _ => unreachable!("argument pairing checked above"),
    };

    let board = rank_participants(&records, user.as_deref());

    let mut table = Table::new();
    table.set_header(vec!["Rank", "User", "Score"]);
    for entry in &board.entries {
        let name = if entry.is_current_user {
            format!("{} (you)", entry.user)
        } else {
            entry.user.clone()
        };
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(name),
            Cell::new(format!("{:.1}", entry.score)),
        ]);
    }
    println!("{table}");

    println!(
        "Participants: {} | Highest: {:.1} | Average: {:.0}",
        board.participant_count, board.highest_score, board.average_score
    );

    if user.is_some() {
        match board.standing {
            Standing::Ranked { entry } => {
                println!("Your rank: {} (score {:.1})", entry.rank, entry.score)
            }
            Standing::NotParticipated => println!("Not participated."),
        }
    }

    Ok(())
}
