//! examdeck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examdeck", version, about = "Exam session engine and leaderboard toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session against a test and submit it
    Run {
        /// Path to a local test definition TOML
        #[arg(long)]
        test: Option<PathBuf>,

        /// Fetch the test definition from the configured service by id
        #[arg(long)]
        test_id: Option<String>,

        /// Answer script TOML to replay into the session
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Authenticated user id submitting the attempt
        #[arg(long)]
        user: String,

        /// Tick the countdown in real time and submit on expiry
        #[arg(long)]
        wait: bool,

        /// Score and save locally without contacting the service
        #[arg(long)]
        offline: bool,

        /// Output directory
        #[arg(long, default_value = "./examdeck-results")]
        output: PathBuf,

        /// Also write an HTML result report
        #[arg(long)]
        html: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score an answer script against a test definition, offline
    Score {
        /// Path to the test definition TOML
        #[arg(long)]
        test: PathBuf,

        /// Path to the answer script TOML
        #[arg(long)]
        answers: PathBuf,

        /// Save the score breakdown as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Rank participant scores into a leaderboard
    Rank {
        /// JSON file with participant score records
        #[arg(long)]
        input: Option<PathBuf>,

        /// Fetch the leaderboard from the configured service by test id
        #[arg(long)]
        test_id: Option<String>,

        /// Highlight this user and report their standing
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Review a saved submission against its test definition
    Review {
        /// Path to the test definition TOML
        #[arg(long)]
        test: PathBuf,

        /// Path to the saved submission JSON
        #[arg(long)]
        submission: PathBuf,

        /// Write an HTML report to this path instead of printing
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Validate test bank TOML files
    Validate {
        /// Path to a test definition file or directory
        #[arg(long)]
        testbank: PathBuf,
    },

    /// Create starter config and example test bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            test,
            test_id,
            answers,
            user,
            wait,
            offline,
            output,
            html,
            config,
        } => {
            commands::run::execute(
                test, test_id, answers, user, wait, offline, output, html, config,
            )
            .await
        }
        Commands::Score {
            test,
            answers,
            json,
        } => commands::score::execute(test, answers, json),
        Commands::Rank {
            input,
            test_id,
            user,
            config,
        } => commands::rank::execute(input, test_id, user, config).await,
        Commands::Review {
            test,
            submission,
            html,
        } => commands::review::execute(test, submission, html),
        Commands::Validate { testbank } => commands::validate::execute(testbank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
