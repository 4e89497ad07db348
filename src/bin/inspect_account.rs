//! Interactive account inspection CLI
//!
//! Prompts for an account email, prints the resolved workspace hierarchy,
//! then (after confirmation) streams per-resource qualifying-event counts.
//!
//! # Usage
//!
//! ```bash
//! # Fully interactive
//! inspect_account
//!
//! # Against .env.production, no prompts
//! inspect_account --env production --email a@x.com --yes
//! ```
//!
//! Exit codes: 0 on success, cancellation, or no-match; 1 on store
//! failure (the error is printed verbatim).

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use account_inspector::database::{DatabaseConfig, DatabaseManager};
use account_inspector::inspector::Inspector;
use account_inspector::report::render_snapshot;

#[derive(Parser)]
#[command(name = "inspect_account")]
#[command(version = "0.1.0")]
#[command(about = "Resolve an account's workspace hierarchy and summarize qualifying events")]
struct Cli {
    /// Named environment: loads `.env.<NAME>` before reading DATABASE_URL
    #[arg(long)]
    env: Option<String>,

    /// Account email (prompts interactively if not provided)
    #[arg(long)]
    email: Option<String>,

    /// Compute event counts without asking for confirmation
    #[arg(long, short)]
    yes: bool,
}

/// Outcome of one interactive prompt. Ctrl-C / Ctrl-D cancel the run
/// rather than erroring.
enum Prompt {
    Value(String),
    Cancelled,
}

fn prompt_line(editor: &mut DefaultEditor, message: &str) -> Result<Prompt, ReadlineError> {
    match editor.readline(message) {
        Ok(line) => Ok(Prompt::Value(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Prompt::Cancelled),
        Err(err) => Err(err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load the requested environment file before anything reads env vars.
    match &cli.env {
        Some(name) => {
            if dotenvy::from_filename(format!(".env.{name}")).is_err() {
                eprintln!(
                    "{} could not load .env.{name}",
                    "ERROR:".red().bold()
                );
                return ExitCode::FAILURE;
            }
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            // Store failures surface verbatim; nothing is swallowed.
            eprintln!("{} {err}", "ERROR:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut editor = DefaultEditor::new()?;

    let email = match cli.email {
        Some(email) => email,
        None => match prompt_line(&mut editor, "Account email: ")? {
            Prompt::Value(email) => email,
            Prompt::Cancelled => return Ok(ExitCode::SUCCESS),
        },
    };

    // An empty identifier means there is no query to run.
    if email.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let db = DatabaseManager::new(DatabaseConfig::default()).await?;
    let inspector = Inspector::new(db.account_repository());

    let Some(snapshot) = inspector.resolve(&email).await? else {
        println!("No account found for {}", email.bold());
        return Ok(ExitCode::SUCCESS);
    };

    for line in render_snapshot(&snapshot) {
        println!("{line}");
    }

    let compute = cli.yes
        || match prompt_line(&mut editor, "Compute qualifying events? [y/N] ")? {
            Prompt::Value(answer) => matches!(answer.as_str(), "y" | "Y" | "yes"),
            Prompt::Cancelled => false,
        };

    if !compute {
        return Ok(ExitCode::SUCCESS);
    }

    println!("Computing qualifying events...");
    inspector
        .metric_pass(&snapshot, |line| println!("{line}"))
        .await?;

    db.close().await;
    Ok(ExitCode::SUCCESS)
}
