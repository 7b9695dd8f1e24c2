//! cmit - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmit::config::SettingsOverrides;
use cmit::generate::{GenerateConfig, GenerateOutcome, run_generate};
use cmit::llm::AiProvider;

/// Draft a conventional commit message for the staged changes and commit it.
#[derive(Parser, Debug)]
#[command(name = "cmit")]
#[command(about = "Draft a conventional commit message for staged changes, edit it, and commit")]
#[command(version)]
struct Cli {
    /// Print the final message instead of committing
    #[arg(long)]
    dry_run: bool,

    /// Commit the drafted message without opening an editor
    #[arg(long)]
    no_edit: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Prefix the commit type with an emoji
    #[arg(long, overrides_with = "no_emojis")]
    emojis: bool,

    /// Do not prefix the commit type with an emoji
    #[arg(long, overrides_with = "emojis")]
    no_emojis: bool,

    /// Reject messages longer than N characters (0 disables the check)
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = DEFAULT_MAX_LENGTH_ARG
    )]
    max_length: Option<usize>,

    /// AI provider used to draft the message: none, openai, or gemini
    #[arg(long)]
    provider: Option<AiProvider>,

    /// API key for the AI provider (prefer CMIT_API_KEY or cmit.apiKey)
    #[arg(long)]
    api_key: Option<String>,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "PATH", default_value = ".")]
    directory: PathBuf,
}

const DEFAULT_MAX_LENGTH_ARG: &str = "72";

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        let use_emojis = match (self.emojis, self.no_emojis) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        SettingsOverrides {
            use_emojis,
            max_length: self.max_length,
            ai_provider: self.provider,
            api_key: self.api_key.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "cmit=debug" } else { "cmit=warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_directive))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// Only the outermost message; library errors already embed their cause.
fn error_line(e: &anyhow::Error) -> String {
    format!("Error: {e}")
}

async fn run(cli: Cli) -> Result<()> {
    let config = GenerateConfig {
        start_dir: cli.directory.clone(),
        overrides: cli.overrides(),
        dry_run: cli.dry_run,
        edit: !cli.no_edit,
    };

    let outcome = run_generate(config).await?;

    match outcome {
        GenerateOutcome::Committed(report) => {
            println!("✓ Committed {}: {}", report.short_id(), report.subject);
        }
        GenerateOutcome::DryRun(message) => {
            println!("\n--- Dry Run Output ---\n");
            println!("{message}");
        }
        GenerateOutcome::Cancelled => {
            println!("Commit cancelled.");
        }
    }

    Ok(())
}
