// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use git_autocommit::utils::logging::{format_success, format_warning};
use git_autocommit::{Config, FileChange, GitCliProvider, RepositoryClient, TracingLogger};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "git_autocommit")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Apply generated file changes to a git branch and push them", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the origin into the repository directory if it is not there yet
    Init,

    /// Fetch and switch to a branch, creating it locally when the remote lacks it
    Checkout { branch: String },

    /// Apply a JSON change set to a branch, commit and push it
    Commit {
        branch: String,

        #[arg(short, long)]
        message: String,

        /// JSON array of file changes
        #[arg(long, value_name = "FILE")]
        changes: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CommitReport {
    branch: String,
    revision: Option<String>,
    files: usize,
    completed_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    git_autocommit::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using environment only",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration from environment")?
    };

    match cli.command {
        Commands::Init => cmd_init(&config).await?,
        Commands::Checkout { branch } => cmd_checkout(&config, &branch).await?,
        Commands::Commit {
            branch,
            message,
            changes,
            json,
        } => cmd_commit(&config, &branch, &message, &changes, json).await?,
    }

    Ok(())
}

async fn cmd_init(config: &Config) -> Result<()> {
    let provider = GitCliProvider::new(&config.repository, &config.git);
    let cloned = provider
        .clone_if_missing()
        .await
        .context("Failed to prepare repository")?;

    if cloned {
        println!(
            "{}",
            format_success(&format!(
                "Cloned {} into {}",
                config.repository.origin_url,
                provider.workdir().display()
            ))
        );
    } else {
        println!(
            "{}",
            format_success(&format!(
                "Repository already present at {}",
                provider.workdir().display()
            ))
        );
    }

    Ok(())
}

async fn cmd_checkout(config: &Config, branch: &str) -> Result<()> {
    let client = RepositoryClient::open(config, Arc::new(TracingLogger)).await?;

    client
        .checkout(branch)
        .await
        .with_context(|| format!("Checkout of {} failed", branch))?;

    println!("{}", format_success(&format!("On branch {}", branch)));
    Ok(())
}

async fn cmd_commit(
    config: &Config,
    branch: &str,
    message: &str,
    changes: &Path,
    json: bool,
) -> Result<()> {
    let files = read_changes(changes).await?;
    info!("Loaded {} file changes from {}", files.len(), changes.display());

    let client = RepositoryClient::open(config, Arc::new(TracingLogger)).await?;

    let revision = client
        .commit(branch, message, &files)
        .await
        .with_context(|| format!("Commit to {} failed", branch))?;

    if json {
        let report = CommitReport {
            branch: branch.to_string(),
            revision: (!revision.is_empty()).then(|| revision.clone()),
            files: files.len(),
            completed_at: Utc::now(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if revision.is_empty() {
        println!("{}", format_warning("No changes to commit"));
    } else {
        println!(
            "{}",
            format_success(&format!("Pushed {} to {}", revision, branch))
        );
    }

    Ok(())
}

async fn read_changes(path: &Path) -> Result<Vec<FileChange>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read change set {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid change set in {}", path.display()))
}
