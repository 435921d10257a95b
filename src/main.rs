//! Command-line entry point for `ytk`.

mod auth;
mod commands;

use clap::{Parser, Subcommand};
use ytk::config::{load_global, load_subcommand};
use ytk::{AttachArgs, CreateArgs, GlobalArgs, HistoryArgs, IssuesArgs, YtError};

#[derive(Parser)]
#[command(name = "ytk", about = "Query and update YouTrack issues", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List issues matching a search query
    Issues(IssuesArgs),
    /// Show custom-field history and when the issue was resolved
    History(HistoryArgs),
    /// Create an issue
    Create(CreateArgs),
    /// Attach a file to an issue
    Attach(AttachArgs),
}

async fn run(cli: Cli) -> Result<(), YtError> {
    let global = load_global(cli.global)?;
    match cli.command {
        Commands::Issues(args) => commands::run_issues(load_subcommand(&args)?, &global).await,
        Commands::History(args) => {
            commands::run_history(load_subcommand(&args)?, &global).await
        }
        Commands::Create(args) => commands::run_create(load_subcommand(&args)?, &global).await,
        Commands::Attach(args) => commands::run_attach(load_subcommand(&args)?, &global).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Cli::parse()).await?;
    Ok(())
}
