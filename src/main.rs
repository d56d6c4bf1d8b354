use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{AddCommand, CategoriesCommand, ConfigCommand, SaveCommand, ShowCommand};
use journalkeeper::{Config, Journal};

#[derive(Parser)]
#[command(name = "journalkeeper")]
#[command(version)]
#[command(about = "Keeps a dated, AI-structured journal in Org or Markdown", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize an entry with the AI backend and save it
    Add(AddCommand),

    /// Save fields directly
    Save(SaveCommand),

    /// Print a category's document
    Show(ShowCommand),

    /// List categories
    Categories(CategoriesCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journalkeeper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Add(cmd)) => {
            let journal = Journal::from_config(&config).await?;
            cmd.run(&journal).await?;
        }
        Some(Commands::Save(cmd)) => {
            let journal = Journal::from_config(&config).await?;
            cmd.run(&journal).await?;
        }
        // Read-only commands skip the git bootstrap.
        Some(Commands::Show(cmd)) => {
            let journal = Journal::open(&config)?;
            cmd.run(&journal).await?;
        }
        Some(Commands::Categories(cmd)) => {
            let journal = Journal::open(&config)?;
            cmd.run(&journal)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
