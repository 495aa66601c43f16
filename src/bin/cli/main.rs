mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wordwise-cli", about = "Wordwise vocabulary trainer CLI", version)]
struct Cli {
    /// Use a specific config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a vocabulary item
    Add {
        /// The word or phrase to learn
        term: String,
        /// Its meaning
        meaning: String,
        /// Example sentence
        #[arg(long)]
        example: Option<String>,
        /// Mark as a catalog item rather than user-added
        #[arg(long)]
        catalog: bool,
    },

    /// List items due for review today
    Due {
        /// Maximum items (default: review.daily_limit from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Show the full queue in priority order, without shuffling
        #[arg(long)]
        all: bool,
    },

    /// Record the answer to one review
    Review {
        /// Term (case-insensitive prefix match)
        term: String,
        /// The answer was wrong
        #[arg(long)]
        wrong: bool,
        /// Response time in seconds
        #[arg(long, default_value = "5")]
        time: f64,
        /// Self-reported confidence, 1-5
        #[arg(long, default_value = "3")]
        confidence: u8,
    },

    /// Show what a correct or incorrect answer would do to an item
    Preview {
        /// Term (case-insensitive prefix match)
        term: String,
    },

    /// Progress counts across all items
    Stats,

    /// Delete an item and its learning record
    Delete {
        /// Term (case-insensitive prefix match)
        term: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Add { term, meaning, example, catalog } => {
            commands::add::run(&app, term, meaning, example, catalog, &cli.format)?;
        }
        Command::Due { limit, all } => {
            commands::due::run(&app, limit, all, &cli.format, use_color)?;
        }
        Command::Review { term, wrong, time, confidence } => {
            commands::review::run(&app, &term, !wrong, time, confidence, &cli.format, use_color)?;
        }
        Command::Preview { term } => {
            commands::preview::run(&app, &term, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Delete { term } => {
            commands::delete::run(&app, &term)?;
        }
    }

    Ok(())
}
