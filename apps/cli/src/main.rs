//! mdcards CLI: review heading-based markdown flashcards.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use mdcards_core::Outcome;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod store;

use commands::Session;
use config::Settings;

#[derive(Parser)]
#[command(name = "mdcards", version, about = "Spaced repetition over markdown headings")]
struct Cli {
    /// Corpus root (defaults to $MDCARDS_ROOT or `root` in the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the corpus and count cards per document
    Index,

    /// Show the next card due for review
    Next {
        /// Also print the card body
        #[arg(long)]
        show: bool,
    },

    /// Rate a due card
    Rate {
        /// Outcome: again, decrease, same, increase
        outcome: Outcome,

        /// Card identity as printed by `next`, e.g. "rust.md > Traits"
        #[arg(long)]
        card: String,
    },

    /// List every due card in review order
    Due {
        /// Show at most this many cards
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Summarize the review schedule
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "mdcards=debug,mdcards_core=debug"
    } else {
        "mdcards=info,mdcards_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::resolve(cli.root, cli.config)?;

    match cli.command {
        Commands::Index => commands::index::execute(&settings),
        Commands::Next { show } => commands::next::execute(&Session::open(settings)?, show),
        Commands::Rate { outcome, card } => {
            commands::rate::execute(&mut Session::open(settings)?, &card, outcome)
        }
        Commands::Due { limit } => commands::due::execute(&Session::open(settings)?, limit),
        Commands::Stats { json } => commands::stats::execute(&Session::open(settings)?, json),
    }
}
