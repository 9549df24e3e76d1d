//! verbivisa CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "verbivisa",
    version,
    about = "Vocabulary drill in study packets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to find the word list and configuration.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Word list CSV (default: `words` from the config)
    #[arg(long)]
    words: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example word list
    Init,

    /// Check a word list for missing columns and suspicious rows
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the study packets of a word list
    Packets {
        #[command(flatten)]
        source: SourceArgs,

        /// Discard the current packets and divide the words again
        #[arg(long)]
        regenerate: bool,
    },

    /// Run an interactive quiz
    Quiz {
        #[command(flatten)]
        source: SourceArgs,

        /// Packet name, or "kaikki" for every packet combined
        #[arg(long, default_value = "kaikki")]
        packet: String,

        /// Direction: it-fi, fi-it
        #[arg(long, default_value = "it-fi")]
        direction: String,

        /// Word set: all, irregular, regular
        #[arg(long, default_value = "all")]
        filter: String,

        /// Mode: first-pass, retry
        #[arg(long, default_value = "first-pass")]
        mode: String,
    },

    /// Show or reset highscores
    Scores {
        #[command(subcommand)]
        action: ScoresAction,
    },
}

#[derive(Subcommand)]
enum ScoresAction {
    /// List highscores of a word list
    List {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Remove one highscore, or all of a word list
    Reset {
        #[command(flatten)]
        source: SourceArgs,

        /// Composite key, e.g. "it → fi | paketti_1 | kaikki" (default: all)
        #[arg(long)]
        key: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("verbivisa=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { source } => commands::validate::execute(source),
        Commands::Packets { source, regenerate } => commands::packets::execute(source, regenerate),
        Commands::Quiz {
            source,
            packet,
            direction,
            filter,
            mode,
        } => commands::quiz::execute(source, packet, direction, filter, mode),
        Commands::Scores { action } => match action {
            ScoresAction::List { source } => commands::scores::list(source),
            ScoresAction::Reset { source, key } => commands::scores::reset(source, key),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
