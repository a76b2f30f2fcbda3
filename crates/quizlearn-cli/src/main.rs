//! quizlearn CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "quizlearn", version, about = "Console quiz app with learning analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive quiz session
    Play {
        /// Question bank file or directory (defaults to the built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Palette used for HTML exports
        #[arg(long)]
        palette: Option<String>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory (defaults to the built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,

    /// List available colour palettes
    Palettes {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Console output goes to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            bank,
            config,
            seed,
            palette,
        } => commands::play::execute(bank, config, seed, palette),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
        Commands::Palettes { config, json } => commands::palettes::execute(config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
