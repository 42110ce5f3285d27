use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "studyloop", version, about = "Study a question set and earn XP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Experience points
    Xp {
        #[command(subcommand)]
        action: commands::xp::XpAction,
    },
    /// List the study modes and their XP ranges
    Modes,
    /// Parse and validate a question file
    Check {
        /// JSON file with an array of questions
        file: std::path::PathBuf,
    },
    /// Study a question file interactively
    Play(commands::play::PlayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Xp { action } => commands::xp::run(action),
        Commands::Modes => commands::modes::run(),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Play(args) => commands::play::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
