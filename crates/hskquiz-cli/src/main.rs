//! hskquiz CLI — the terminal front-end for the quiz engine.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hskquiz", version, about = "HSK vocabulary quiz for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz session
    Play {
        /// Level to start; prompts interactively when omitted
        #[arg(long)]
        level: Option<u32>,

        /// Config file path (defaults to ./hskquiz.toml, then built-in)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory containing the reward image folders
        #[arg(long, default_value = ".")]
        assets: PathBuf,

        /// Seed the random source for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Disable audio playback for audio levels
        #[arg(long)]
        no_audio: bool,

        /// Text-to-speech command for audio levels
        #[arg(long)]
        tts: Option<String>,
    },

    /// List configured levels
    Levels {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a quiz configuration
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter hskquiz.toml and reward folders
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hskquiz_core=info".parse().unwrap())
                .add_directive("hskquiz_media=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            level,
            config,
            assets,
            seed,
            no_audio,
            tts,
        } => commands::play::execute(level, config, assets, seed, no_audio, tts).await,
        Commands::Levels { config } => commands::levels::execute(config),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
