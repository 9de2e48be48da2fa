use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tui_2048::game::GameConfig;
use tui_2048::logging;
use tui_2048::modes::{AutoplayMode, HumanMode};

#[derive(Parser)]
#[command(name = "tui-2048")]
#[command(version, about = "The 2048 sliding-tile puzzle in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for tile placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Slide animation length in milliseconds (0 disables it)
    #[arg(long)]
    slide_ms: Option<u64>,

    /// Spawn animation length in milliseconds (0 disables it)
    #[arg(long)]
    spawn_ms: Option<u64>,

    /// Number of games to play in autoplay mode
    #[arg(long, default_value = "1")]
    games: usize,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directives, e.g. "info" or "tui_2048=debug"
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard or mouse
    Human,
    /// Play random legal moves without a UI
    Autoplay,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match (&cli.log_file, &cli.mode) {
        (Some(path), _) => logging::init_file_logging(path, &cli.log)?,
        (None, Mode::Autoplay) => logging::init_stderr_logging(&cli.log)?,
        // The TUI owns stderr; without a log file there is nowhere to log
        (None, Mode::Human) => {}
    }

    // Create game configuration from the config file and CLI arguments
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(slide_ms) = cli.slide_ms {
        config.slide_ms = slide_ms;
    }
    if let Some(spawn_ms) = cli.spawn_ms {
        config.spawn_ms = spawn_ms;
    }

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Autoplay => {
            let mut autoplay = AutoplayMode::new(config, cli.games).verbose(true);
            autoplay.run().await?;
        }
    }

    Ok(())
}
