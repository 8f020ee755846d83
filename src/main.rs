use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rabbit_snake::game::{Cell, GameConfig, GameEngine, GameMode, Geometry};
use rabbit_snake::history::SessionHistory;
use rabbit_snake::modes::HumanMode;
use rabbit_snake::render::Renderer;
use rabbit_snake::session::SessionController;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rabbit_snake")]
#[command(version, about = "Snake game with classic and portal modes")]
struct Cli {
    /// Boundary rule
    #[arg(long, default_value = "classic")]
    mode: Mode,

    /// Speed setting (higher is faster)
    #[arg(long)]
    speed: Option<u8>,

    /// Cells along each side of the square grid (2 to 200)
    #[arg(long)]
    grid: Option<i32>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where finished games are recorded
    #[arg(long, default_value = "snake_history.json")]
    history: PathBuf,

    /// Keep history in memory only
    #[arg(long)]
    no_history: bool,

    /// Write logs to this file (the terminal is busy with the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Hitting the wall ends the game
    Classic,
    /// Walls teleport to the opposite edge
    Portal,
}

impl From<Mode> for GameMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Classic => GameMode::Classic,
            Mode::Portal => GameMode::Portal,
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {path:?}"))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rabbit_snake=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid) = cli.grid {
        config.grid_count = grid;
        config.start = Cell::new(grid / 2, grid / 2);
    }
    config.validate().context("Invalid game settings")?;

    let history = if cli.no_history {
        SessionHistory::in_memory()
    } else {
        SessionHistory::open(&cli.history)
    };

    let speed = cli.speed.unwrap_or(config.speed.default);
    let renderer = Renderer::new(Geometry::from(&config));
    let controller =
        SessionController::new(GameEngine::new(config), cli.mode.into(), speed, history);

    let mut human_mode = HumanMode::new(controller, renderer);
    human_mode.run().await?;

    Ok(())
}
