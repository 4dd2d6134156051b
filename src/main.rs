mod game;
mod input;
mod sim;
mod snake;
mod speed;
mod term;
mod ticker;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use crate::snake::Grid;
use crate::speed::Speed;

#[derive(Parser)]
#[command(name = "wrapsnake")]
#[command(version, about = "Terminal snake on a wraparound grid")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(2..=60))]
    width: u16,

    /// Grid height in cells
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(2..=60))]
    height: u16,

    /// Difficulty highlighted in the menu
    #[arg(long, value_enum, default_value = "snake")]
    speed: Speed,

    /// Write logs to this file (the terminal is busy with the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level for --log-file
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        WriteLogger::init(cli.log_level, Config::default(), file).context("Failed to initialize logger")?;
    }

    let grid = Grid::new(cli.width, cli.height);
    info!("Starting wrapsnake: {}x{} grid, {} preselected", grid.width, grid.height, cli.speed.label());

    let mut game = game::SnakeGame::new(grid, cli.speed)?;
    // Always hand the terminal back, even when the game loop failed
    let result = game.initialize().and_then(|_| game.run());
    let restored = game.shutdown();
    first_error(result, restored)
}

/// The game's own error wins over a failed terminal restore.
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_game_error_wins_over_restore_error() {
        let err = first_error(Err(anyhow!("draw failed")), Err(anyhow!("restore failed"))).unwrap_err();
        assert_eq!(err.to_string(), "draw failed");
    }

    #[test]
    fn test_restore_error_reported_after_clean_run() {
        let err = first_error(Ok(()), Err(anyhow!("restore failed"))).unwrap_err();
        assert_eq!(err.to_string(), "restore failed");
        assert!(first_error(Ok(()), Ok(())).is_ok());
    }
}
