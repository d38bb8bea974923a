//! ntoe - replay driver
//!
//! Builds a game from configuration and flags, plays the given moves and
//! prints the board after each one.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_ntoe::{Coord, winning_lines};
use strictly_ntoe_cli::{GameConfig, REFERENCE_MOVES, Snapshot, replay};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            side_length,
            players,
            json,
            moves,
        } => run_play(config, side_length, players, json, moves),
        Command::Lines { side_length } => run_lines(side_length),
    }
}

/// Replay moves and print the game
#[instrument(skip(moves))]
fn run_play(
    config: Option<PathBuf>,
    side_length: Option<usize>,
    players: Option<String>,
    json: bool,
    moves: Vec<Coord>,
) -> Result<()> {
    let mut settings = match config {
        Some(path) => GameConfig::from_file(&path)?,
        None => GameConfig::default(),
    };
    if let Some(tags) = players {
        settings = settings.with_player_tags(&tags);
    }
    if let Some(n) = side_length {
        settings = settings.with_side_length(n);
    }

    let mut game = settings.build_game()?;
    let moves = if moves.is_empty() {
        info!("No moves given, replaying reference sequence");
        REFERENCE_MOVES.to_vec()
    } else {
        moves
    };

    if !json {
        println!("{game}\n");
    }
    let reports = replay(&mut game, moves, |game, report| {
        if json {
            return;
        }
        if report.accepted {
            println!("{} plays {:?}\n{game}\n", report.player, report.coord);
        } else {
            println!("{} cannot play {:?}\n", report.player, report.coord);
        }
    });
    info!(
        attempted = reports.len(),
        accepted = reports.iter().filter(|r| r.accepted).count(),
        "Replay finished"
    );

    if json {
        let snapshot = serde_json::to_string_pretty(&Snapshot::of(&game))
            .context("Failed to serialize snapshot")?;
        println!("{snapshot}");
    } else if game.is_in_progress() {
        println!("Game still in progress, {} to move", game.current_turn());
    }

    Ok(())
}

/// Print the winning-line masks for a side length
#[instrument]
fn run_lines(side_length: usize) -> Result<()> {
    let lines = winning_lines(side_length)?;
    let width = side_length * side_length;
    for line in lines.iter() {
        println!("{line:0width$b}");
    }
    Ok(())
}
