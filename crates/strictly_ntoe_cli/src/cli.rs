//! Command-line interface for ntoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_ntoe::Coord;
use strictly_ntoe_cli::parse_coord;

/// ntoe - replay n-in-a-row games on a validated bitboard
#[derive(Parser, Debug)]
#[command(name = "ntoe")]
#[command(about = "Replay n-in-a-row games on a validated bitboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a sequence of moves and print the board after each one
    Play {
        /// Path to a TOML game configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Board side length (overrides the config file)
        #[arg(short = 'n', long)]
        side_length: Option<usize>,

        /// Player tags in turn order, one character each (overrides the config file)
        #[arg(short, long)]
        players: Option<String>,

        /// Print a JSON snapshot of the final position instead of the board
        #[arg(long)]
        json: bool,

        /// Moves as row,col; defaults to the reference sequence
        #[arg(value_parser = parse_coord)]
        moves: Vec<Coord>,
    },

    /// Print every winning-line mask for a side length
    Lines {
        /// Board side length
        side_length: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_parses_moves() {
        let cli = Cli::parse_from(["ntoe", "play", "-n", "4", "--players", "XOZ", "0,0", "3,3"]);
        match cli.command {
            Command::Play {
                side_length,
                players,
                moves,
                json,
                config,
            } => {
                assert_eq!(side_length, Some(4));
                assert_eq!(players.as_deref(), Some("XOZ"));
                assert_eq!(moves, vec![(0, 0), (3, 3)]);
                assert!(!json);
                assert!(config.is_none());
            }
            Command::Lines { .. } => panic!("Expected play command"),
        }
    }

    #[test]
    fn test_bad_move_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["ntoe", "play", "0-0"]).is_err());
    }
}
