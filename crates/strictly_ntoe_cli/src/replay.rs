//! Replaying a list of moves against a game.

use serde::Serialize;
use strictly_ntoe::{Coord, Game, Outcome, Player};
use tracing::{instrument, warn};

/// Moves played when none are given on the command line.
pub const REFERENCE_MOVES: [Coord; 7] = [(0, 0), (1, 0), (1, 1), (2, 2), (0, 1), (0, 2), (2, 1)];

/// Parses `row,col` into coordinates.
pub fn parse_coord(s: &str) -> Result<Coord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected row,col but got {s:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad coordinate {part:?} in {s:?}: {e}"))
    };
    Ok((parse(row)?, parse(col)?))
}

/// What happened to one requested move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// Player whose turn it was.
    pub player: Player,
    /// Requested cell.
    pub coord: Coord,
    /// Whether the game accepted the move.
    pub accepted: bool,
}

/// Plays each move in order, stopping early once the game is over.
///
/// `on_move` is called after every attempted move.
#[instrument(skip(game, moves, on_move))]
pub fn replay(
    game: &mut Game,
    moves: impl IntoIterator<Item = Coord>,
    mut on_move: impl FnMut(&Game, &MoveReport),
) -> Vec<MoveReport> {
    let mut reports = Vec::new();
    for coord in moves {
        if !game.is_in_progress() {
            warn!(?coord, "Game is over, ignoring remaining moves");
            break;
        }
        let player = game.current_turn();
        let accepted = game.make_move(coord);
        let report = MoveReport {
            player,
            coord,
            accepted,
        };
        on_move(game, &report);
        reports.push(report);
    }
    reports
}

/// Serializable view of a game for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Board side length.
    pub side_length: usize,
    /// Player to move.
    pub turn: Player,
    /// Rows of cell tags, with empty cells as `null`.
    pub board: Vec<Vec<Option<Player>>>,
    /// Result, once the game is over.
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    /// Captures the current position of a game.
    pub fn of(game: &Game) -> Self {
        let side_length = game.state().side_length();
        let mut board = vec![vec![None; side_length]; side_length];
        for ((row, col), square) in game.cell_states() {
            board[row][col] = square.player();
        }
        Self {
            side_length,
            turn: game.current_turn(),
            board,
            outcome: game.winner().ok(),
        }
    }
}
