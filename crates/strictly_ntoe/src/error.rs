//! Error types for board construction, queries and moves.

use crate::bits::{Coord, Mask};
use crate::player::Player;
use derive_more::{Display, Error};
use tracing::{instrument, trace};

/// Broad family an error belongs to.
///
/// Hosts that need to tell malformed input apart from a well-formed but
/// illegal position branch on this rather than on individual kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, strum::EnumIter)]
pub enum ErrorCategory {
    /// Malformed construction input.
    #[display("format")]
    Format,
    /// Coordinates outside the board.
    #[display("range")]
    Range,
    /// A position that cannot arise from legal play, or an illegal move.
    #[display("validation")]
    Validation,
    /// An operation called at the wrong time.
    #[display("usage")]
    Usage,
}

/// Specific failure carried by a [`BoardError`].
#[derive(Debug, Clone, PartialEq, Eq, Display, strum::IntoStaticStr)]
pub enum BoardErrorKind {
    /// Side length outside the supported range.
    #[display("side length {_0} is not supported (expected 1..={})", crate::bits::MAX_SIDE_LENGTH)]
    SideLength(usize),

    /// Grid does not have `expected` rows of `expected` entries.
    #[display("grid must be {expected}x{expected}")]
    GridShape {
        /// Required side length.
        expected: usize,
    },

    /// Grid entry other than 0 or 1.
    #[display("{_0} is not a valid bit value")]
    NotABit(u8),

    /// Mask has bits outside the board.
    #[display("mask {_0:#b} does not fit a {_1}x{_1} board")]
    MaskOverflow(Mask, usize),

    /// Player tag is not a single printable character.
    #[display("player tag {_0:?} must be a single printable character")]
    PlayerTag(String),

    /// Turn order was given no players.
    #[display("at least one player is required")]
    NoPlayers,

    /// Same player listed twice.
    #[display("player {_0} is listed more than once")]
    DuplicatePlayer(Player),

    /// Player is not part of the turn order.
    #[display("player {_0} is not part of this game")]
    UnknownPlayer(Player),

    /// Player of the turn order has no mask.
    #[display("no cells given for player {_0}")]
    MissingPlayer(Player),

    /// Coordinates outside the board.
    #[display("cell {coord:?} is outside a {side_length}x{side_length} board")]
    OutOfRange {
        /// Offending coordinates.
        coord: Coord,
        /// Board side length.
        side_length: usize,
    },

    /// Player to move has no mask in the state.
    #[display("turn holder {_0} has no cells in this state")]
    UnknownTurnHolder(Player),

    /// Two masks share a set bit.
    #[display("cell is occupied by multiple players")]
    SharedCell,

    /// Occupied-cell counts differ by more than one.
    #[display("cell distribution is unbalanced")]
    UnbalancedCells,

    /// More than one player completes a line.
    #[display("multiple players have a winning line")]
    MultipleWinners,

    /// A player has won but the turn is not their successor's.
    #[display("turn holder {turn} does not follow winner {winner}")]
    TurnWinnerMismatch {
        /// Player who completed a line.
        winner: Player,
        /// Player recorded as next to move.
        turn: Player,
    },

    /// Target cell already taken.
    #[display("cell {_0:?} is already occupied")]
    CellOccupied(Coord),

    /// Result queried before the game finished.
    #[display("game is still in progress")]
    GameInProgress,

    /// Successor requested for a player outside the ring.
    #[display("no next player is set for {_0}")]
    NoSuccessor(Player),
}

impl BoardErrorKind {
    /// Returns the family this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SideLength(_)
            | Self::GridShape { .. }
            | Self::NotABit(_)
            | Self::MaskOverflow(..)
            | Self::PlayerTag(_)
            | Self::NoPlayers
            | Self::DuplicatePlayer(_)
            | Self::UnknownPlayer(_)
            | Self::MissingPlayer(_) => ErrorCategory::Format,
            Self::OutOfRange { .. } => ErrorCategory::Range,
            Self::UnknownTurnHolder(_)
            | Self::SharedCell
            | Self::UnbalancedCells
            | Self::MultipleWinners
            | Self::TurnWinnerMismatch { .. }
            | Self::CellOccupied(_) => ErrorCategory::Validation,
            Self::GameInProgress | Self::NoSuccessor(_) => ErrorCategory::Usage,
        }
    }
}

/// Board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", kind, file, line)]
pub struct BoardError {
    /// What went wrong.
    pub kind: BoardErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: BoardErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        let name: &'static str = (&kind).into();
        trace!(kind = name, category = %kind.category(), "Board error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the specific failure.
    pub fn kind(&self) -> &BoardErrorKind {
        &self.kind
    }

    /// Returns the family of the failure.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<BoardErrorKind> for BoardError {
    #[track_caller]
    fn from(kind: BoardErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_records_caller_location() {
        let err = BoardError::new(BoardErrorKind::NoPlayers);
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("at least one player"));
    }

    #[test]
    fn test_location_survives_question_mark() {
        fn require_players(count: usize) -> Result<usize, BoardError> {
            let count = Some(count).filter(|&c| c > 0).ok_or(BoardErrorKind::NoPlayers)?;
            Ok(count)
        }
        let expected = line!() - 3;
        let err = require_players(0).unwrap_err();
        assert!(err.file.ends_with("error.rs"));
        assert_eq!(err.line, expected);
        assert_eq!(require_players(2).unwrap(), 2);
    }

    #[test]
    fn test_library_errors_point_at_their_origin() {
        let err = crate::player::TurnOrder::new([]).unwrap_err();
        assert!(err.file.ends_with("player.rs"));
        let err = crate::bits::cell_bit((0, 0), 0).unwrap_err();
        assert!(err.file.ends_with("bits.rs"));
    }

    #[test]
    fn test_categories_cover_every_family() {
        let kinds = [
            BoardErrorKind::NotABit(2),
            BoardErrorKind::OutOfRange {
                coord: (3, 0),
                side_length: 3,
            },
            BoardErrorKind::SharedCell,
            BoardErrorKind::GameInProgress,
        ];
        let categories: Vec<_> = kinds.iter().map(BoardErrorKind::category).collect();
        assert_eq!(categories, ErrorCategory::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_cell_occupied_is_a_validation_error() {
        let err: BoardError = BoardErrorKind::CellOccupied((1, 1)).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("(1, 1)"));
    }
}
