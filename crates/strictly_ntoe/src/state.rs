//! Immutable, validated game state.

use crate::bits::{Coord, Mask, board_mask, cell_bit, cells_of, check_side_length, matrix_to_mask};
use crate::error::{BoardError, BoardErrorKind};
use crate::invariants::{Draft, validate};
use crate::lines::{LineCache, is_won};
use crate::player::{Player, TurnOrder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupant, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Square::Empty => write!(f, " "),
            Square::Occupied(player) => write!(f, "{player}"),
        }
    }
}

/// Cells held by one player, either packed or as a bit matrix.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum Occupancy {
    /// Already packed mask.
    Mask(Mask),
    /// Row-major grid of 0/1 entries.
    Grid(Vec<Vec<u8>>),
}

impl Occupancy {
    /// Packs the occupancy for a board of the given side length.
    fn into_mask(self, side_length: usize) -> Result<Mask, BoardError> {
        match self {
            Occupancy::Mask(mask) if mask & !board_mask(side_length) != 0 => {
                Err(BoardError::new(BoardErrorKind::MaskOverflow(mask, side_length)))
            }
            Occupancy::Mask(mask) => Ok(mask),
            Occupancy::Grid(grid) => matrix_to_mask(&grid, side_length),
        }
    }
}

/// Winning lines per player, each line as cell coordinates.
pub type WinningSequences = BTreeMap<Player, Vec<Vec<Coord>>>;

/// A legal position: one mask per player plus the player to move.
///
/// Values are never mutated. Every constructor, including
/// [`GameState::generate_successor`], runs the full invariant check, so an
/// existing `GameState` always describes a position reachable by legal play.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    order: Arc<TurnOrder>,
    masks: Vec<Mask>,
    side_length: usize,
    turn: Player,
    lines: Arc<[Mask]>,
}

impl GameState {
    /// Builds a state from per-player occupancy.
    ///
    /// `player_masks` must name every player of `order` exactly once.
    ///
    /// # Errors
    ///
    /// Format errors for a bad side length, grid, mask or player set;
    /// validation errors if the position breaks a legality invariant.
    pub fn new(
        order: Arc<TurnOrder>,
        player_masks: impl IntoIterator<Item = (Player, Occupancy)>,
        side_length: usize,
        turn: Player,
    ) -> Result<Self, BoardError> {
        Self::new_with_cache(order, player_masks, side_length, turn, &LineCache::global())
    }

    /// [`GameState::new`], taking winning lines from `cache`.
    #[instrument(skip(order, player_masks, cache), fields(turn = %turn))]
    pub fn new_with_cache(
        order: Arc<TurnOrder>,
        player_masks: impl IntoIterator<Item = (Player, Occupancy)>,
        side_length: usize,
        turn: Player,
        cache: &LineCache,
    ) -> Result<Self, BoardError> {
        check_side_length(side_length)?;

        let mut masks: Vec<Option<Mask>> = vec![None; order.len()];
        for (player, occupancy) in player_masks {
            let index = order
                .index_of(player)
                .ok_or(BoardErrorKind::UnknownPlayer(player))?;
            if masks[index].is_some() {
                return Err(BoardError::new(BoardErrorKind::DuplicatePlayer(player)));
            }
            masks[index] = Some(occupancy.into_mask(side_length)?);
        }

        let masks = masks
            .into_iter()
            .enumerate()
            .map(|(i, mask)| {
                mask.ok_or_else(|| BoardError::from(BoardErrorKind::MissingPlayer(order.at(i))))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parts(order, masks, side_length, turn, cache.get(side_length)?)
    }

    /// Empty board with the first player of `order` to move.
    pub fn empty(order: Arc<TurnOrder>, side_length: usize) -> Result<Self, BoardError> {
        Self::empty_with_cache(order, side_length, &LineCache::global())
    }

    /// [`GameState::empty`], taking winning lines from `cache`.
    #[instrument(skip(order, cache))]
    pub fn empty_with_cache(
        order: Arc<TurnOrder>,
        side_length: usize,
        cache: &LineCache,
    ) -> Result<Self, BoardError> {
        let lines = cache.get(side_length)?;
        let turn = order.first();
        let masks = vec![0; order.len()];
        Self::from_parts(order, masks, side_length, turn, lines)
    }

    /// Single validation path shared by every constructor.
    fn from_parts(
        order: Arc<TurnOrder>,
        masks: Vec<Mask>,
        side_length: usize,
        turn: Player,
        lines: Arc<[Mask]>,
    ) -> Result<Self, BoardError> {
        validate(&Draft::new(&order, &masks, turn, &lines))?;
        Ok(Self {
            order,
            masks,
            side_length,
            turn,
            lines,
        })
    }

    /// Board side length.
    pub fn side_length(&self) -> usize {
        self.side_length
    }

    /// Player to move.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        self.order.players()
    }

    /// Shared turn order.
    pub fn turn_order(&self) -> &Arc<TurnOrder> {
        &self.order
    }

    /// Packed cells of a player, if they take part in the game.
    pub fn mask_of(&self, player: Player) -> Option<Mask> {
        self.order.index_of(player).map(|i| self.masks[i])
    }

    fn union(&self) -> Mask {
        self.masks.iter().fold(0, |acc, &mask| acc | mask)
    }

    fn entries(&self) -> impl Iterator<Item = (Player, Mask)> + '_ {
        self.order.players().iter().copied().zip(self.masks.iter().copied())
    }

    /// Returns the contents of a cell.
    ///
    /// # Errors
    ///
    /// Returns a range error if `coord` is outside the board.
    pub fn get(&self, coord: Coord) -> Result<Square, BoardError> {
        let bit = cell_bit(coord, self.side_length)?;
        Ok(self
            .entries()
            .find(|&(_, mask)| mask & bit != 0)
            .map_or(Square::Empty, |(player, _)| Square::Occupied(player)))
    }

    /// Returns true if no cell is occupied.
    pub fn is_blank(&self) -> bool {
        self.union() == 0
    }

    /// Returns true if every cell is occupied.
    pub fn is_grid_filled(&self) -> bool {
        self.union() == board_mask(self.side_length)
    }

    /// Lines completed by each player.
    ///
    /// Only players with at least one line appear. A legal state has at most
    /// one such player, who may hold several lines at once.
    pub fn winning_sequences(&self) -> WinningSequences {
        self.entries()
            .filter_map(|(player, mask)| {
                let sequences: Vec<Vec<Coord>> = self
                    .lines
                    .iter()
                    .filter(|&&line| is_won(mask, line))
                    .map(|&line| cells_of(line, self.side_length))
                    .collect();
                (!sequences.is_empty()).then_some((player, sequences))
            })
            .collect()
    }

    /// Coordinates of every unoccupied cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        cells_of(board_mask(self.side_length) ^ self.union(), self.side_length)
    }

    /// Contents of every cell, keyed by coordinates.
    pub fn cell_states(&self) -> BTreeMap<Coord, Square> {
        let mut states: BTreeMap<Coord, Square> = self
            .empty_cells()
            .into_iter()
            .map(|coord| (coord, Square::Empty))
            .collect();
        for (player, mask) in self.entries() {
            states.extend(
                cells_of(mask, self.side_length)
                    .into_iter()
                    .map(|coord| (coord, Square::Occupied(player))),
            );
        }
        states
    }

    /// Position after the player to move takes `coord`.
    ///
    /// # Errors
    ///
    /// Returns a range error for coordinates off the board, a validation
    /// error if the cell is taken, or any invariant violation of the
    /// resulting position (for example a move after the game was won).
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn generate_successor(&self, coord: Coord) -> Result<Self, BoardError> {
        let bit = cell_bit(coord, self.side_length)?;
        if self.union() & bit != 0 {
            return Err(BoardError::new(BoardErrorKind::CellOccupied(coord)));
        }

        let index = self
            .order
            .index_of(self.turn)
            .ok_or(BoardErrorKind::UnknownTurnHolder(self.turn))?;
        let mut masks = self.masks.clone();
        masks[index] |= bit;
        let next = self.order.next_after(self.turn)?;

        debug!(player = %self.turn, ?coord, next = %next, "Generating successor");
        Self::from_parts(
            Arc::clone(&self.order),
            masks,
            self.side_length,
            next,
            Arc::clone(&self.lines),
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.side_length;
        let rule = vec!["-"; n].join("-+-");
        let states = self.cell_states();
        for row in 0..n {
            if row > 0 {
                writeln!(f)?;
                writeln!(f, "\t{rule}")?;
            }
            let cells: Vec<String> = (0..n)
                .map(|col| states.get(&(row, col)).copied().unwrap_or(Square::Empty).to_string())
                .collect();
            write!(f, "\t{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
