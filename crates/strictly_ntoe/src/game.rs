//! Mutable game wrapper around the immutable state.

use crate::bits::Coord;
use crate::error::{BoardError, BoardErrorKind};
use crate::lines::LineCache;
use crate::outcome::Outcome;
use crate::player::{Player, TurnOrder};
use crate::state::{GameState, Square, WinningSequences};
use derive_getters::Getters;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A game in progress or finished.
///
/// Owns the turn order, the line cache and the current [`GameState`]. Each
/// accepted move replaces the state with its successor; the state itself
/// never changes.
#[derive(Debug, Clone, Getters)]
pub struct Game {
    /// Players in turn order.
    order: Arc<TurnOrder>,
    /// Winning lines used for every state of this game.
    cache: Arc<LineCache>,
    /// Current position.
    state: GameState,
}

impl Game {
    /// Creates a game on an empty board. The first player moves first.
    ///
    /// # Errors
    ///
    /// Returns a format error for an empty or duplicated player list or an
    /// unsupported side length.
    pub fn new(
        players: impl IntoIterator<Item = Player>,
        side_length: usize,
    ) -> Result<Self, BoardError> {
        Self::with_line_cache(players, side_length, LineCache::global())
    }

    /// Creates a game whose states take winning lines from `cache`.
    ///
    /// # Errors
    ///
    /// Same as [`Game::new`].
    #[instrument(skip(players, cache))]
    pub fn with_line_cache(
        players: impl IntoIterator<Item = Player>,
        side_length: usize,
        cache: Arc<LineCache>,
    ) -> Result<Self, BoardError> {
        let order = Arc::new(TurnOrder::new(players)?);
        let state = GameState::empty_with_cache(Arc::clone(&order), side_length, &cache)?;
        info!(players = order.len(), side_length, "Created game");
        Ok(Self {
            order,
            cache,
            state,
        })
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        self.order.players()
    }

    /// Player to move.
    pub fn current_turn(&self) -> Player {
        self.state.turn()
    }

    /// Returns true while the board has space and nobody has won.
    pub fn is_in_progress(&self) -> bool {
        !self.state.is_grid_filled() && self.state.winning_sequences().is_empty()
    }

    /// Cells the player to move may take; empty once the game is over.
    pub fn legal_actions(&self) -> Vec<Coord> {
        if self.is_in_progress() {
            self.state.empty_cells()
        } else {
            Vec::new()
        }
    }

    /// Contents of every cell.
    pub fn cell_states(&self) -> BTreeMap<Coord, Square> {
        self.state.cell_states()
    }

    /// Plays `coord` for the player to move.
    ///
    /// Returns false and leaves the game untouched if the move is rejected
    /// for any reason.
    #[instrument(skip(self), fields(player = %self.current_turn()))]
    pub fn make_move(&mut self, coord: Coord) -> bool {
        match self.state.generate_successor(coord) {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(err) => {
                let kind: &'static str = err.kind().into();
                debug!(?coord, kind, error = %err, "Rejected move");
                false
            }
        }
    }

    /// Winning lines of the finished game.
    ///
    /// # Errors
    ///
    /// Returns a usage error while the game is still in progress.
    pub fn winning_sequences(&self) -> Result<WinningSequences, BoardError> {
        if self.is_in_progress() {
            return Err(BoardError::new(BoardErrorKind::GameInProgress));
        }
        Ok(self.state.winning_sequences())
    }

    /// Result of the finished game.
    ///
    /// # Errors
    ///
    /// Returns a usage error while the game is still in progress.
    pub fn winner(&self) -> Result<Outcome, BoardError> {
        let sequences = self.winning_sequences()?;
        Ok(match sequences.into_iter().next() {
            Some((player, lines)) => Outcome::Winner { player, lines },
            None => Outcome::Draw,
        })
    }

    /// Clears the board, keeping the players.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), BoardError> {
        self.state = GameState::empty_with_cache(
            Arc::clone(&self.order),
            self.state.side_length(),
            &self.cache,
        )?;
        Ok(())
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.state.side_length();
        write!(f, "A {n}x{n} game of ")?;
        let tags: Vec<String> = self.players().iter().map(Player::to_string).collect();
        writeln!(f, "{}", tags.join(" / "))?;
        write!(f, "{}", self.state)?;
        if let Ok(outcome) = self.winner() {
            write!(f, "\n{outcome}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xo() -> Vec<Player> {
        vec![Player::new("X").unwrap(), Player::new("O").unwrap()]
    }

    #[test]
    fn test_new_game_is_empty_and_in_progress() {
        let game = Game::new(xo(), 3).unwrap();
        assert!(game.is_in_progress());
        assert_eq!(game.current_turn(), xo()[0]);
        assert_eq!(game.legal_actions().len(), 9);
        assert!(game.cell_states().values().all(|s| *s == Square::Empty));
    }

    #[test]
    fn test_winner_while_in_progress_is_usage_error() {
        let game = Game::new(xo(), 3).unwrap();
        let err = game.winner().unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::GameInProgress);
        assert!(game.winning_sequences().is_err());
    }

    #[test]
    fn test_reset_keeps_players() {
        let mut game = Game::new(xo(), 3).unwrap();
        assert!(game.make_move((1, 1)));
        game.reset().unwrap();
        assert!(game.state().is_blank());
        assert_eq!(game.current_turn(), xo()[0]);
        assert_eq!(game.players(), &xo()[..]);
    }

    #[test]
    fn test_game_owns_its_line_cache() {
        let cache = Arc::new(LineCache::default());
        let mut game = Game::with_line_cache(xo(), 5, Arc::clone(&cache)).unwrap();
        assert!(Arc::ptr_eq(game.cache(), &cache));
        assert_eq!(cache.len(), 1);
        assert!(game.make_move((2, 2)));
        game.reset().unwrap();
        assert_eq!(cache.len(), 1);

        let err = Game::with_line_cache(xo(), 12, Arc::clone(&cache)).unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::SideLength(12));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_display_shows_verdict() {
        let mut game = Game::new(xo(), 3).unwrap();
        for coord in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            assert!(game.make_move(coord));
        }
        let text = game.to_string();
        assert!(text.starts_with("A 3x3 game of X / O\n"));
        assert!(text.ends_with("\nX wins!"));
    }
}
