//! Validated, bit-packed game state for n-in-a-row board games.
//!
//! Tic-tac-toe and its larger relatives are played on an `n x n` board by any
//! number of players taking turns in a fixed cycle. Each player's cells are
//! packed into one integer [`Mask`], and every [`GameState`] checks on
//! construction that it describes a position reachable by legal play.
//!
//! # Architecture
//!
//! - **bits**: packing grids into masks and reading cells back out
//! - **lines**: row, column and diagonal masks, cached per side length
//! - **player**: player tags and the cyclic [`TurnOrder`]
//! - **invariants**: the legality rules every state satisfies
//! - **state**: the immutable [`GameState`] and its successors
//! - **game**: the mutable [`Game`] a host drives one move at a time
//!
//! # Example
//!
//! ```
//! use strictly_ntoe::{Game, Player};
//!
//! # fn main() -> Result<(), strictly_ntoe::BoardError> {
//! let players = [Player::new("X")?, Player::new("O")?];
//! let mut game = Game::new(players, 3)?;
//! for cell in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
//!     assert!(game.make_move(cell));
//! }
//! assert!(!game.is_in_progress());
//! assert_eq!(game.winner()?.winner(), Some(players[0]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bits;
mod error;
mod game;
pub mod invariants;
mod lines;
mod outcome;
mod player;
mod state;

pub use bits::{
    Coord, MAX_SIDE_LENGTH, Mask, cell_bit, check_side_length, full_mask, matrix_to_mask,
    occupied_cells, population_count,
};
pub use error::{BoardError, BoardErrorKind, ErrorCategory};
pub use game::Game;
pub use lines::{LineCache, generate_lines, is_won, winning_lines};
pub use outcome::Outcome;
pub use player::{Player, TurnOrder};
pub use state::{GameState, Occupancy, Square, WinningSequences};
