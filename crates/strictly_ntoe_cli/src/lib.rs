//! Replay driver for strictly_ntoe games.
//!
//! Loads a [`GameConfig`], plays a list of moves through
//! [`strictly_ntoe::Game`] and reports the board after each one.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod replay;

pub use config::{ConfigError, GameConfig};
pub use replay::{MoveReport, REFERENCE_MOVES, Snapshot, parse_coord, replay};
